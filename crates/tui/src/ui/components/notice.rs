use ratatui::{
    Frame,
    layout::Rect,
    style::Style,
    text::Line,
    widgets::{Block, BorderType, Borders, Clear, Paragraph, Wrap},
};

use crate::{
    app::{Notice, NoticeLevel},
    ui::theme::Theme,
};

/// Centered message box over the current screen.
pub fn render(frame: &mut Frame<'_>, area: Rect, notice: Option<&Notice>, theme: &Theme) {
    let Some(notice) = notice else {
        return;
    };
    let (title, color) = match notice.level {
        NoticeLevel::Info => (" Info ", theme.positive),
        NoticeLevel::Error => (" Error ", theme.error),
    };

    let width = area.width.saturating_sub(4).min(60);
    let text_width = usize::from(width.saturating_sub(2)).max(1);
    let lines = notice.text.chars().count().div_ceil(text_width);
    let height = u16::try_from(lines + 4).unwrap_or(u16::MAX).min(area.height);
    let rect = Rect {
        x: area.x + (area.width.saturating_sub(width)) / 2,
        y: area.y + (area.height.saturating_sub(height)) / 2,
        width,
        height,
    };

    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(color));
    let content = Paragraph::new(vec![
        Line::from(notice.text.as_str()),
        Line::from(""),
        Line::styled("press any key", Style::default().fg(theme.dim)),
    ])
    .wrap(Wrap { trim: true })
    .block(block);

    frame.render_widget(Clear, rect);
    frame.render_widget(content, rect);
}
