use ratatui::{
    Frame,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
};

use crate::ui::{components::card::Card, theme::Theme};

/// One labelled input line.
pub struct FormRow<'a> {
    pub label: &'a str,
    pub value: &'a str,
    pub focused: bool,
    pub locked: bool,
}

/// Renders labelled inputs in a card; the focused row shows a cursor.
pub fn render_form(
    frame: &mut Frame<'_>,
    area: Rect,
    title: &str,
    rows: &[FormRow<'_>],
    theme: &Theme,
) {
    let width = rows.iter().map(|row| row.label.len()).max().unwrap_or(0);
    let lines: Vec<Line<'_>> = rows
        .iter()
        .map(|row| {
            let label_style = if row.focused {
                Style::default()
                    .fg(theme.accent)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(theme.dim)
            };
            let value_style = if row.locked {
                Style::default().fg(theme.dim)
            } else {
                Style::default().fg(theme.text)
            };
            let mut spans = vec![
                Span::styled(format!("{:>width$}  ", row.label), label_style),
                Span::styled(row.value, value_style),
            ];
            if row.focused {
                spans.push(Span::styled("▏", Style::default().fg(theme.accent)));
            }
            Line::from(spans)
        })
        .collect();

    Card::new(title, theme)
        .focused(true)
        .render_with(frame, area, Paragraph::new(lines));
}
