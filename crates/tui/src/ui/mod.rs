pub mod components;
pub mod keymap;
pub mod screens;

mod terminal;
mod theme;

use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::Paragraph,
};

use crate::app::{AppState, CategoriesMode, ExpensesMode, Section};

pub use terminal::{AppTerminal as Terminal, restore_terminal, setup_terminal};
pub use theme::Theme;

pub fn render(frame: &mut Frame<'_>, state: &AppState) {
    let area = frame.area();
    let theme = Theme::default();

    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Info bar
            Constraint::Length(2), // Tabs
            Constraint::Min(0),    // Content
            Constraint::Length(1), // Hints
        ])
        .split(area);

    render_info_bar(frame, layout[0], state, &theme);
    components::tabs::render_tabs(frame, layout[1], state.section, &theme);

    match state.section {
        Section::Dashboard => screens::dashboard::render(frame, layout[2], state),
        Section::Expenses => screens::expenses::render(frame, layout[2], state),
        Section::AddExpense => screens::add_expense::render(frame, layout[2], state),
        Section::Categories => screens::categories::render(frame, layout[2], state),
    }

    render_bottom_bar(frame, layout[3], state, &theme);
    components::notice::render(frame, area, state.notice.as_ref(), &theme);
}

fn render_info_bar(frame: &mut Frame<'_>, area: Rect, state: &AppState, theme: &Theme) {
    let refresh = state
        .last_refresh
        .map(|dt| dt.format("%H:%M:%S").to_string())
        .unwrap_or_else(|| "-".to_string());
    let (status, color) = if state.connected {
        ("OK", theme.positive)
    } else {
        ("OFFLINE", theme.error)
    };

    let line = Line::from(vec![
        Span::styled("Server", Style::default().fg(theme.dim)),
        Span::raw(format!(": {}  ", state.base_url)),
        Span::styled("Range", Style::default().fg(theme.dim)),
        Span::raw(format!(": {}  ", state.dashboard.range.label())),
        Span::styled("Refresh", Style::default().fg(theme.dim)),
        Span::raw(format!(": {refresh}  ")),
        Span::styled(status, Style::default().fg(color)),
    ]);

    frame.render_widget(Paragraph::new(line), area);
}

fn render_bottom_bar(frame: &mut Frame<'_>, area: Rect, state: &AppState, theme: &Theme) {
    let separator = || Span::styled("  │  ", Style::default().fg(theme.border));
    let mut parts = Vec::new();

    if !state.is_typing() {
        parts.extend(components::tabs::tab_shortcuts(theme));
        parts.push(separator());
    }
    parts.extend(hints(context_hints(state), theme));
    if !state.is_typing() {
        parts.push(separator());
        parts.extend(hints(&[("r", "refresh"), ("q", "quit")], theme));
    }

    frame.render_widget(Paragraph::new(Line::from(parts)), area);
}

fn context_hints(state: &AppState) -> &'static [(&'static str, &'static str)] {
    const FORM: &[(&str, &str)] = &[
        ("Tab", "next"),
        ("Enter", "save"),
        ("Esc", "cancel"),
    ];
    const CONFIRM: &[(&str, &str)] = &[("y", "confirm"), ("any", "cancel")];

    match state.section {
        Section::Dashboard => &[("w", "week"), ("m", "month"), ("y", "year")],
        Section::AddExpense => FORM,
        Section::Expenses => match state.expenses.mode {
            ExpensesMode::List => &[
                ("↑↓", "select"),
                ("n/p", "page"),
                ("/", "filter"),
                ("c", "clear"),
                ("e", "edit"),
                ("d", "delete"),
                ("x", "export"),
            ],
            ExpensesMode::Filter => &[("Tab", "next"), ("Enter", "apply"), ("Esc", "cancel")],
            ExpensesMode::Edit => FORM,
            ExpensesMode::ConfirmDelete => CONFIRM,
        },
        Section::Categories => match state.categories.mode {
            CategoriesMode::List => &[("↑↓", "select"), ("a", "add"), ("e", "edit"), ("d", "delete")],
            CategoriesMode::Form => FORM,
            CategoriesMode::ConfirmDelete => CONFIRM,
        },
    }
}

fn hints(pairs: &[(&'static str, &'static str)], theme: &Theme) -> Vec<Span<'static>> {
    let mut spans = Vec::with_capacity(pairs.len() * 2);
    for (i, (key, label)) in pairs.iter().enumerate() {
        let gap = if i + 1 < pairs.len() { "  " } else { "" };
        spans.push(Span::styled(*key, Style::default().fg(theme.accent)));
        spans.push(Span::raw(format!(" {label}{gap}")));
    }
    spans
}
