use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::Style,
    text::Line,
    widgets::Paragraph,
};

use crate::{
    app::{AppState, ExpenseField, ExpenseForm},
    ui::{
        components::form::{FormRow, render_form},
        theme::Theme,
    },
};

pub fn render(frame: &mut Frame<'_>, area: Rect, state: &AppState) {
    let theme = Theme::default();
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(7), Constraint::Min(0)])
        .split(area);

    render_expense_form(frame, layout[0], "Add expense", &state.add, &theme);

    let known: Vec<&str> = state
        .categories
        .items
        .iter()
        .map(|c| c.name.as_str())
        .collect();
    let help = if known.is_empty() {
        "Date is YYYY-MM-DD and defaults to today.".to_string()
    } else {
        format!(
            "Date is YYYY-MM-DD and defaults to today. Categories: {}",
            known.join(", ")
        )
    };
    frame.render_widget(
        Paragraph::new(Line::styled(help, Style::default().fg(theme.dim))),
        layout[1],
    );
}

/// Shared by the add screen and the edit view of the expense list.
pub fn render_expense_form(
    frame: &mut Frame<'_>,
    area: Rect,
    title: &str,
    form: &ExpenseForm,
    theme: &Theme,
) {
    let rows: Vec<FormRow<'_>> = ExpenseField::ALL
        .iter()
        .map(|field| FormRow {
            label: field.label(),
            value: form.value(*field),
            focused: form.focus == *field,
            locked: false,
        })
        .collect();
    render_form(frame, area, title, &rows, theme);
}
