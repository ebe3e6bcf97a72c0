use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Row, Table, TableState},
};

use crate::{
    app::{AppState, ExpensesMode, FilterField},
    ui::{
        components::{
            form::{FormRow, render_form},
            money::format_amount,
        },
        screens::add_expense::render_expense_form,
        theme::Theme,
    },
};

pub fn render(frame: &mut Frame<'_>, area: Rect, state: &AppState) {
    let theme = Theme::default();
    let expenses = &state.expenses;

    match expenses.mode {
        ExpensesMode::Edit => {
            let layout = Layout::default()
                .direction(Direction::Vertical)
                .constraints([Constraint::Length(7), Constraint::Min(0)])
                .split(area);
            render_expense_form(frame, layout[0], "Edit expense", &expenses.form, &theme);
            render_table(frame, layout[1], state, &theme);
        }
        ExpensesMode::Filter => {
            let layout = Layout::default()
                .direction(Direction::Vertical)
                .constraints([Constraint::Length(5), Constraint::Min(0)])
                .split(area);
            let rows: Vec<FormRow<'_>> = FilterField::ALL
                .iter()
                .map(|field| FormRow {
                    label: field.label(),
                    value: expenses.filter.value(*field),
                    focused: expenses.filter.focus == *field,
                    locked: false,
                })
                .collect();
            render_form(frame, layout[0], "Filter", &rows, &theme);
            render_table(frame, layout[1], state, &theme);
        }
        ExpensesMode::List | ExpensesMode::ConfirmDelete => {
            let layout = Layout::default()
                .direction(Direction::Vertical)
                .constraints([Constraint::Length(3), Constraint::Min(0)])
                .split(area);
            render_header(frame, layout[0], state, &theme);
            render_table(frame, layout[1], state, &theme);
        }
    }
}

fn render_header(frame: &mut Frame<'_>, area: Rect, state: &AppState, theme: &Theme) {
    let expenses = &state.expenses;
    let applied = &expenses.applied;
    let filter = if applied.is_empty() {
        "none".to_string()
    } else {
        FilterField::ALL
            .iter()
            .filter(|field| !applied.value(**field).trim().is_empty())
            .map(|field| format!("{} {}", field.label(), applied.value(*field).trim()))
            .collect::<Vec<_>>()
            .join(", ")
    };
    let (page, pages, total) = expenses
        .pagination
        .map(|p| (p.page, p.pages, p.total))
        .unwrap_or((1, 0, 0));

    let mut line = vec![
        Span::styled("Filter", Style::default().fg(theme.dim)),
        Span::raw(format!(": {filter}   ")),
        Span::styled("Page", Style::default().fg(theme.dim)),
        Span::raw(format!(": {page}/{}   ", pages.max(1))),
        Span::styled("Total", Style::default().fg(theme.dim)),
        Span::raw(format!(": {total}")),
    ];
    if expenses.mode == ExpensesMode::ConfirmDelete
        && let Some(expense) = expenses.selected_expense()
    {
        line.push(Span::styled(
            format!("   Delete \"{}\"? y/n", expense.description),
            Style::default().fg(theme.error).add_modifier(Modifier::BOLD),
        ));
    }

    let block = Block::default().borders(Borders::ALL).title("Expenses");
    frame.render_widget(Paragraph::new(Line::from(line)).block(block), area);
}

fn render_table(frame: &mut Frame<'_>, area: Rect, state: &AppState, theme: &Theme) {
    let expenses = &state.expenses;
    if expenses.items.is_empty() {
        let block = Block::default().borders(Borders::ALL);
        frame.render_widget(
            Paragraph::new(Line::styled(
                "No expenses found",
                Style::default().fg(theme.dim),
            ))
            .block(block),
            area,
        );
        return;
    }

    let rows = expenses.items.iter().map(|expense| {
        Row::new(vec![
            expense.date.format("%Y-%m-%d").to_string(),
            expense.description.clone(),
            expense.category.clone(),
            format_amount(expense.amount),
            expense.notes.clone().unwrap_or_default(),
        ])
    });

    let header = Row::new(["Date", "Description", "Category", "Amount", "Notes"])
        .style(Style::default().fg(theme.dim).add_modifier(Modifier::BOLD));
    let table = Table::new(
        rows,
        [
            Constraint::Length(10),
            Constraint::Percentage(35),
            Constraint::Length(14),
            Constraint::Length(12),
            Constraint::Min(0),
        ],
    )
    .header(header)
    .block(Block::default().borders(Borders::ALL))
    .row_highlight_style(
        Style::default()
            .fg(theme.accent)
            .add_modifier(Modifier::BOLD),
    )
    .highlight_symbol("» ");

    let mut table_state = TableState::default();
    table_state.select(Some(expenses.selected));
    frame.render_stateful_widget(table, area, &mut table_state);
}
