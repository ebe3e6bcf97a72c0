use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
};

use crate::{
    app::{AppState, CategoriesMode, CategoryField},
    ui::{
        components::{
            form::{FormRow, render_form},
            money::format_amount,
        },
        theme::{Theme, parse_hex},
    },
};

pub fn render(frame: &mut Frame<'_>, area: Rect, state: &AppState) {
    let theme = Theme::default();
    let categories = &state.categories;

    let top = match categories.mode {
        CategoriesMode::Form => 5,
        CategoriesMode::List | CategoriesMode::ConfirmDelete => 3,
    };
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(top), Constraint::Min(0)])
        .split(area);

    match categories.mode {
        CategoriesMode::Form => {
            let form = &categories.form;
            let title = if form.editing.is_some() {
                "Edit category"
            } else {
                "New category"
            };
            let rows: Vec<FormRow<'_>> = CategoryField::ALL
                .iter()
                .map(|field| FormRow {
                    label: field.label(),
                    value: form.value(*field),
                    focused: form.focus == *field,
                    locked: *field == CategoryField::Name && form.editing.is_some(),
                })
                .collect();
            render_form(frame, layout[0], title, &rows, &theme);
        }
        CategoriesMode::List | CategoriesMode::ConfirmDelete => {
            let mut line = vec![Span::styled(
                format!("{} categories", categories.items.len()),
                Style::default().fg(theme.dim),
            )];
            if categories.mode == CategoriesMode::ConfirmDelete
                && let Some(category) = categories.selected_category()
            {
                line.push(Span::styled(
                    format!("   Delete \"{}\"? Its expenses are kept. y/n", category.name),
                    Style::default().fg(theme.error).add_modifier(Modifier::BOLD),
                ));
            }
            let block = Block::default().borders(Borders::ALL).title("Categories");
            frame.render_widget(Paragraph::new(Line::from(line)).block(block), layout[0]);
        }
    }

    let items: Vec<ListItem<'_>> = categories
        .items
        .iter()
        .map(|category| {
            let swatch = parse_hex(&category.color).unwrap_or(theme.accent);
            ListItem::new(Line::from(vec![
                Span::styled("■ ", Style::default().fg(swatch)),
                Span::raw(format!("{:<20}", category.name)),
                Span::styled("budget ", Style::default().fg(theme.dim)),
                Span::raw(format!("{:<14}", format_amount(category.budget))),
                Span::styled(category.color.clone(), Style::default().fg(theme.dim)),
            ]))
        })
        .collect();

    let mut list_state = ListState::default();
    if !items.is_empty() {
        list_state.select(Some(categories.selected));
    }

    let list = List::new(items)
        .block(Block::default().borders(Borders::ALL))
        .highlight_style(
            Style::default()
                .fg(theme.accent)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("» ");

    frame.render_stateful_widget(list, layout[1], &mut list_state);
}
