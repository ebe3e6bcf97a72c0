use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
};

use crate::{
    app::AppState,
    ui::{
        components::{
            card::{Card, StatCard},
            charts::{percentage_bar, render_category_bars},
            money::{format_amount, styled_remaining},
        },
        theme::Theme,
    },
};

pub fn render(frame: &mut Frame<'_>, area: Rect, state: &AppState) {
    let theme = Theme::default();
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(4),
            Constraint::Percentage(45),
            Constraint::Min(0),
        ])
        .split(area);

    render_stats(frame, layout[0], state, &theme);

    let title = format!("Expenses by category ({})", state.dashboard.range.label());
    match state.summary.as_ref() {
        Some(summary) if !summary.by_category.is_empty() => {
            render_category_bars(frame, layout[1], &title, &summary.by_category, &theme);
        }
        _ => Card::new(&title, &theme).render_with(
            frame,
            layout[1],
            Paragraph::new(Line::styled(
                "No expense data available",
                Style::default().fg(theme.dim),
            )),
        ),
    }

    render_budgets(frame, layout[2], state, &theme);
}

fn render_stats(frame: &mut Frame<'_>, area: Rect, state: &AppState, theme: &Theme) {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Ratio(1, 3); 3])
        .split(area);

    let totals = state.totals();
    let count = state.summary.as_ref().map(|s| s.count).unwrap_or_default();
    let used = if totals.budget > 0.0 {
        format!("{:.1}% used", totals.spent / totals.budget * 100.0)
    } else {
        "No budget set".to_string()
    };

    StatCard::new("Total expenses", format_amount(totals.spent), theme)
        .subtitle(Span::styled(
            format!("{count} transactions"),
            Style::default().fg(theme.dim),
        ))
        .render(frame, columns[0]);
    StatCard::new("Total budget", format_amount(totals.budget), theme)
        .subtitle(Span::styled(
            format!("Across {} categories", state.categories.items.len()),
            Style::default().fg(theme.dim),
        ))
        .render(frame, columns[1]);

    let used_color = if totals.remaining < 0.0 {
        theme.error
    } else {
        theme.dim
    };
    StatCard::new("Remaining", format_amount(totals.remaining), theme)
        .subtitle(Span::styled(used, Style::default().fg(used_color)))
        .render(frame, columns[2]);
}

fn render_budgets(frame: &mut Frame<'_>, area: Rect, state: &AppState, theme: &Theme) {
    let card = Card::new("Budget status by category", theme);
    let inner = card.inner(area);
    let bar_width = usize::from(inner.width / 3).max(10);

    let lines: Vec<Line<'_>> = if state.dashboard.budgets.is_empty() {
        vec![Line::styled("No categories yet", Style::default().fg(theme.dim))]
    } else {
        state
            .dashboard
            .budgets
            .iter()
            .map(|status| {
                let color = state
                    .categories
                    .items
                    .iter()
                    .find(|c| c.name == status.category)
                    .map(|c| c.color.as_str())
                    .unwrap_or_default();
                let badge = if status.over_budget {
                    Span::styled(" over ", Style::default().fg(theme.error).add_modifier(Modifier::BOLD))
                } else {
                    Span::styled(" under", Style::default().fg(theme.positive))
                };
                Line::from(vec![
                    Span::styled(format!("{:<14}", status.category), Style::default().fg(theme.text)),
                    Span::styled(
                        percentage_bar(status.percentage, bar_width),
                        Style::default().fg(theme.budget(color, status.over_budget)),
                    ),
                    Span::raw(format!(" {:>6.1}% ", status.percentage)),
                    badge,
                    Span::styled(
                        format!(
                            "  spent {} of {}  left ",
                            format_amount(status.spent),
                            format_amount(status.budget)
                        ),
                        Style::default().fg(theme.dim),
                    ),
                    styled_remaining(status.remaining, theme),
                ])
            })
            .collect()
    };

    card.render_with(frame, area, Paragraph::new(lines));
}
