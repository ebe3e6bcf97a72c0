use ratatui::{
    Frame,
    layout::Rect,
    style::{Modifier, Style},
    text::Line,
    widgets::{Bar, BarChart, BarGroup},
};

use api_types::stats::CategorySummary;

use crate::ui::{components::card::Card, theme::Theme};

/// Whole currency units, for bar heights.
fn bar_value(amount: f64) -> u64 {
    if amount.is_finite() && amount > 0.0 {
        amount.round() as u64
    } else {
        0
    }
}

/// Spending per category as vertical bars, largest first.
pub fn render_category_bars(
    frame: &mut Frame<'_>,
    area: Rect,
    title: &str,
    groups: &[CategorySummary],
    theme: &Theme,
) {
    let bars: Vec<Bar<'_>> = groups
        .iter()
        .map(|group| {
            Bar::default()
                .label(Line::from(group.category.as_str()))
                .value(bar_value(group.total))
                .text_value(format!("{:.0}", group.total))
        })
        .collect();

    let chart = BarChart::default()
        .data(BarGroup::default().bars(&bars))
        .bar_width(8)
        .bar_gap(2)
        .bar_style(Style::default().fg(theme.accent))
        .value_style(Style::default().fg(theme.text).add_modifier(Modifier::BOLD))
        .label_style(Style::default().fg(theme.dim));

    Card::new(title, theme).render_with(frame, area, chart);
}

/// `████░░░░` filled to `percentage`, capped at full.
#[must_use]
pub fn percentage_bar(percentage: f64, width: usize) -> String {
    let ratio = (percentage / 100.0).clamp(0.0, 1.0);
    let filled = ((ratio * width as f64).round() as usize).min(width);
    format!("{}{}", "█".repeat(filled), "░".repeat(width - filled))
}
