use ratatui::{style::Style, text::Span};

use crate::ui::theme::Theme;

/// `$1,234.50`, with a leading minus for negatives.
#[must_use]
pub fn format_amount(amount: f64) -> String {
    let cents = (amount.abs() * 100.0).round() as u64;
    let units = (cents / 100).to_string();
    let mut grouped = String::with_capacity(units.len() + units.len() / 3);
    for (i, ch) in units.chars().enumerate() {
        if i > 0 && (units.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    let sign = if amount < 0.0 && cents > 0 { "-" } else { "" };
    format!("{sign}${grouped}.{:02}", cents % 100)
}

/// Remaining budget; red once negative.
#[must_use]
pub fn styled_remaining(amount: f64, theme: &Theme) -> Span<'static> {
    let color = if amount < 0.0 { theme.error } else { theme.positive };
    Span::styled(format_amount(amount), Style::default().fg(color))
}
