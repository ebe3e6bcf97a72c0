use api_types::{
    category::CategoryView,
    stats::{BudgetStatusView, RangeQuery, SummaryResponse},
};
use chrono::{Datelike, Days, NaiveDate};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TimeRange {
    /// The last 7 days.
    Week,
    /// Since the 1st of the current month.
    #[default]
    Month,
    /// Since January 1st.
    Year,
}

impl TimeRange {
    pub fn label(self) -> &'static str {
        match self {
            Self::Week => "This week",
            Self::Month => "This month",
            Self::Year => "This year",
        }
    }

    pub fn start(self, today: NaiveDate) -> NaiveDate {
        match self {
            Self::Week => today.checked_sub_days(Days::new(7)).unwrap_or(today),
            Self::Month => today.with_day(1).unwrap_or(today),
            Self::Year => today.with_ordinal(1).unwrap_or(today),
        }
    }

    /// Open-ended query from the range start.
    pub fn query(self, today: NaiveDate) -> RangeQuery {
        RangeQuery {
            start_date: Some(self.start(today).format("%Y-%m-%d").to_string()),
            end_date: None,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct DashboardState {
    pub range: TimeRange,
    /// One entry per category, by name.
    pub budgets: Vec<BudgetStatusView>,
}

/// Headline numbers of the dashboard.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Totals {
    pub spent: f64,
    pub budget: f64,
    pub remaining: f64,
}

impl Totals {
    pub fn compute(summary: Option<&SummaryResponse>, categories: &[CategoryView]) -> Self {
        let spent = summary.map(|s| s.total).unwrap_or_default();
        let budget: f64 = categories.iter().map(|c| c.budget).sum();
        Self {
            spent,
            budget,
            remaining: budget - spent,
        }
    }
}

/// Stand-in row for a category whose budget status could not be fetched.
pub fn fallback_status(category: &CategoryView) -> BudgetStatusView {
    BudgetStatusView {
        category: category.name.clone(),
        budget: category.budget,
        spent: 0.0,
        remaining: category.budget,
        percentage: 0.0,
        over_budget: false,
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn range_starts() {
        let today = day(2024, 3, 5);
        assert_eq!(TimeRange::Week.start(today), day(2024, 2, 27));
        assert_eq!(TimeRange::Month.start(today), day(2024, 3, 1));
        assert_eq!(TimeRange::Year.start(today), day(2024, 1, 1));
    }

    #[test]
    fn query_is_open_ended() {
        let query = TimeRange::Month.query(day(2024, 3, 5));
        assert_eq!(query.start_date.as_deref(), Some("2024-03-01"));
        assert_eq!(query.end_date, None);
    }

    #[test]
    fn totals_use_summary_and_budgets() {
        let category = |name: &str, budget: f64| CategoryView {
            name: name.to_string(),
            budget,
            color: "#3B82F6".to_string(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        let summary = SummaryResponse {
            by_category: Vec::new(),
            total: 130.0,
            count: 3,
        };

        let totals = Totals::compute(
            Some(&summary),
            &[category("food", 100.0), category("rent", 50.0)],
        );
        assert_eq!(totals.spent, 130.0);
        assert_eq!(totals.budget, 150.0);
        assert_eq!(totals.remaining, 20.0);

        let fallback = fallback_status(&category("fun", 40.0));
        assert_eq!(fallback.remaining, 40.0);
        assert!(!fallback.over_budget);

        assert_eq!(Totals::compute(None, &[]).spent, 0.0);
    }
}
