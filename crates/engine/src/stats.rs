//! Read-side aggregates: per-category totals and budget status.
//!
//! These are plain values computed from rows the store hands back; nothing
//! here is cached or maintained incrementally.

use crate::{EngineError, Money, ResultEngine};

/// Spending of one category inside a filtered expense set.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CategoryTotal {
    pub category: String,
    pub total: Money,
    pub count: u64,
}

impl CategoryTotal {
    /// Mean amount in whole units (0 for an empty group).
    pub fn average(&self) -> f64 {
        if self.count == 0 {
            return 0.0;
        }
        self.total.cents() as f64 / self.count as f64 / 100.0
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Summary {
    /// Sorted by total descending, ties by category name.
    pub by_category: Vec<CategoryTotal>,
    pub total: Money,
    pub count: u64,
}

impl Summary {
    /// Builds the summary from grouped rows; grand totals are the sums of
    /// the groups.
    pub fn from_groups(mut groups: Vec<CategoryTotal>) -> ResultEngine<Self> {
        groups.sort_by(|a, b| {
            b.total
                .cmp(&a.total)
                .then_with(|| a.category.cmp(&b.category))
        });
        let total = groups
            .iter()
            .try_fold(Money::ZERO, |acc, g| acc.checked_add(g.total))
            .ok_or_else(|| EngineError::AmountOverflow("summary total".to_string()))?;
        let count = groups.iter().map(|g| g.count).sum();
        Ok(Self {
            by_category: groups,
            total,
            count,
        })
    }
}

/// Spend of one category compared with its budget.
#[derive(Clone, Debug, PartialEq)]
pub struct BudgetStatus {
    pub category: String,
    pub budget: Money,
    pub spent: Money,
    pub remaining: Money,
    /// `spent / budget * 100` rounded to 2 decimals, 0 without a budget.
    pub percentage: f64,
    pub over_budget: bool,
}

impl BudgetStatus {
    pub fn compute(category: String, budget: Money, spent: Money) -> ResultEngine<Self> {
        let remaining = budget.checked_sub(spent).ok_or_else(|| {
            EngineError::AmountOverflow(format!("remaining budget of {category}"))
        })?;
        let percentage = if budget.is_positive() {
            round2(spent.cents() as f64 / budget.cents() as f64 * 100.0)
        } else {
            0.0
        };
        Ok(Self {
            category,
            budget,
            spent,
            remaining,
            percentage,
            over_budget: remaining.is_negative(),
        })
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
