use sea_orm::{FromQueryResult, QuerySelect, prelude::*};

use crate::{
    BudgetStatus, CategoryTotal, DateRange, Money, ResultEngine, Summary, expenses,
};

use super::{ApplyExpenseFilters, Engine};

#[derive(Debug, FromQueryResult)]
struct CategoryTotalRow {
    category: String,
    total: i64,
    count: i64,
}

#[derive(Debug, FromQueryResult)]
struct SpentRow {
    spent: Option<i64>,
}

impl From<CategoryTotalRow> for CategoryTotal {
    fn from(row: CategoryTotalRow) -> Self {
        Self {
            category: row.category,
            total: Money::new(row.total),
            count: u64::try_from(row.count).unwrap_or_default(),
        }
    }
}

impl Engine {
    /// Groups expenses in `range` by category with total, count and average.
    pub async fn summary(&self, range: &DateRange) -> ResultEngine<Summary> {
        let rows = expenses::Entity::find()
            .select_only()
            .column(expenses::Column::Category)
            .column_as(expenses::Column::AmountMinor.sum(), "total")
            .column_as(expenses::Column::Id.count(), "count")
            .apply_date_range(range)
            .group_by(expenses::Column::Category)
            .into_model::<CategoryTotalRow>()
            .all(&self.database)
            .await?;

        Summary::from_groups(rows.into_iter().map(CategoryTotal::from).collect())
    }

    /// Compares what was spent in a category during `range` with its budget.
    ///
    /// Expenses are matched on the stored (normalized) category name.
    pub async fn budget_status(&self, name: &str, range: &DateRange) -> ResultEngine<BudgetStatus> {
        let category = self.category(name).await?;

        let spent = expenses::Entity::find()
            .select_only()
            .column_as(expenses::Column::AmountMinor.sum(), "spent")
            .filter(expenses::Column::Category.eq(category.name.as_str()))
            .apply_date_range(range)
            .into_model::<SpentRow>()
            .one(&self.database)
            .await?
            .and_then(|row| row.spent)
            .unwrap_or_default();

        BudgetStatus::compute(category.name, category.budget, Money::new(spent))
    }
}
