use sea_orm::{DatabaseConnection, QueryFilter, prelude::*};

use crate::{DateRange, ExpenseFilter, ResultEngine, expenses::Column as ExpenseColumn};

mod categories;
mod expenses;
mod export;
mod stats;

pub use expenses::ExpensePage;

/// Run a block inside a DB transaction, committing on success and rolling back on error.
macro_rules! with_tx {
    ($self:expr, |$tx:ident| $body:expr) => {{
        let $tx = $self.database.begin().await?;
        let result = $body;
        match result {
            Ok(value) => {
                $tx.commit().await?;
                Ok(value)
            }
            Err(err) => Err(err),
        }
    }};
}

pub(crate) use with_tx;

#[derive(Debug, Clone)]
pub struct Engine {
    database: DatabaseConnection,
}

impl Engine {
    /// Return a builder for `Engine`. Help to build the struct.
    pub fn builder() -> EngineBuilder {
        EngineBuilder::default()
    }
}

/// Query helpers shared by listing, export and the aggregates.
trait ApplyExpenseFilters: QueryFilter + Sized {
    fn apply_date_range(self, range: &DateRange) -> Self;
    fn apply_expense_filter(self, filter: &ExpenseFilter) -> Self;
}

impl<T> ApplyExpenseFilters for T
where
    T: QueryFilter + Sized,
{
    fn apply_date_range(mut self, range: &DateRange) -> Self {
        if let Some(start) = range.start {
            self = self.filter(ExpenseColumn::Date.gte(start));
        }
        if let Some(end) = range.end {
            self = self.filter(ExpenseColumn::Date.lte(end));
        }
        self
    }

    fn apply_expense_filter(mut self, filter: &ExpenseFilter) -> Self {
        self = self.apply_date_range(&filter.range);
        if let Some(category) = &filter.category {
            self = self.filter(ExpenseColumn::Category.eq(category.as_str()));
        }
        self
    }
}

/// The builder for `Engine`
#[derive(Default)]
pub struct EngineBuilder {
    database: DatabaseConnection,
}

impl EngineBuilder {
    /// Pass the required database
    pub fn database(mut self, db: DatabaseConnection) -> EngineBuilder {
        self.database = db;
        self
    }

    /// Construct `Engine`
    pub async fn build(self) -> ResultEngine<Engine> {
        self.database.ping().await?;
        Ok(Engine {
            database: self.database,
        })
    }
}
