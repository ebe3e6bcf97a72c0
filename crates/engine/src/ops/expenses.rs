use chrono::Utc;
use sea_orm::{
    ActiveValue, PaginatorTrait, QueryOrder, QuerySelect, Select, TransactionTrait,
    prelude::*,
};
use uuid::Uuid;

use crate::{
    EngineError, Expense, ExpenseFilter, ExpenseInput, PageRequest, ResultEngine, expenses,
    validation::validate_expense,
};

use super::{ApplyExpenseFilters, Engine, with_tx};

/// One page of a filtered expense listing.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExpensePage {
    pub expenses: Vec<Expense>,
    pub page: u64,
    pub limit: u64,
    /// Matching expenses across all pages.
    pub total: u64,
    pub pages: u64,
}

fn not_found() -> EngineError {
    EngineError::KeyNotFound("Expense".to_string())
}

/// Newest first; creation time and id keep pages stable for equal dates.
fn newest_first(query: Select<expenses::Entity>) -> Select<expenses::Entity> {
    query
        .order_by_desc(expenses::Column::Date)
        .order_by_desc(expenses::Column::CreatedAt)
        .order_by_desc(expenses::Column::Id)
}

impl Engine {
    /// Validates and stores a new expense.
    ///
    /// A missing date defaults to the current UTC day.
    pub async fn create_expense(&self, input: &ExpenseInput) -> ResultEngine<Expense> {
        let draft = validate_expense(input)?;
        let now = Utc::now();

        let active = expenses::ActiveModel {
            id: ActiveValue::Set(Uuid::new_v4()),
            description: ActiveValue::Set(draft.description),
            amount_minor: ActiveValue::Set(draft.amount.cents()),
            category: ActiveValue::Set(draft.category),
            date: ActiveValue::Set(draft.date.unwrap_or_else(|| now.date_naive())),
            notes: ActiveValue::Set(draft.notes),
            created_at: ActiveValue::Set(now),
            updated_at: ActiveValue::Set(now),
        };
        let model = active.insert(&self.database).await?;

        Ok(model.into())
    }

    pub async fn expense(&self, id: Uuid) -> ResultEngine<Expense> {
        expenses::Entity::find_by_id(id)
            .one(&self.database)
            .await?
            .map(Expense::from)
            .ok_or_else(not_found)
    }

    /// Overwrites every field of an expense with a validated payload.
    ///
    /// The stored date is kept when the payload has none.
    pub async fn update_expense(&self, id: Uuid, input: &ExpenseInput) -> ResultEngine<Expense> {
        let draft = validate_expense(input)?;

        with_tx!(self, |db_tx| {
            let model = expenses::Entity::find_by_id(id)
                .one(&db_tx)
                .await?
                .ok_or_else(not_found)?;

            let date = draft.date.unwrap_or(model.date);
            let mut active: expenses::ActiveModel = model.into();
            active.description = ActiveValue::Set(draft.description);
            active.amount_minor = ActiveValue::Set(draft.amount.cents());
            active.category = ActiveValue::Set(draft.category);
            active.date = ActiveValue::Set(date);
            active.notes = ActiveValue::Set(draft.notes);
            active.updated_at = ActiveValue::Set(Utc::now());

            let updated = active.update(&db_tx).await?;
            Ok::<_, EngineError>(Expense::from(updated))
        })
    }

    pub async fn delete_expense(&self, id: Uuid) -> ResultEngine<()> {
        let result = expenses::Entity::delete_by_id(id)
            .exec(&self.database)
            .await?;
        if result.rows_affected == 0 {
            return Err(not_found());
        }
        Ok(())
    }

    /// Lists expenses matching `filter`, newest first, one page at a time.
    ///
    /// `pages` is `ceil(total / limit)`; a page past the end is empty.
    pub async fn list_expenses(
        &self,
        filter: &ExpenseFilter,
        page: PageRequest,
    ) -> ResultEngine<ExpensePage> {
        with_tx!(self, |db_tx| {
            let total = expenses::Entity::find()
                .apply_expense_filter(filter)
                .count(&db_tx)
                .await?;

            let models = newest_first(expenses::Entity::find().apply_expense_filter(filter))
                .offset(page.offset())
                .limit(page.limit)
                .all(&db_tx)
                .await?;

            Ok::<_, EngineError>(ExpensePage {
                expenses: models.into_iter().map(Expense::from).collect(),
                page: page.page,
                limit: page.limit,
                total,
                pages: total.div_ceil(page.limit),
            })
        })
    }

    /// Every expense matching `filter`, in listing order.
    pub async fn all_expenses(&self, filter: &ExpenseFilter) -> ResultEngine<Vec<Expense>> {
        let models = newest_first(expenses::Entity::find().apply_expense_filter(filter))
            .all(&self.database)
            .await?;
        Ok(models.into_iter().map(Expense::from).collect())
    }
}
