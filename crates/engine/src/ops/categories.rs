use chrono::Utc;
use sea_orm::{ActiveValue, QueryOrder, SqlErr, TransactionTrait, prelude::*};

use crate::{
    Category, CategoryInput, DEFAULT_COLOR, EngineError, Money, ResultEngine, categories,
    normalize_category_key,
    validation::{validate_category, validate_category_update},
};

use super::{Engine, with_tx};

fn not_found() -> EngineError {
    EngineError::KeyNotFound("Category".to_string())
}

fn already_exists() -> EngineError {
    EngineError::ExistingKey("Category".to_string())
}

impl Engine {
    /// All categories, by name.
    pub async fn list_categories(&self) -> ResultEngine<Vec<Category>> {
        let models = categories::Entity::find()
            .order_by_asc(categories::Column::Name)
            .all(&self.database)
            .await?;
        Ok(models.into_iter().map(Category::from).collect())
    }

    /// Looks a category up by name; the lookup is case-insensitive.
    pub async fn category(&self, name: &str) -> ResultEngine<Category> {
        categories::Entity::find_by_id(normalize_category_key(name))
            .one(&self.database)
            .await?
            .map(Category::from)
            .ok_or_else(not_found)
    }

    /// Creates a category. Names are unique after normalization.
    pub async fn create_category(&self, input: &CategoryInput) -> ResultEngine<Category> {
        let draft = validate_category(input)?;

        with_tx!(self, |db_tx| {
            let existing = categories::Entity::find_by_id(draft.name.clone())
                .one(&db_tx)
                .await?;
            if existing.is_some() {
                return Err(already_exists());
            }

            let now = Utc::now();
            let active = categories::ActiveModel {
                name: ActiveValue::Set(draft.name),
                budget_minor: ActiveValue::Set(draft.budget.unwrap_or(Money::ZERO).cents()),
                color: ActiveValue::Set(draft.color.unwrap_or_else(|| DEFAULT_COLOR.to_string())),
                created_at: ActiveValue::Set(now),
                updated_at: ActiveValue::Set(now),
            };
            let model = match active.insert(&db_tx).await {
                Ok(model) => model,
                // Lost a race with a concurrent create of the same name.
                Err(err) if matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) => {
                    return Err(already_exists());
                }
                Err(err) => return Err(err.into()),
            };
            Ok::<_, EngineError>(Category::from(model))
        })
    }

    /// Applies the budget and/or color of `input` to an existing category.
    pub async fn update_category(
        &self,
        name: &str,
        input: &CategoryInput,
    ) -> ResultEngine<Category> {
        let patch = validate_category_update(name, input)?;

        with_tx!(self, |db_tx| {
            let model = categories::Entity::find_by_id(normalize_category_key(name))
                .one(&db_tx)
                .await?
                .ok_or_else(not_found)?;

            let mut active: categories::ActiveModel = model.into();
            if let Some(budget) = patch.budget {
                active.budget_minor = ActiveValue::Set(budget.cents());
            }
            if let Some(color) = patch.color {
                active.color = ActiveValue::Set(color);
            }
            active.updated_at = ActiveValue::Set(Utc::now());

            let updated = active.update(&db_tx).await?;
            Ok::<_, EngineError>(Category::from(updated))
        })
    }

    /// Deletes a category. Expenses referencing it are left untouched.
    pub async fn delete_category(&self, name: &str) -> ResultEngine<()> {
        let result = categories::Entity::delete_by_id(normalize_category_key(name))
            .exec(&self.database)
            .await?;
        if result.rows_affected == 0 {
            return Err(not_found());
        }
        Ok(())
    }
}
