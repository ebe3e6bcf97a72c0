//! Budget categories, keyed by their normalized name.

use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;

use crate::Money;

pub const DEFAULT_COLOR: &str = "#3B82F6";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Category {
    pub name: String,
    pub budget: Money,
    pub color: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "categories")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub name: String,
    pub budget_minor: i64,
    pub color: String,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for Category {
    fn from(model: Model) -> Self {
        Self {
            name: model.name,
            budget: Money::new(model.budget_minor),
            color: model.color,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}
