//! JSON shapes shared by the HTTP server and its clients.
//!
//! Field names are camelCase on the wire.

use serde::{Deserialize, Serialize};

/// A number as clients send it: JSON number or numeric string.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum NumberValue {
    Number(f64),
    Text(String),
}

/// Body of a delete confirmation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub message: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Health {
    pub status: String,
    /// Seconds since the server started.
    pub uptime: f64,
}

pub mod error {
    use super::*;

    /// Body of every non-validation failure.
    #[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
    pub struct ErrorBody {
        pub error: String,
    }

    #[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
    pub struct FieldErrorView {
        pub field: String,
        pub message: String,
    }

    /// Body of a 400 caused by field validation.
    #[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
    pub struct ValidationErrorBody {
        pub errors: Vec<FieldErrorView>,
    }
}

pub mod expense {
    use chrono::{DateTime, NaiveDate, Utc};
    use uuid::Uuid;

    use super::*;

    /// Create/update body. Every field is optional at this level; the server
    /// reports missing required ones as field errors.
    #[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct ExpensePayload {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub description: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub amount: Option<NumberValue>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub category: Option<String>,
        /// `YYYY-MM-DD` or an RFC 3339 timestamp.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub date: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub notes: Option<String>,
    }

    #[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct ExpenseView {
        pub id: Uuid,
        pub description: String,
        pub amount: f64,
        pub category: String,
        pub date: NaiveDate,
        pub notes: Option<String>,
        pub created_at: DateTime<Utc>,
        pub updated_at: DateTime<Utc>,
    }

    #[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
    pub struct Pagination {
        pub page: u64,
        pub limit: u64,
        pub total: u64,
        pub pages: u64,
    }

    #[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
    pub struct ExpenseListResponse {
        pub expenses: Vec<ExpenseView>,
        pub pagination: Pagination,
    }

    /// Listing and export query string. Values stay raw strings so that the
    /// server can report malformed ones as field errors.
    #[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct ExpenseQuery {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub start_date: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub end_date: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub category: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub limit: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub page: Option<String>,
    }
}

pub mod stats {
    use super::*;

    /// `startDate`/`endDate` query of the aggregate endpoints.
    #[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct RangeQuery {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub start_date: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub end_date: Option<String>,
    }

    #[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
    pub struct CategorySummary {
        pub category: String,
        pub total: f64,
        pub count: u64,
        pub average: f64,
    }

    #[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct SummaryResponse {
        pub by_category: Vec<CategorySummary>,
        pub total: f64,
        pub count: u64,
    }

    #[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct BudgetStatusView {
        pub category: String,
        pub budget: f64,
        pub spent: f64,
        pub remaining: f64,
        pub percentage: f64,
        pub over_budget: bool,
    }
}

pub mod category {
    use chrono::{DateTime, Utc};

    use super::*;

    #[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
    pub struct CategoryPayload {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub name: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub budget: Option<NumberValue>,
        /// `#RRGGBB`.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub color: Option<String>,
    }

    #[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct CategoryView {
        pub name: String,
        pub budget: f64,
        pub color: String,
        pub created_at: DateTime<Utc>,
        pub updated_at: DateTime<Utc>,
    }
}
