//! Expense tracking engine.
//!
//! Owns the record store (expenses and categories over sea-orm), the
//! validation layer, the aggregation queries and the CSV export. Callers talk
//! to it through [`Engine`].

pub use categories::{Category, DEFAULT_COLOR};
pub use error::EngineError;
pub use expenses::Expense;
pub use money::{Money, ParseMoneyError};
pub use ops::{Engine, EngineBuilder, ExpensePage};
pub use stats::{BudgetStatus, CategoryTotal, Summary};
pub use validation::{
    CategoryInput, DateRange, ExpenseFilter, ExpenseInput, FieldError, MAX_AMOUNT, NumberInput,
    PageRequest, ValidationErrors, date_range, expense_filter, normalize_category_key,
    page_request,
};

mod categories;
mod error;
mod expenses;
mod money;
mod ops;
mod stats;
pub mod validation;

type ResultEngine<T> = Result<T, EngineError>;
