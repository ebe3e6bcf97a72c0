//! The module contains the error the engine can throw.
//!
//! The errors are:
//!
//! - [`Validation`] thrown when a payload or a query fails field checks.
//! - [`KeyNotFound`] thrown when an expense or a category does not exist.
//! - [`ExistingKey`] thrown when a category name is already taken.
//! - [`AmountOverflow`] thrown when an aggregate no longer fits in cents.
//!
//!  [`Validation`]: EngineError::Validation
//!  [`KeyNotFound`]: EngineError::KeyNotFound
//!  [`ExistingKey`]: EngineError::ExistingKey
//!  [`AmountOverflow`]: EngineError::AmountOverflow
use sea_orm::DbErr;
use thiserror::Error;

use crate::validation::ValidationErrors;

/// Engine custom errors.
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("validation failed: {0}")]
    Validation(ValidationErrors),
    #[error("{0} not found")]
    KeyNotFound(String),
    #[error("{0} already exists")]
    ExistingKey(String),
    #[error("amount overflow: {0}")]
    AmountOverflow(String),
    #[error("export failed: {0}")]
    Export(String),
    #[error(transparent)]
    Database(#[from] DbErr),
}

impl From<ValidationErrors> for EngineError {
    fn from(value: ValidationErrors) -> Self {
        Self::Validation(value)
    }
}

impl PartialEq for EngineError {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Validation(a), Self::Validation(b)) => a == b,
            (Self::KeyNotFound(a), Self::KeyNotFound(b)) => a == b,
            (Self::ExistingKey(a), Self::ExistingKey(b)) => a == b,
            (Self::AmountOverflow(a), Self::AmountOverflow(b)) => a == b,
            (Self::Export(a), Self::Export(b)) => a == b,
            (Self::Database(a), Self::Database(b)) => a.to_string() == b.to_string(),
            _ => false,
        }
    }
}
