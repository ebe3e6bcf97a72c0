use api_types::{
    NumberValue,
    error::{ErrorBody, FieldErrorView, ValidationErrorBody},
};
use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use engine::{EngineError, NumberInput, ValidationErrors};

pub use server::{ServerState, router, run_with_listener};

mod categories;
mod expenses;
mod server;
mod statistics;

pub enum ServerError {
    Engine(EngineError),
    /// The body could not be read as the expected JSON document.
    Body(JsonRejection),
}

fn status_for_engine_error(err: &EngineError) -> StatusCode {
    match err {
        EngineError::Validation(_) | EngineError::ExistingKey(_) => StatusCode::BAD_REQUEST,
        EngineError::KeyNotFound(_) => StatusCode::NOT_FOUND,
        EngineError::Database(_) | EngineError::Export(_) | EngineError::AmountOverflow(_) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

fn message_for_engine_error(err: EngineError) -> String {
    match err {
        EngineError::Database(db_err) => {
            tracing::error!("database error: {db_err}");
            "internal server error".to_string()
        }
        EngineError::Export(export_err) => {
            tracing::error!("export error: {export_err}");
            "internal server error".to_string()
        }
        EngineError::AmountOverflow(context) => {
            tracing::error!("amount overflow: {context}");
            "internal server error".to_string()
        }
        other => other.to_string(),
    }
}

fn validation_response(errors: ValidationErrors) -> Response {
    let errors = errors
        .into_inner()
        .into_iter()
        .map(|err| FieldErrorView {
            field: err.field,
            message: err.message,
        })
        .collect();
    (StatusCode::BAD_REQUEST, Json(ValidationErrorBody { errors })).into_response()
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        match self {
            ServerError::Engine(EngineError::Validation(errors)) => validation_response(errors),
            ServerError::Engine(err) => {
                let status = status_for_engine_error(&err);
                let error = message_for_engine_error(err);
                (status, Json(ErrorBody { error })).into_response()
            }
            ServerError::Body(rejection) => {
                validation_response(ValidationErrors::single("body", rejection.body_text()))
            }
        }
    }
}

impl From<EngineError> for ServerError {
    fn from(value: EngineError) -> Self {
        Self::Engine(value)
    }
}

impl From<ValidationErrors> for ServerError {
    fn from(value: ValidationErrors) -> Self {
        Self::Engine(EngineError::Validation(value))
    }
}

impl From<JsonRejection> for ServerError {
    fn from(value: JsonRejection) -> Self {
        Self::Body(value)
    }
}

fn number_input(value: NumberValue) -> NumberInput {
    match value {
        NumberValue::Number(n) => NumberInput::Number(n),
        NumberValue::Text(s) => NumberInput::Text(s),
    }
}
