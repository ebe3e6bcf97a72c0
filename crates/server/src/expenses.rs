//! Expenses API endpoints.

use api_types::{
    Message,
    expense::{ExpenseListResponse, ExpensePayload, ExpenseQuery, ExpenseView, Pagination},
};
use axum::{
    Json,
    extract::{Path, Query, State, rejection::JsonRejection},
    http::{StatusCode, header},
};
use engine::{EngineError, ExpenseInput, expense_filter, page_request};
use uuid::Uuid;

use crate::{ServerError, number_input, server::ServerState};

fn map_expense(expense: engine::Expense) -> ExpenseView {
    ExpenseView {
        id: expense.id,
        description: expense.description,
        amount: expense.amount.as_f64(),
        category: expense.category,
        date: expense.date,
        notes: expense.notes,
        created_at: expense.created_at,
        updated_at: expense.updated_at,
    }
}

fn expense_input(payload: ExpensePayload) -> ExpenseInput {
    ExpenseInput {
        description: payload.description,
        amount: payload.amount.map(number_input),
        category: payload.category,
        date: payload.date,
        notes: payload.notes,
    }
}

/// Ids that are not UUIDs cannot name a stored expense.
fn expense_id(raw: &str) -> Result<Uuid, ServerError> {
    Uuid::parse_str(raw).map_err(|_| EngineError::KeyNotFound("Expense".to_string()).into())
}

pub async fn list(
    State(state): State<ServerState>,
    Query(query): Query<ExpenseQuery>,
) -> Result<Json<ExpenseListResponse>, ServerError> {
    let filter = expense_filter(
        query.start_date.as_deref(),
        query.end_date.as_deref(),
        query.category.as_deref(),
    )?;
    let page = page_request(query.limit.as_deref(), query.page.as_deref())?;

    let listing = state.engine.list_expenses(&filter, page).await?;
    Ok(Json(ExpenseListResponse {
        expenses: listing.expenses.into_iter().map(map_expense).collect(),
        pagination: Pagination {
            page: listing.page,
            limit: listing.limit,
            total: listing.total,
            pages: listing.pages,
        },
    }))
}

pub async fn get(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> Result<Json<ExpenseView>, ServerError> {
    let expense = state.engine.expense(expense_id(&id)?).await?;
    Ok(Json(map_expense(expense)))
}

pub async fn create(
    State(state): State<ServerState>,
    payload: Result<Json<ExpensePayload>, JsonRejection>,
) -> Result<(StatusCode, Json<ExpenseView>), ServerError> {
    let Json(payload) = payload?;
    let expense = state.engine.create_expense(&expense_input(payload)).await?;
    tracing::debug!(id = %expense.id, "expense created");
    Ok((StatusCode::CREATED, Json(map_expense(expense))))
}

pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    payload: Result<Json<ExpensePayload>, JsonRejection>,
) -> Result<Json<ExpenseView>, ServerError> {
    let id = expense_id(&id)?;
    let Json(payload) = payload?;
    let expense = state
        .engine
        .update_expense(id, &expense_input(payload))
        .await?;
    Ok(Json(map_expense(expense)))
}

pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> Result<Json<Message>, ServerError> {
    state.engine.delete_expense(expense_id(&id)?).await?;
    Ok(Json(Message {
        message: "Expense deleted successfully".to_string(),
    }))
}

pub async fn export_csv(
    State(state): State<ServerState>,
    Query(query): Query<ExpenseQuery>,
) -> Result<([(header::HeaderName, &'static str); 2], String), ServerError> {
    let filter = expense_filter(
        query.start_date.as_deref(),
        query.end_date.as_deref(),
        query.category.as_deref(),
    )?;
    let csv = state.engine.export_csv(&filter).await?;
    Ok((
        [
            (header::CONTENT_TYPE, "text/csv"),
            (
                header::CONTENT_DISPOSITION,
                "attachment; filename=expenses.csv",
            ),
        ],
        csv,
    ))
}
