//! Categories API endpoints.

use api_types::{
    Message,
    category::{CategoryPayload, CategoryView},
};
use axum::{
    Json,
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
};
use engine::CategoryInput;

use crate::{ServerError, number_input, server::ServerState};

fn map_category(category: engine::Category) -> CategoryView {
    CategoryView {
        name: category.name,
        budget: category.budget.as_f64(),
        color: category.color,
        created_at: category.created_at,
        updated_at: category.updated_at,
    }
}

fn category_input(payload: CategoryPayload) -> CategoryInput {
    CategoryInput {
        name: payload.name,
        budget: payload.budget.map(number_input),
        color: payload.color,
    }
}

pub async fn list(State(state): State<ServerState>) -> Result<Json<Vec<CategoryView>>, ServerError> {
    let categories = state
        .engine
        .list_categories()
        .await?
        .into_iter()
        .map(map_category)
        .collect();
    Ok(Json(categories))
}

pub async fn get(
    State(state): State<ServerState>,
    Path(name): Path<String>,
) -> Result<Json<CategoryView>, ServerError> {
    let category = state.engine.category(&name).await?;
    Ok(Json(map_category(category)))
}

pub async fn create(
    State(state): State<ServerState>,
    payload: Result<Json<CategoryPayload>, JsonRejection>,
) -> Result<(StatusCode, Json<CategoryView>), ServerError> {
    let Json(payload) = payload?;
    let category = state
        .engine
        .create_category(&category_input(payload))
        .await?;
    tracing::debug!(name = %category.name, "category created");
    Ok((StatusCode::CREATED, Json(map_category(category))))
}

pub async fn update(
    State(state): State<ServerState>,
    Path(name): Path<String>,
    payload: Result<Json<CategoryPayload>, JsonRejection>,
) -> Result<Json<CategoryView>, ServerError> {
    let Json(payload) = payload?;
    let category = state
        .engine
        .update_category(&name, &category_input(payload))
        .await?;
    Ok(Json(map_category(category)))
}

pub async fn delete(
    State(state): State<ServerState>,
    Path(name): Path<String>,
) -> Result<Json<Message>, ServerError> {
    state.engine.delete_category(&name).await?;
    Ok(Json(Message {
        message: "Category deleted successfully".to_string(),
    }))
}
