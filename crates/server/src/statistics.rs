//! Statistics API endpoints

use api_types::stats::{BudgetStatusView, CategorySummary, RangeQuery, SummaryResponse};
use axum::{
    Json,
    extract::{Path, Query, State},
};
use engine::date_range;

use crate::{ServerError, server::ServerState};

/// Per-category totals over an optional date range.
pub async fn summary(
    State(state): State<ServerState>,
    Query(query): Query<RangeQuery>,
) -> Result<Json<SummaryResponse>, ServerError> {
    let range = date_range(query.start_date.as_deref(), query.end_date.as_deref())?;
    let summary = state.engine.summary(&range).await?;

    let by_category = summary
        .by_category
        .into_iter()
        .map(|group| CategorySummary {
            average: group.average(),
            total: group.total.as_f64(),
            count: group.count,
            category: group.category,
        })
        .collect();

    Ok(Json(SummaryResponse {
        by_category,
        total: summary.total.as_f64(),
        count: summary.count,
    }))
}

pub async fn budget_status(
    State(state): State<ServerState>,
    Path(name): Path<String>,
    Query(query): Query<RangeQuery>,
) -> Result<Json<BudgetStatusView>, ServerError> {
    let range = date_range(query.start_date.as_deref(), query.end_date.as_deref())?;
    let status = state.engine.budget_status(&name, &range).await?;

    Ok(Json(BudgetStatusView {
        category: status.category,
        budget: status.budget.as_f64(),
        spent: status.spent.as_f64(),
        remaining: status.remaining.as_f64(),
        percentage: status.percentage,
        over_budget: status.over_budget,
    }))
}
