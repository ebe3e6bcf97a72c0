use axum::{
    Json, Router,
    extract::{Request, State},
    middleware::{self, Next},
    response::Response,
    routing::get,
};
use tokio::time::Instant;

use std::sync::Arc;

use api_types::Health;
use engine::Engine;

use crate::{categories, expenses, statistics};

#[derive(Clone)]
pub struct ServerState {
    pub engine: Arc<Engine>,
    pub started: Instant,
}

impl ServerState {
    pub fn new(engine: Engine) -> Self {
        Self {
            engine: Arc::new(engine),
            started: Instant::now(),
        }
    }
}

/// Logs method, path, status and latency of every request.
async fn log_request(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let path = request.uri().path().to_owned();
    let started = Instant::now();

    let response = next.run(request).await;

    let status = response.status().as_u16();
    let elapsed_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);
    if response.status().is_server_error() {
        tracing::warn!(%method, %path, status, elapsed_ms, "request failed");
    } else {
        tracing::info!(%method, %path, status, elapsed_ms, "request");
    }
    response
}

async fn health(State(state): State<ServerState>) -> Json<Health> {
    Json(Health {
        status: "ok".to_string(),
        uptime: state.started.elapsed().as_secs_f64(),
    })
}

pub fn router(state: ServerState) -> Router {
    let api = Router::new()
        .route("/expenses", get(expenses::list).post(expenses::create))
        .route("/expenses/stats/summary", get(statistics::summary))
        .route("/expenses/export/csv", get(expenses::export_csv))
        .route(
            "/expenses/{id}",
            get(expenses::get)
                .put(expenses::update)
                .delete(expenses::delete),
        )
        .route("/categories", get(categories::list).post(categories::create))
        .route(
            "/categories/{name}",
            get(categories::get)
                .put(categories::update)
                .delete(categories::delete),
        )
        .route(
            "/categories/{name}/budget-status",
            get(statistics::budget_status),
        )
        .route("/health", get(health));

    Router::new()
        .nest("/api", api)
        .layer(middleware::from_fn(log_request))
        .with_state(state)
}

pub async fn run_with_listener(
    engine: Engine,
    listener: tokio::net::TcpListener,
) -> Result<(), std::io::Error> {
    let addr = listener.local_addr()?;
    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, router(ServerState::new(engine))).await
}
