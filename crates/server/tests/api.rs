use axum::{
    Router,
    body::Body,
    http::{Method, Request, StatusCode, header},
};
use http_body_util::BodyExt;
use sea_orm::Database;
use serde_json::{Value, json};
use tower::ServiceExt;

use engine::Engine;
use migration::MigratorTrait;
use server::{ServerState, router};

async fn app() -> Router {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    migration::Migrator::up(&db, None).await.unwrap();
    let engine = Engine::builder().database(db).build().await.unwrap();
    router(ServerState::new(engine))
}

async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Vec<u8>) {
    let mut request = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(value) => {
            request = request.header(header::CONTENT_TYPE, "application/json");
            Body::from(value.to_string())
        }
        None => Body::empty(),
    };
    let response = app
        .clone()
        .oneshot(request.body(body).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    (status, bytes.to_vec())
}

async fn send_json(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let (status, bytes) = send(app, method, uri, body).await;
    (status, serde_json::from_slice(&bytes).unwrap())
}

async fn create_expense(app: &Router, description: &str, amount: f64, category: &str, date: &str) -> Value {
    let (status, body) = send_json(
        app,
        Method::POST,
        "/api/expenses",
        Some(json!({
            "description": description,
            "amount": amount,
            "category": category,
            "date": date,
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
    body
}

#[tokio::test]
async fn health_reports_ok() {
    let app = app().await;
    let (status, body) = send_json(&app, Method::GET, "/api/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert!(body["uptime"].as_f64().unwrap() >= 0.0);
}

#[tokio::test]
async fn expense_lifecycle() {
    let app = app().await;

    let created = create_expense(&app, "Lunch", 12.5, "Food", "2024-03-05").await;
    assert_eq!(created["category"], "food");
    assert_eq!(created["amount"], 12.5);
    assert_eq!(created["date"], "2024-03-05");
    assert!(created["createdAt"].is_string());
    let id = created["id"].as_str().unwrap().to_string();

    let (status, fetched) = send_json(&app, Method::GET, &format!("/api/expenses/{id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched["description"], "Lunch");

    let (status, updated) = send_json(
        &app,
        Method::PUT,
        &format!("/api/expenses/{id}"),
        Some(json!({"description": "Dinner", "amount": "30", "category": "food"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["description"], "Dinner");
    assert_eq!(updated["amount"], 30.0);
    assert_eq!(updated["date"], "2024-03-05");

    let (status, body) = send_json(&app, Method::DELETE, &format!("/api/expenses/{id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Expense deleted successfully");

    let (status, body) = send_json(&app, Method::GET, &format!("/api/expenses/{id}"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Expense not found");
}

#[tokio::test]
async fn invalid_expense_is_400_with_field_errors() {
    let app = app().await;

    let (status, body) = send_json(
        &app,
        Method::POST,
        "/api/expenses",
        Some(json!({"description": "Refund", "amount": -5, "category": "food"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let fields: Vec<&str> = body["errors"]
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["field"].as_str().unwrap())
        .collect();
    assert_eq!(fields, ["amount"]);
}

#[tokio::test]
async fn malformed_body_is_a_validation_error() {
    let app = app().await;

    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/expenses")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{not json"))
        .unwrap();
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["errors"][0]["field"], "body");
}

#[tokio::test]
async fn unknown_or_malformed_ids_are_404() {
    let app = app().await;

    let (status, _) = send_json(
        &app,
        Method::GET,
        "/api/expenses/5f1c7f0e-8f43-4a57-9a5c-1e0d6e3f4b21",
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) = send_json(&app, Method::DELETE, "/api/expenses/not-a-uuid", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Expense not found");
}

#[tokio::test]
async fn listing_paginates_and_filters() {
    let app = app().await;

    for n in 1..=15 {
        create_expense(&app, &format!("item {n}"), 1.0, "food", &format!("2024-01-{n:02}")).await;
    }
    create_expense(&app, "rent", 500.0, "rent", "2024-01-10").await;

    let (status, body) = send_json(
        &app,
        Method::GET,
        "/api/expenses?category=Food&limit=10&page=2",
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["expenses"].as_array().unwrap().len(), 5);
    assert_eq!(body["pagination"]["total"], 15);
    assert_eq!(body["pagination"]["pages"], 2);
    assert_eq!(body["pagination"]["page"], 2);

    let (status, body) = send_json(
        &app,
        Method::GET,
        "/api/expenses?startDate=2024-01-10&endDate=2024-01-10",
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["pagination"]["total"], 2);
}

#[tokio::test]
async fn bad_query_values_are_rejected() {
    let app = app().await;

    let (status, body) = send_json(&app, Method::GET, "/api/expenses?limit=0", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["errors"][0]["field"], "limit");

    let (status, body) = send_json(
        &app,
        Method::GET,
        "/api/expenses/stats/summary?startDate=2024-02-01&endDate=2024-01-01",
        None,
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["errors"][0]["field"], "startDate");
}

#[tokio::test]
async fn oversized_numbers_are_400_not_a_crash() {
    let app = app().await;

    let (status, body) = send_json(
        &app,
        Method::POST,
        "/api/expenses",
        Some(json!({
            "description": "Island",
            "amount": 9e16,
            "category": "fun",
        })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["errors"][0]["field"], "amount");

    let (status, body) = send_json(
        &app,
        Method::POST,
        "/api/categories",
        Some(json!({ "name": "fun", "budget": 9e16 })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["errors"][0]["field"], "budget");

    let (status, body) = send_json(
        &app,
        Method::GET,
        "/api/expenses?limit=1000&page=9300000000000000",
        None,
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["errors"][0]["field"], "page");

    create_expense(&app, "a", 1_000_000_000.0, "fun", "2024-03-01").await;
    create_expense(&app, "b", 1_000_000_000.0, "rent", "2024-03-01").await;
    let (status, body) = send_json(&app, Method::GET, "/api/expenses/stats/summary", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total"], 2_000_000_000.0);
}

#[tokio::test]
async fn summary_groups_by_category() {
    let app = app().await;

    create_expense(&app, "a", 10.0, "food", "2024-03-01").await;
    create_expense(&app, "b", 20.0, "food", "2024-03-02").await;
    create_expense(&app, "c", 100.0, "rent", "2024-03-03").await;

    let (status, body) = send_json(&app, Method::GET, "/api/expenses/stats/summary", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total"], 130.0);
    assert_eq!(body["count"], 3);
    assert_eq!(body["byCategory"][0]["category"], "rent");
    assert_eq!(body["byCategory"][1]["category"], "food");
    assert_eq!(body["byCategory"][1]["average"], 15.0);
}

#[tokio::test]
async fn export_returns_csv_attachment() {
    let app = app().await;

    create_expense(&app, "Pizza", 12.5, "food", "2024-03-09").await;

    let request = Request::builder()
        .uri("/api/expenses/export/csv")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()[header::CONTENT_TYPE], "text/csv");
    assert_eq!(
        response.headers()[header::CONTENT_DISPOSITION],
        "attachment; filename=expenses.csv"
    );
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let csv = String::from_utf8(bytes.to_vec()).unwrap();
    assert_eq!(
        csv,
        "Description,Amount,Category,Date,Notes\nPizza,12.5,food,2024-03-09,\n"
    );
}

#[tokio::test]
async fn category_crud_and_budget_status() {
    let app = app().await;

    let (status, created) = send_json(
        &app,
        Method::POST,
        "/api/categories",
        Some(json!({"name": "Food", "budget": 100})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["name"], "food");
    assert_eq!(created["color"], "#3B82F6");

    let (status, body) = send_json(
        &app,
        Method::POST,
        "/api/categories",
        Some(json!({"name": "FOOD"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Category already exists");

    create_expense(&app, "a", 30.0, "food", "2024-03-01").await;
    create_expense(&app, "b", 80.0, "food", "2024-03-02").await;

    let (status, body) = send_json(
        &app,
        Method::GET,
        "/api/categories/food/budget-status?startDate=2024-03-01&endDate=2024-03-31",
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["spent"], 110.0);
    assert_eq!(body["remaining"], -10.0);
    assert_eq!(body["percentage"], 110.0);
    assert_eq!(body["overBudget"], true);

    let (status, updated) = send_json(
        &app,
        Method::PUT,
        "/api/categories/food",
        Some(json!({"budget": 200, "color": "#EF4444"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["budget"], 200.0);
    assert_eq!(updated["color"], "#EF4444");

    let (status, list) = send_json(&app, Method::GET, "/api/categories", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(list.as_array().unwrap().len(), 1);

    let (status, body) = send_json(&app, Method::DELETE, "/api/categories/Food", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Category deleted successfully");

    let (status, _) = send_json(&app, Method::GET, "/api/categories/food", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send_json(
        &app,
        Method::GET,
        "/api/categories/food/budget-status",
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (_, listing) = send_json(&app, Method::GET, "/api/expenses", None).await;
    assert_eq!(listing["pagination"]["total"], 2);
}
