use axum::http::StatusCode;
use axum_test::TestServer;
use sea_orm::DatabaseConnection;
use serde_json::{Value, json};

use venta_orders::router::build_router;
use venta_orders::state::AppState;

fn disconnected_server() -> TestServer {
    let state = AppState {
        db: DatabaseConnection::Disconnected,
    };
    TestServer::new(build_router(state)).unwrap()
}

#[tokio::test]
async fn healthz_returns_200() {
    let server = disconnected_server();
    let response = server.get("/healthz").await;
    assert_eq!(response.status_code(), StatusCode::OK);
}

#[tokio::test]
async fn health_reports_degraded_without_database() {
    let server = disconnected_server();
    let response = server.get("/health").await;
    assert_eq!(response.status_code(), StatusCode::OK);
    let body: Value = response.json();
    assert_eq!(body["status"], "degraded");
    assert!(body["db_error"].is_string());
}

#[tokio::test]
async fn create_order_returns_internal_without_database() {
    let server = disconnected_server();
    let response = server
        .post("/orders")
        .add_header("Idempotency-Key", "T1")
        .json(&json!({ "customer_id": "C1", "items": [{ "sku": "A", "qty": 1 }] }))
        .await;
    assert_eq!(response.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = response.json();
    assert_eq!(body["kind"], "INTERNAL");
}
