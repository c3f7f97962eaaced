use axum::{Json, extract::State};
use serde_json::{Value, json};

use crate::state::AppState;

/// `GET /health` — readiness with a database ping. Always 200; a broken
/// database shows up as `status: "degraded"` in the body.
pub async fn health(State(state): State<AppState>) -> Json<Value> {
    match state.db.ping().await {
        Ok(()) => Json(json!({ "status": "ok", "db": "ok" })),
        Err(e) => Json(json!({ "status": "degraded", "db_error": e.to_string() })),
    }
}
