use axum::{
    Router,
    routing::{get, post},
};
use tower_http::trace::TraceLayer;

use venta_core::health::healthz;
use venta_core::middleware::request_id_layer;

use crate::handlers::{health::health, order::create_order};
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        // Health
        .route("/healthz", get(healthz))
        .route("/health", get(health))
        // Orders intake
        .route("/orders", post(create_order))
        .layer(TraceLayer::new_for_http())
        .layer(request_id_layer())
        .with_state(state)
}
