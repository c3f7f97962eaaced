use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

/// Orders service domain error variants.
#[derive(Debug, thiserror::Error)]
pub enum OrdersServiceError {
    #[error("Idempotency-Key ya usada con payload distinto")]
    PayloadMismatch,
    #[error("internal error")]
    Internal(#[from] anyhow::Error),
}

impl OrdersServiceError {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::PayloadMismatch => "IDEMPOTENCY_CONFLICT",
            Self::Internal(_) => "INTERNAL",
        }
    }
}

impl IntoResponse for OrdersServiceError {
    fn into_response(self) -> Response {
        let status = match &self {
            Self::PayloadMismatch => StatusCode::CONFLICT,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        // Only 500s carry an error chain worth logging.
        if let Self::Internal(ref e) = self {
            tracing::error!(error = %e, kind = "INTERNAL", "internal error");
        }
        let body = serde_json::json!({
            "kind": self.kind(),
            "message": self.to_string(),
        });
        (status, axum::Json(body)).into_response()
    }
}
