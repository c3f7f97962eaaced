use axum::{
    Json,
    extract::State,
    http::{HeaderMap, StatusCode},
};

use crate::domain::types::CreateOrderRequest;
use crate::error::OrdersServiceError;
use crate::state::AppState;
use crate::usecase::intake::{AcceptedResponse, CreateOrderInput, CreateOrderUseCase};

pub async fn create_order(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(body): Json<CreateOrderRequest>,
) -> Result<(StatusCode, Json<AcceptedResponse>), OrdersServiceError> {
    let idempotency_token = headers
        .get("Idempotency-Key")
        .and_then(|v| v.to_str().ok())
        .map(str::to_owned);

    let usecase = CreateOrderUseCase {
        repo: state.intake_repo(),
        relay: state.relay_trigger(),
    };
    let response = usecase
        .execute(CreateOrderInput {
            idempotency_token,
            body,
        })
        .await?;
    Ok((StatusCode::ACCEPTED, Json(response)))
}
