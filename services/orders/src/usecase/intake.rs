use chrono::Utc;
use serde::Serialize;
use uuid::Uuid;

use venta_core::hash::sha256_hex;

use crate::domain::repository::{IntakeInsertError, IntakeRepository, RelayTrigger};
use crate::domain::types::{
    CreateOrderRequest, IdemStatus, IdempotencyEntry, ORDER_CREATED_KIND, Order,
    OrderCreatedPayload, OrderStatus, OutboxEvent,
};
use crate::error::OrdersServiceError;

pub const MSG_REPLAYED: &str = "Ya procesado (idempotente)";
pub const MSG_CONCURRENT: &str = "Ya procesado por otra instancia";

pub struct CreateOrderInput {
    /// Client-supplied `Idempotency-Key`; a fresh token is generated when
    /// absent (valid, but effectively non-idempotent).
    pub idempotency_token: Option<String>,
    pub body: CreateOrderRequest,
}

/// 202 response body for `POST /orders`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AcceptedResponse {
    pub request_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

pub struct CreateOrderUseCase<R, T>
where
    R: IntakeRepository,
    T: RelayTrigger,
{
    pub repo: R,
    pub relay: T,
}

impl<R, T> CreateOrderUseCase<R, T>
where
    R: IntakeRepository,
    T: RelayTrigger,
{
    pub async fn execute(
        &self,
        input: CreateOrderInput,
    ) -> Result<AcceptedResponse, OrdersServiceError> {
        let token = input
            .idempotency_token
            .unwrap_or_else(|| Uuid::new_v4().to_string());
        let key_hash = sha256_hex(&token);

        let canonical =
            serde_json::to_string(&input.body).map_err(anyhow::Error::new)?;
        let body_hash = sha256_hex(&canonical);

        // 1. Ledger lookup: conflict, replay, or continue.
        let staged_entry = match self.repo.find_entry(&key_hash).await? {
            Some(existing) => {
                if existing.body_hash != body_hash {
                    return Err(OrdersServiceError::PayloadMismatch);
                }
                if existing.status == IdemStatus::Done && existing.response_body.is_some() {
                    // True replay: the original outcome is already durable.
                    // No new order, event, or trigger.
                    return Ok(AcceptedResponse {
                        request_id: key_hash,
                        message: Some(MSG_REPLAYED.to_owned()),
                    });
                }
                // PENDING entry from an earlier in-flight attempt: reuse it.
                None
            }
            None => {
                let now = Utc::now();
                Some(IdempotencyEntry {
                    key_hash: key_hash.clone(),
                    body_hash,
                    status: IdemStatus::Pending,
                    status_code: None,
                    response_body: None,
                    created_at: now,
                    updated_at: now,
                })
            }
        };

        // 2. Stage order + outbox event for the atomic insert.
        let now = Utc::now();
        let order = Order {
            id: Uuid::new_v4(),
            customer_id: input.body.customer_id.clone(),
            items: input.body.items.clone(),
            status: OrderStatus::New,
            created_at: now,
        };
        let payload = OrderCreatedPayload {
            order_id: order.id,
            key_hash: key_hash.clone(),
        };
        let event = OutboxEvent {
            event_id: Uuid::new_v4(),
            aggregate_id: order.id,
            kind: ORDER_CREATED_KIND.to_owned(),
            payload: serde_json::to_value(&payload).map_err(anyhow::Error::new)?,
            published_at: None,
            retries: 0,
            created_at: now,
        };

        match self
            .repo
            .insert_intake(staged_entry.as_ref(), &order, &event)
            .await
        {
            Ok(()) => {}
            Err(IntakeInsertError::DuplicateKey) => {
                // Lost the key_hash insert race: a concurrent request already
                // recorded this token. Acknowledge rather than error.
                if self.repo.find_entry(&key_hash).await?.is_none() {
                    tracing::warn!(%key_hash, "ledger entry missing after duplicate-key race");
                }
                return Ok(AcceptedResponse {
                    request_id: key_hash,
                    message: Some(MSG_CONCURRENT.to_owned()),
                });
            }
            Err(IntakeInsertError::Other(e)) => return Err(OrdersServiceError::Internal(e)),
        }

        // 3. Best-effort relay trigger. The committed outbox row is the
        // durable fallback; the sweeper re-triggers anything that slips here.
        if let Err(e) = self.relay.trigger(event.event_id) {
            tracing::warn!(error = %e, event_id = %event.event_id, "relay trigger failed, continuing");
        }

        Ok(AcceptedResponse {
            request_id: key_hash,
            message: None,
        })
    }
}
