use serde_json::json;
use uuid::Uuid;

use crate::domain::repository::{OutboxRepository, RelayCompletion};
use crate::domain::types::{OrderCreatedPayload, OrderStatus};
use crate::error::OrdersServiceError;

/// Turns a durable outbox row into its completed side effect: order CREATED,
/// ledger entry DONE with the cached response, event stamped published.
///
/// Invoked at-least-once; every step is an idempotent assignment, so
/// re-running for an already-published event converges on the same state.
pub struct RelayOutboxUseCase<R: OutboxRepository> {
    pub repo: R,
}

impl<R: OutboxRepository> RelayOutboxUseCase<R> {
    pub async fn execute(&self, event_id: Uuid) -> Result<(), OrdersServiceError> {
        let Some(event) = self.repo.find_event(event_id).await? else {
            // Stale trigger; nothing to act on.
            tracing::debug!(%event_id, "outbox event not found, ignoring trigger");
            return Ok(());
        };

        let payload: OrderCreatedPayload = match serde_json::from_value(event.payload.clone()) {
            Ok(p) => p,
            Err(e) => {
                tracing::warn!(%event_id, error = %e, "unreadable outbox payload, dropping");
                return Ok(());
            }
        };

        let Some(order) = self.repo.find_order(event.aggregate_id).await? else {
            tracing::warn!(
                %event_id,
                aggregate_id = %event.aggregate_id,
                "order missing for outbox event, dropping"
            );
            return Ok(());
        };

        let completion = RelayCompletion {
            event_id: event.event_id,
            order_id: order.id,
            key_hash: payload.key_hash,
            status_code: 201,
            response_body: json!({
                "order_id": order.id,
                "status": OrderStatus::Created.as_str(),
            }),
        };
        self.repo.mark_relayed(&completion).await
    }
}
