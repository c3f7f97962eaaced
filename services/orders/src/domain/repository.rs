#![allow(async_fn_in_trait)]

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::types::{IdempotencyEntry, Order, OutboxEvent};
use crate::error::OrdersServiceError;

/// Failure of the atomic intake insert, distinguishing a key-hash uniqueness
/// race from everything else.
#[derive(Debug, thiserror::Error)]
pub enum IntakeInsertError {
    #[error("idempotency key already inserted by a concurrent request")]
    DuplicateKey,
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Repository for the intake transaction (ledger + order + outbox).
pub trait IntakeRepository: Send + Sync {
    async fn find_entry(
        &self,
        key_hash: &str,
    ) -> Result<Option<IdempotencyEntry>, OrdersServiceError>;

    /// Insert the ledger entry (when `entry` is `Some`), the order, and the
    /// outbox event in one transaction. All three persist or none do.
    async fn insert_intake(
        &self,
        entry: Option<&IdempotencyEntry>,
        order: &Order,
        event: &OutboxEvent,
    ) -> Result<(), IntakeInsertError>;
}

/// The three idempotent assignments of a completed relay.
#[derive(Debug, Clone)]
pub struct RelayCompletion {
    pub event_id: Uuid,
    pub order_id: Uuid,
    pub key_hash: String,
    pub status_code: i32,
    pub response_body: serde_json::Value,
}

/// Repository for relay and sweep reads plus the relay completion transaction.
pub trait OutboxRepository: Send + Sync {
    async fn find_event(&self, event_id: Uuid)
    -> Result<Option<OutboxEvent>, OrdersServiceError>;

    async fn find_order(&self, order_id: Uuid) -> Result<Option<Order>, OrdersServiceError>;

    /// Atomically mark the order CREATED, complete the ledger entry and stamp
    /// the event published. Plain assignments, safe to re-run.
    async fn mark_relayed(&self, completion: &RelayCompletion) -> Result<(), OrdersServiceError>;

    /// Unpublished events created before `cutoff`, oldest first, bounded.
    async fn find_unpublished_before(
        &self,
        cutoff: DateTime<Utc>,
        limit: u64,
    ) -> Result<Vec<OutboxEvent>, OrdersServiceError>;
}

/// Best-effort hand-off of an event id to the relay worker. Must not block on
/// relay completion; a failure here is non-fatal for the caller because the
/// outbox row remains the durable record of work to do.
pub trait RelayTrigger: Send + Sync {
    fn trigger(&self, event_id: Uuid) -> Result<(), anyhow::Error>;
}
