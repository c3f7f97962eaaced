use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

/// Event tag written for every accepted order.
pub const ORDER_CREATED_KIND: &str = "OrderCreated";

/// Order lifecycle status. Persisted as plain text; this closed set is owned
/// by the application, not by a database enum type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderStatus {
    New,
    Created,
    Failed,
}

impl OrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::New => "NEW",
            Self::Created => "CREATED",
            Self::Failed => "FAILED",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "NEW" => Some(Self::New),
            "CREATED" => Some(Self::Created),
            "FAILED" => Some(Self::Failed),
            _ => None,
        }
    }
}

/// Idempotency ledger status. Only PENDING → DONE is legal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdemStatus {
    Pending,
    Done,
}

impl IdemStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "PENDING",
            Self::Done => "DONE",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "PENDING" => Some(Self::Pending),
            "DONE" => Some(Self::Done),
            _ => None,
        }
    }
}

/// A single order line item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineItem {
    pub sku: String,
    pub qty: i64,
}

/// Parsed order-creation request. Its serde serialization is the canonical
/// form hashed into `body_hash`, so field order here is the canonical order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateOrderRequest {
    pub customer_id: String,
    pub items: Vec<LineItem>,
}

/// Order aggregate. Created NEW by intake; mutated only by the relay worker.
#[derive(Debug, Clone)]
pub struct Order {
    pub id: Uuid,
    pub customer_id: String,
    pub items: Vec<LineItem>,
    pub status: OrderStatus,
    pub created_at: DateTime<Utc>,
}

/// Idempotency ledger entry, keyed by the sha-256 of the client token.
#[derive(Debug, Clone)]
pub struct IdempotencyEntry {
    pub key_hash: String,
    pub body_hash: String,
    pub status: IdemStatus,
    pub status_code: Option<i32>,
    pub response_body: Option<Value>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Outbox event written in the same transaction as its order.
#[derive(Debug, Clone)]
pub struct OutboxEvent {
    pub event_id: Uuid,
    pub aggregate_id: Uuid,
    pub kind: String,
    pub payload: Value,
    pub published_at: Option<DateTime<Utc>>,
    /// Tracked for retry accounting; relay logic does not increment it.
    pub retries: i32,
    pub created_at: DateTime<Utc>,
}

/// Payload carried by an "OrderCreated" outbox event. `key_hash` links the
/// event back to its idempotency ledger entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderCreatedPayload {
    pub order_id: Uuid,
    pub key_hash: String,
}
