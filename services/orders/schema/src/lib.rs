pub mod idempotency_requests;
pub mod orders;
pub mod outbox_events;
