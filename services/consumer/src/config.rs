use serde::Deserialize;

use venta_core::config::Config;

/// Consumer configuration loaded from environment variables.
#[derive(Debug, Deserialize)]
pub struct ConsumerConfig {
    /// Redis connection URL (queue broker).
    pub redis_url: String,
    /// Pending-list key to poll. Env var: `QUEUE_NAME`.
    #[serde(default = "default_queue_name")]
    pub queue_name: String,
    /// Max messages leased per poll (capped at 10).
    #[serde(default = "default_batch")]
    pub batch: usize,
    /// Long-poll wait for the first message of a batch.
    #[serde(default = "default_wait")]
    pub wait_secs: u64,
    /// Lease duration; must exceed worst-case per-message processing time or
    /// the queue redelivers while the message is still in flight.
    #[serde(default = "default_visibility")]
    pub visibility_secs: u64,
    /// Orders intake endpoint messages are forwarded to.
    #[serde(default = "default_target_url")]
    pub target_url: String,
    /// Overall timeout for each delivery call.
    #[serde(default = "default_http_timeout")]
    pub http_timeout_secs: u64,
}

fn default_queue_name() -> String {
    "orders_queue".to_owned()
}

fn default_batch() -> usize {
    10
}

fn default_wait() -> u64 {
    20
}

fn default_visibility() -> u64 {
    60
}

fn default_target_url() -> String {
    "http://localhost:8080/orders".to_owned()
}

fn default_http_timeout() -> u64 {
    30
}

impl Config for ConsumerConfig {}
