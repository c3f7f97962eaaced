use serde::Deserialize;

use venta_core::config::Config;

/// Orders service configuration loaded from environment variables.
#[derive(Debug, Deserialize)]
pub struct OrdersConfig {
    /// PostgreSQL connection URL.
    pub database_url: String,
    /// TCP port to listen on (default 8080). Env var: `ORDERS_PORT`.
    #[serde(default = "default_port")]
    pub orders_port: u16,
    /// Seconds between outbox sweep passes.
    #[serde(default = "default_sweep_interval")]
    pub sweep_interval_secs: u64,
    /// Minimum age in seconds before an unpublished event is re-triggered.
    /// Must comfortably exceed normal relay latency, or the sweeper races the
    /// in-flight trigger.
    #[serde(default = "default_sweep_min_age")]
    pub sweep_min_age_secs: i64,
    /// Maximum events re-triggered per sweep pass.
    #[serde(default = "default_sweep_batch")]
    pub sweep_batch: u64,
}

fn default_port() -> u16 {
    8080
}

fn default_sweep_interval() -> u64 {
    30
}

fn default_sweep_min_age() -> i64 {
    60
}

fn default_sweep_batch() -> u64 {
    100
}

impl Config for OrdersConfig {}
