use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Queue message envelope produced by the upstream intake front door.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Envelope {
    pub event_id: String,
    /// Forwarded verbatim as the orders endpoint request body.
    pub order: Value,
    /// Stage name → epoch seconds. Latency instrumentation only, never
    /// correctness.
    #[serde(default)]
    pub timestamps: HashMap<String, f64>,
}

/// Current time as fractional epoch seconds, the unit `timestamps` uses.
pub fn epoch_secs() -> f64 {
    chrono::Utc::now().timestamp_micros() as f64 / 1_000_000.0
}
