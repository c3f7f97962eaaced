#![allow(async_fn_in_trait)]

use std::time::Duration;

use anyhow::Context as _;
use reqwest::Client;
use serde_json::Value;

/// Downstream hand-off of an order payload, idempotently keyed by the
/// envelope's event id so redeliveries are safe.
pub trait OrderDelivery: Send + Sync {
    async fn deliver(&self, event_id: &str, order: &Value) -> anyhow::Result<()>;
}

/// POSTs the order to the intake endpoint with an `Idempotency-Key` header.
pub struct HttpOrderDelivery {
    client: Client,
    target_url: String,
}

impl HttpOrderDelivery {
    pub fn new(target_url: String, timeout: Duration) -> anyhow::Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .context("build http client")?;
        Ok(Self { client, target_url })
    }
}

impl OrderDelivery for HttpOrderDelivery {
    async fn deliver(&self, event_id: &str, order: &Value) -> anyhow::Result<()> {
        let response = self
            .client
            .post(&self.target_url)
            .header("Idempotency-Key", event_id)
            .json(order)
            .send()
            .await
            .context("post order downstream")?;
        response
            .error_for_status()
            .context("downstream rejected order")?;
        Ok(())
    }
}
