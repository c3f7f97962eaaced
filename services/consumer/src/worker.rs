use std::time::Duration;

use tracing::{debug, info, warn};

use crate::delivery::OrderDelivery;
use crate::envelope::{Envelope, epoch_secs};
use crate::queue::{MessageQueue, QueueMessage};

/// Pause after a failed queue poll (throttling, transient network trouble).
const POLL_ERROR_BACKOFF: Duration = Duration::from_secs(2);
/// Pause before the single delivery retry.
const RETRY_BACKOFF: Duration = Duration::from_secs(1);
/// Delivery attempts per message per lease.
const MAX_ATTEMPTS: u32 = 2;

pub struct ConsumerWorker<Q, D>
where
    Q: MessageQueue,
    D: OrderDelivery,
{
    pub queue: Q,
    pub delivery: D,
    pub batch: usize,
    pub wait: Duration,
    pub visibility: Duration,
}

impl<Q, D> ConsumerWorker<Q, D>
where
    Q: MessageQueue,
    D: OrderDelivery,
{
    pub async fn run(&self) -> ! {
        info!(batch = self.batch, "consumer loop started");
        loop {
            self.poll_once().await;
        }
    }

    /// One receive → process → ack cycle. Returns the number of messages
    /// acknowledged. Failed messages are left leased; the queue redelivers
    /// them after the visibility timeout.
    pub async fn poll_once(&self) -> usize {
        let messages = match self
            .queue
            .receive(self.batch, self.wait, self.visibility)
            .await
        {
            Ok(messages) => messages,
            Err(e) => {
                warn!(error = %e, "queue receive failed, backing off");
                tokio::time::sleep(POLL_ERROR_BACKOFF).await;
                return 0;
            }
        };
        if messages.is_empty() {
            return 0;
        }
        debug!(count = messages.len(), "received batch");

        // Each message succeeds or fails on its own; one bad message never
        // blocks the rest of the batch.
        let mut acked = Vec::new();
        for message in &messages {
            if self.handle_message(message).await {
                acked.push(message.receipt.clone());
            } else {
                warn!("message left for redelivery");
            }
        }

        let count = acked.len();
        if !acked.is_empty() {
            if let Err(e) = self.queue.delete(&acked).await {
                warn!(error = %e, "failed to ack processed messages");
            }
        }
        count
    }

    async fn handle_message(&self, message: &QueueMessage) -> bool {
        let mut envelope: Envelope = match serde_json::from_str(&message.body) {
            Ok(envelope) => envelope,
            Err(e) => {
                // Malformed input is permanent; retrying the HTTP call cannot
                // fix it. Left un-acked for the queue's own DLQ policy.
                warn!(error = %e, "unparseable queue message");
                return false;
            }
        };
        envelope
            .timestamps
            .insert("consumer_received".to_owned(), epoch_secs());

        for attempt in 1..=MAX_ATTEMPTS {
            envelope
                .timestamps
                .insert("orders_call_start".to_owned(), epoch_secs());
            match self
                .delivery
                .deliver(&envelope.event_id, &envelope.order)
                .await
            {
                Ok(()) => {
                    envelope
                        .timestamps
                        .insert("db_committed".to_owned(), epoch_secs());
                    log_latency(&envelope);
                    return true;
                }
                Err(e) => {
                    warn!(error = %e, attempt, event_id = %envelope.event_id, "delivery failed");
                    if attempt < MAX_ATTEMPTS {
                        tokio::time::sleep(RETRY_BACKOFF).await;
                    }
                }
            }
        }
        false
    }
}

fn log_latency(envelope: &Envelope) {
    let ts = &envelope.timestamps;
    if let (Some(bff), Some(received), Some(call_start), Some(committed)) = (
        ts.get("bff_received"),
        ts.get("consumer_received"),
        ts.get("orders_call_start"),
        ts.get("db_committed"),
    ) {
        info!(
            event_id = %envelope.event_id,
            total_ms = (committed - bff) * 1000.0,
            queue_ms = (received - bff) * 1000.0,
            orders_ms = (committed - call_start) * 1000.0,
            "order delivered"
        );
    }
}
