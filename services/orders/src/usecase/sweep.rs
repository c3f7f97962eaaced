use chrono::{Duration, Utc};

use crate::domain::repository::{OutboxRepository, RelayTrigger};
use crate::error::OrdersServiceError;

/// Reconciliation pass for outbox rows whose fire-and-forget trigger never
/// ran (process crash between commit and spawn, dropped task, restart).
/// Re-fires the trigger for unpublished events older than `min_age`.
pub struct SweepOutboxUseCase<R, T>
where
    R: OutboxRepository,
    T: RelayTrigger,
{
    pub repo: R,
    pub relay: T,
    pub min_age: Duration,
    pub batch: u64,
}

impl<R, T> SweepOutboxUseCase<R, T>
where
    R: OutboxRepository,
    T: RelayTrigger,
{
    /// Returns the number of events re-triggered.
    pub async fn run_once(&self) -> Result<usize, OrdersServiceError> {
        let cutoff = Utc::now() - self.min_age;
        let events = self.repo.find_unpublished_before(cutoff, self.batch).await?;
        let count = events.len();

        for event in events {
            if let Err(e) = self.relay.trigger(event.event_id) {
                tracing::warn!(error = %e, event_id = %event.event_id, "sweep re-trigger failed");
            }
        }

        if count > 0 {
            tracing::info!(count, "re-triggered unpublished outbox events");
        }
        Ok(count)
    }
}
