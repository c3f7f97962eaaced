#![allow(async_fn_in_trait)]

use std::time::Duration;

use anyhow::Context as _;
use deadpool_redis::Pool;
use deadpool_redis::redis::{AsyncCommands, Direction, Script};

use crate::envelope::epoch_secs;

/// Pop up to ARGV[2] pending messages and lease each one in the same script
/// invocation, so no message can exist outside both the pending list and the
/// in-flight set.
const CLAIM_SCRIPT: &str = r#"
local bodies = redis.call('LPOP', KEYS[1], ARGV[2])
if bodies then
    for _, body in ipairs(bodies) do
        redis.call('ZADD', KEYS[2], ARGV[1], body)
    end
    return bodies
end
return {}
"#;

/// Move up to ARGV[2] expired leases (score <= ARGV[1]) back onto the pending
/// list. Claim and requeue run in one script invocation for the same reason
/// as above.
const RECLAIM_SCRIPT: &str = r#"
local expired = redis.call('ZRANGEBYSCORE', KEYS[2], '-inf', ARGV[1], 'LIMIT', 0, ARGV[2])
for _, body in ipairs(expired) do
    redis.call('ZREM', KEYS[2], body)
    redis.call('RPUSH', KEYS[1], body)
end
return #expired
"#;

/// A message leased from the queue. The receipt acknowledges (deletes) it;
/// unacknowledged messages are redelivered once their lease expires.
#[derive(Debug, Clone)]
pub struct QueueMessage {
    pub receipt: String,
    pub body: String,
}

/// At-least-once queue with visibility-timeout leasing and batch receive/ack.
pub trait MessageQueue: Send + Sync {
    /// Lease up to `max` messages, waiting up to `wait` for the first one.
    async fn receive(
        &self,
        max: usize,
        wait: Duration,
        visibility: Duration,
    ) -> anyhow::Result<Vec<QueueMessage>>;

    /// Acknowledge processed messages.
    async fn delete(&self, receipts: &[String]) -> anyhow::Result<()>;
}

/// Redis-list queue with leases tracked in a companion sorted set
/// (member = raw message, score = lease deadline in epoch seconds).
/// Expired leases are reclaimed back onto the pending list on each poll.
#[derive(Clone)]
pub struct RedisQueue {
    pub pool: Pool,
    pub queue: String,
}

impl RedisQueue {
    fn inflight_key(&self) -> String {
        format!("{}:inflight", self.queue)
    }
}

impl MessageQueue for RedisQueue {
    async fn receive(
        &self,
        max: usize,
        wait: Duration,
        visibility: Duration,
    ) -> anyhow::Result<Vec<QueueMessage>> {
        let mut conn = self.pool.get().await.context("redis pool")?;
        let inflight = self.inflight_key();

        let _reclaimed: i64 = Script::new(RECLAIM_SCRIPT)
            .key(&self.queue)
            .key(&inflight)
            .arg(epoch_secs())
            .arg(max)
            .invoke_async(&mut conn)
            .await
            .context("reclaim expired leases")?;

        let deadline = epoch_secs() + visibility.as_secs_f64();
        let mut bodies: Vec<String> = Script::new(CLAIM_SCRIPT)
            .key(&self.queue)
            .key(&inflight)
            .arg(deadline)
            .arg(max)
            .invoke_async(&mut conn)
            .await
            .context("claim pending messages")?;
        if bodies.is_empty() {
            // Blocking peek: rotating the head onto itself leaves the list
            // unchanged but tells us a message arrived. The claim itself
            // stays inside the script.
            let peeked: Option<String> = conn
                .blmove(
                    &self.queue,
                    &self.queue,
                    Direction::Left,
                    Direction::Left,
                    wait.as_secs_f64(),
                )
                .await
                .context("long-poll pending list")?;
            if peeked.is_some() {
                bodies = Script::new(CLAIM_SCRIPT)
                    .key(&self.queue)
                    .key(&inflight)
                    .arg(deadline)
                    .arg(max)
                    .invoke_async(&mut conn)
                    .await
                    .context("claim pending messages")?;
            }
        }

        Ok(bodies
            .into_iter()
            .map(|body| QueueMessage {
                receipt: body.clone(),
                body,
            })
            .collect())
    }

    async fn delete(&self, receipts: &[String]) -> anyhow::Result<()> {
        if receipts.is_empty() {
            return Ok(());
        }
        let mut conn = self.pool.get().await.context("redis pool")?;
        let inflight = self.inflight_key();
        for receipt in receipts {
            let _: i64 = conn
                .zrem(&inflight, receipt)
                .await
                .context("ack message")?;
        }
        Ok(())
    }
}
