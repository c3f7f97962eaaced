use chrono::{Duration, Utc};
use serde_json::json;
use uuid::Uuid;

use venta_orders::domain::types::OutboxEvent;
use venta_orders::usecase::sweep::SweepOutboxUseCase;

use crate::helpers::{MockOutboxRepo, MockRelayTrigger};

fn event_aged(age_secs: i64, published: bool) -> OutboxEvent {
    let created_at = Utc::now() - Duration::seconds(age_secs);
    OutboxEvent {
        event_id: Uuid::new_v4(),
        aggregate_id: Uuid::new_v4(),
        kind: "OrderCreated".to_owned(),
        payload: json!({}),
        published_at: published.then(Utc::now),
        retries: 0,
        created_at,
    }
}

#[tokio::test]
async fn should_retrigger_only_stale_unpublished_events() {
    let stale = event_aged(120, false);
    let stale_id = stale.event_id;
    let already_published = event_aged(120, true);
    let fresh = event_aged(0, false);

    let repo = MockOutboxRepo::default();
    repo.events
        .lock()
        .unwrap()
        .extend([stale, already_published, fresh]);
    let trigger = MockRelayTrigger::default();
    let triggered = trigger.triggered_handle();

    let uc = SweepOutboxUseCase {
        repo,
        relay: trigger,
        min_age: Duration::seconds(60),
        batch: 100,
    };
    let count = uc.run_once().await.unwrap();

    assert_eq!(count, 1);
    assert_eq!(*triggered.lock().unwrap(), vec![stale_id]);
}

#[tokio::test]
async fn should_respect_batch_limit() {
    let repo = MockOutboxRepo::default();
    for _ in 0..5 {
        repo.events.lock().unwrap().push(event_aged(120, false));
    }
    let trigger = MockRelayTrigger::default();
    let triggered = trigger.triggered_handle();

    let uc = SweepOutboxUseCase {
        repo,
        relay: trigger,
        min_age: Duration::seconds(60),
        batch: 2,
    };
    let count = uc.run_once().await.unwrap();

    assert_eq!(count, 2);
    assert_eq!(triggered.lock().unwrap().len(), 2);
}

#[tokio::test]
async fn should_survive_trigger_failures() {
    let repo = MockOutboxRepo::default();
    repo.events.lock().unwrap().push(event_aged(120, false));

    let uc = SweepOutboxUseCase {
        repo,
        relay: MockRelayTrigger::failing(),
        min_age: Duration::seconds(60),
        batch: 100,
    };

    // A failed re-trigger is logged, not fatal; the event is still counted.
    assert_eq!(uc.run_once().await.unwrap(), 1);
}
