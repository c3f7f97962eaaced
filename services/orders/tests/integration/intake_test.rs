use venta_core::hash::sha256_hex;
use venta_orders::domain::types::{CreateOrderRequest, IdemStatus, OrderStatus};
use venta_orders::error::OrdersServiceError;
use venta_orders::usecase::intake::{
    CreateOrderInput, CreateOrderUseCase, MSG_CONCURRENT, MSG_REPLAYED,
};

use crate::helpers::{MockIntakeRepo, MockRelayTrigger, line_item, pending_entry};

fn request(customer: &str) -> CreateOrderRequest {
    CreateOrderRequest {
        customer_id: customer.to_owned(),
        items: vec![line_item("A", 1)],
    }
}

fn body_hash_of(body: &CreateOrderRequest) -> String {
    sha256_hex(&serde_json::to_string(body).unwrap())
}

#[tokio::test]
async fn should_accept_fresh_order_and_write_all_three_rows() {
    let repo = MockIntakeRepo::default();
    let entries = repo.entries_handle();
    let orders = repo.orders_handle();
    let events = repo.events_handle();
    let trigger = MockRelayTrigger::default();
    let triggered = trigger.triggered_handle();

    let uc = CreateOrderUseCase {
        repo,
        relay: trigger,
    };
    let body = request("C1");
    let response = uc
        .execute(CreateOrderInput {
            idempotency_token: Some("T1".to_owned()),
            body: body.clone(),
        })
        .await
        .unwrap();

    assert_eq!(response.request_id, sha256_hex("T1"));
    assert_eq!(response.message, None);

    let entries = entries.lock().unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].key_hash, sha256_hex("T1"));
    assert_eq!(entries[0].body_hash, body_hash_of(&body));
    assert_eq!(entries[0].status, IdemStatus::Pending);

    let orders = orders.lock().unwrap();
    assert_eq!(orders.len(), 1);
    assert_eq!(orders[0].customer_id, "C1");
    assert_eq!(orders[0].status, OrderStatus::New);

    let events = events.lock().unwrap();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].kind, "OrderCreated");
    assert_eq!(events[0].aggregate_id, orders[0].id);
    assert!(events[0].published_at.is_none());
    assert_eq!(events[0].retries, 0);
    assert_eq!(events[0].payload["order_id"], orders[0].id.to_string());
    assert_eq!(events[0].payload["key_hash"], sha256_hex("T1"));

    let triggered = triggered.lock().unwrap();
    assert_eq!(*triggered, vec![events[0].event_id]);
}

#[tokio::test]
async fn should_generate_token_when_header_absent() {
    let repo = MockIntakeRepo::default();
    let entries = repo.entries_handle();
    let uc = CreateOrderUseCase {
        repo,
        relay: MockRelayTrigger::default(),
    };

    let response = uc
        .execute(CreateOrderInput {
            idempotency_token: None,
            body: request("C1"),
        })
        .await
        .unwrap();

    assert_eq!(response.request_id.len(), 64);
    assert!(response.request_id.chars().all(|c| c.is_ascii_hexdigit()));
    let entries = entries.lock().unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].key_hash, response.request_id);
}

#[tokio::test]
async fn should_replay_done_entry_without_side_effects() {
    let body = request("C1");
    let key_hash = sha256_hex("T1");
    let mut entry = pending_entry(&key_hash, &body_hash_of(&body));
    entry.status = IdemStatus::Done;
    entry.status_code = Some(201);
    entry.response_body = Some(serde_json::json!({ "status": "CREATED" }));

    let repo = MockIntakeRepo::with_entries(vec![entry]);
    let entries = repo.entries_handle();
    let orders = repo.orders_handle();
    let events = repo.events_handle();
    let trigger = MockRelayTrigger::default();
    let triggered = trigger.triggered_handle();

    let uc = CreateOrderUseCase {
        repo,
        relay: trigger,
    };
    let response = uc
        .execute(CreateOrderInput {
            idempotency_token: Some("T1".to_owned()),
            body,
        })
        .await
        .unwrap();

    assert_eq!(response.request_id, key_hash);
    assert_eq!(response.message.as_deref(), Some(MSG_REPLAYED));
    assert_eq!(entries.lock().unwrap().len(), 1, "no new ledger row");
    assert!(orders.lock().unwrap().is_empty(), "no new order");
    assert!(events.lock().unwrap().is_empty(), "no new outbox event");
    assert!(triggered.lock().unwrap().is_empty(), "no relay trigger");
}

#[tokio::test]
async fn should_reject_same_token_with_different_payload() {
    let original = request("C1");
    let entry = pending_entry(&sha256_hex("T1"), &body_hash_of(&original));

    let repo = MockIntakeRepo::with_entries(vec![entry]);
    let orders = repo.orders_handle();
    let events = repo.events_handle();

    let uc = CreateOrderUseCase {
        repo,
        relay: MockRelayTrigger::default(),
    };
    let different = CreateOrderRequest {
        customer_id: "C2".to_owned(),
        items: vec![],
    };
    let result = uc
        .execute(CreateOrderInput {
            idempotency_token: Some("T1".to_owned()),
            body: different,
        })
        .await;

    assert!(
        matches!(result, Err(OrdersServiceError::PayloadMismatch)),
        "expected PayloadMismatch, got {result:?}"
    );
    assert!(orders.lock().unwrap().is_empty());
    assert!(events.lock().unwrap().is_empty());
}

#[tokio::test]
async fn should_continue_on_pending_entry_without_new_ledger_row() {
    let body = request("C1");
    let entry = pending_entry(&sha256_hex("T1"), &body_hash_of(&body));

    let repo = MockIntakeRepo::with_entries(vec![entry]);
    let entries = repo.entries_handle();
    let orders = repo.orders_handle();
    let events = repo.events_handle();

    let uc = CreateOrderUseCase {
        repo,
        relay: MockRelayTrigger::default(),
    };
    let response = uc
        .execute(CreateOrderInput {
            idempotency_token: Some("T1".to_owned()),
            body,
        })
        .await
        .unwrap();

    assert_eq!(response.message, None);
    assert_eq!(entries.lock().unwrap().len(), 1, "ledger row is reused");
    assert_eq!(orders.lock().unwrap().len(), 1);
    assert_eq!(events.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn should_acknowledge_concurrent_duplicate_key_race() {
    let repo = MockIntakeRepo {
        race_on_insert: true,
        ..Default::default()
    };
    let orders = repo.orders_handle();
    let events = repo.events_handle();
    let trigger = MockRelayTrigger::default();
    let triggered = trigger.triggered_handle();

    let uc = CreateOrderUseCase {
        repo,
        relay: trigger,
    };
    let response = uc
        .execute(CreateOrderInput {
            idempotency_token: Some("T1".to_owned()),
            body: request("C1"),
        })
        .await
        .unwrap();

    assert_eq!(response.request_id, sha256_hex("T1"));
    assert_eq!(response.message.as_deref(), Some(MSG_CONCURRENT));
    assert!(orders.lock().unwrap().is_empty());
    assert!(events.lock().unwrap().is_empty());
    assert!(triggered.lock().unwrap().is_empty());
}

#[tokio::test]
async fn should_return_accepted_even_when_trigger_fails() {
    let repo = MockIntakeRepo::default();
    let orders = repo.orders_handle();

    let uc = CreateOrderUseCase {
        repo,
        relay: MockRelayTrigger::failing(),
    };
    let response = uc
        .execute(CreateOrderInput {
            idempotency_token: Some("T1".to_owned()),
            body: request("C1"),
        })
        .await
        .unwrap();

    assert_eq!(response.message, None);
    assert_eq!(orders.lock().unwrap().len(), 1, "rows still committed");
}

#[tokio::test]
async fn should_return_same_request_id_for_identical_retries() {
    let repo = MockIntakeRepo::default();
    let uc = CreateOrderUseCase {
        repo,
        relay: MockRelayTrigger::default(),
    };

    let first = uc
        .execute(CreateOrderInput {
            idempotency_token: Some("T1".to_owned()),
            body: request("C1"),
        })
        .await
        .unwrap();
    let second = uc
        .execute(CreateOrderInput {
            idempotency_token: Some("T1".to_owned()),
            body: request("C1"),
        })
        .await
        .unwrap();

    assert_eq!(first.request_id, second.request_id);
}
