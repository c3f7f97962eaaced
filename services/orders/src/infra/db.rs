use anyhow::{Context as _, anyhow};
use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, DatabaseConnection, DatabaseTransaction,
    EntityTrait, QueryFilter, QueryOrder, QuerySelect, SqlErr, TransactionError, TransactionTrait,
};
use uuid::Uuid;

use venta_orders_schema::{idempotency_requests, orders, outbox_events};

use crate::domain::repository::{
    IntakeInsertError, IntakeRepository, OutboxRepository, RelayCompletion,
};
use crate::domain::types::{IdemStatus, IdempotencyEntry, Order, OrderStatus, OutboxEvent};
use crate::error::OrdersServiceError;

#[derive(Clone)]
pub struct DbOrderRepository {
    pub db: DatabaseConnection,
}

impl IntakeRepository for DbOrderRepository {
    async fn find_entry(
        &self,
        key_hash: &str,
    ) -> Result<Option<IdempotencyEntry>, OrdersServiceError> {
        let model = idempotency_requests::Entity::find_by_id(key_hash.to_owned())
            .one(&self.db)
            .await
            .context("find idempotency entry")?;
        Ok(model.map(entry_from_model).transpose()?)
    }

    async fn insert_intake(
        &self,
        entry: Option<&IdempotencyEntry>,
        order: &Order,
        event: &OutboxEvent,
    ) -> Result<(), IntakeInsertError> {
        let result = self
            .db
            .transaction::<_, (), sea_orm::DbErr>(|txn| {
                let entry = entry.cloned();
                let order = order.clone();
                let event = event.clone();
                Box::pin(async move {
                    if let Some(entry) = &entry {
                        insert_entry(txn, entry).await?;
                    }
                    insert_order(txn, &order).await?;
                    insert_outbox_event(txn, &event).await?;
                    Ok(())
                })
            })
            .await;

        match result {
            Ok(()) => Ok(()),
            Err(TransactionError::Transaction(e))
                if matches!(e.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) =>
            {
                Err(IntakeInsertError::DuplicateKey)
            }
            Err(e) => Err(IntakeInsertError::Other(
                anyhow::Error::new(e).context("intake transaction"),
            )),
        }
    }
}

impl OutboxRepository for DbOrderRepository {
    async fn find_event(
        &self,
        event_id: Uuid,
    ) -> Result<Option<OutboxEvent>, OrdersServiceError> {
        let model = outbox_events::Entity::find_by_id(event_id)
            .one(&self.db)
            .await
            .context("find outbox event")?;
        Ok(model.map(event_from_model))
    }

    async fn find_order(&self, order_id: Uuid) -> Result<Option<Order>, OrdersServiceError> {
        let model = orders::Entity::find_by_id(order_id)
            .one(&self.db)
            .await
            .context("find order")?;
        Ok(model.map(order_from_model).transpose()?)
    }

    async fn mark_relayed(&self, completion: &RelayCompletion) -> Result<(), OrdersServiceError> {
        self.db
            .transaction::<_, (), sea_orm::DbErr>(|txn| {
                let completion = completion.clone();
                Box::pin(async move {
                    let now = Utc::now();

                    orders::ActiveModel {
                        id: Set(completion.order_id),
                        status: Set(OrderStatus::Created.as_str().to_owned()),
                        ..Default::default()
                    }
                    .update(txn)
                    .await?;

                    idempotency_requests::ActiveModel {
                        key_hash: Set(completion.key_hash.clone()),
                        status: Set(IdemStatus::Done.as_str().to_owned()),
                        status_code: Set(Some(completion.status_code)),
                        response_body: Set(Some(completion.response_body.clone())),
                        updated_at: Set(now),
                        ..Default::default()
                    }
                    .update(txn)
                    .await?;

                    outbox_events::ActiveModel {
                        event_id: Set(completion.event_id),
                        published_at: Set(Some(now)),
                        ..Default::default()
                    }
                    .update(txn)
                    .await?;

                    Ok(())
                })
            })
            .await
            .context("mark relayed")?;
        Ok(())
    }

    async fn find_unpublished_before(
        &self,
        cutoff: DateTime<Utc>,
        limit: u64,
    ) -> Result<Vec<OutboxEvent>, OrdersServiceError> {
        let models = outbox_events::Entity::find()
            .filter(outbox_events::Column::PublishedAt.is_null())
            .filter(outbox_events::Column::CreatedAt.lt(cutoff))
            .order_by_asc(outbox_events::Column::CreatedAt)
            .limit(limit)
            .all(&self.db)
            .await
            .context("find unpublished outbox events")?;
        Ok(models.into_iter().map(event_from_model).collect())
    }
}

async fn insert_entry(
    txn: &DatabaseTransaction,
    entry: &IdempotencyEntry,
) -> Result<(), sea_orm::DbErr> {
    idempotency_requests::ActiveModel {
        key_hash: Set(entry.key_hash.clone()),
        body_hash: Set(entry.body_hash.clone()),
        status: Set(entry.status.as_str().to_owned()),
        status_code: Set(entry.status_code),
        response_body: Set(entry.response_body.clone()),
        created_at: Set(entry.created_at),
        updated_at: Set(entry.updated_at),
    }
    .insert(txn)
    .await?;
    Ok(())
}

async fn insert_order(txn: &DatabaseTransaction, order: &Order) -> Result<(), sea_orm::DbErr> {
    let items =
        serde_json::to_value(&order.items).map_err(|e| sea_orm::DbErr::Custom(e.to_string()))?;
    orders::ActiveModel {
        id: Set(order.id),
        customer_id: Set(order.customer_id.clone()),
        items: Set(items),
        status: Set(order.status.as_str().to_owned()),
        created_at: Set(order.created_at),
    }
    .insert(txn)
    .await?;
    Ok(())
}

async fn insert_outbox_event(
    txn: &DatabaseTransaction,
    event: &OutboxEvent,
) -> Result<(), sea_orm::DbErr> {
    outbox_events::ActiveModel {
        event_id: Set(event.event_id),
        aggregate_id: Set(event.aggregate_id),
        kind: Set(event.kind.clone()),
        payload: Set(event.payload.clone()),
        published_at: Set(event.published_at),
        retries: Set(event.retries),
        created_at: Set(event.created_at),
    }
    .insert(txn)
    .await?;
    Ok(())
}

fn entry_from_model(model: idempotency_requests::Model) -> anyhow::Result<IdempotencyEntry> {
    let status = IdemStatus::parse(&model.status)
        .ok_or_else(|| anyhow!("unknown idempotency status: {}", model.status))?;
    Ok(IdempotencyEntry {
        key_hash: model.key_hash,
        body_hash: model.body_hash,
        status,
        status_code: model.status_code,
        response_body: model.response_body,
        created_at: model.created_at,
        updated_at: model.updated_at,
    })
}

fn order_from_model(model: orders::Model) -> anyhow::Result<Order> {
    let status = OrderStatus::parse(&model.status)
        .ok_or_else(|| anyhow!("unknown order status: {}", model.status))?;
    let items = serde_json::from_value(model.items).context("decode order items")?;
    Ok(Order {
        id: model.id,
        customer_id: model.customer_id,
        items,
        status,
        created_at: model.created_at,
    })
}

fn event_from_model(model: outbox_events::Model) -> OutboxEvent {
    OutboxEvent {
        event_id: model.event_id,
        aggregate_id: model.aggregate_id,
        kind: model.kind,
        payload: model.payload,
        published_at: model.published_at,
        retries: model.retries,
        created_at: model.created_at,
    }
}
