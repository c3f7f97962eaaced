use sea_orm::entity::prelude::*;

/// Outbox event written in the same transaction as its order. `published_at`
/// is null until the relay worker stamps it.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "outbox_events")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub event_id: Uuid,
    pub aggregate_id: Uuid,
    pub kind: String,
    pub payload: Json,
    pub published_at: Option<chrono::DateTime<chrono::Utc>>,
    pub retries: i32,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
