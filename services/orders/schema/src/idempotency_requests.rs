use sea_orm::entity::prelude::*;

/// Idempotency ledger row. Keyed by the sha-256 of the client token; the
/// unique primary key is the serialization point for concurrent intakes.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "idempotency_requests")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub key_hash: String,
    pub body_hash: String,
    /// "PENDING" | "DONE".
    pub status: String,
    pub status_code: Option<i32>,
    pub response_body: Option<Json>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
