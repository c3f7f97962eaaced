use sea_orm::entity::prelude::*;

/// Order aggregate row. `status` holds the application-level lifecycle tag
/// ("NEW" | "CREATED" | "FAILED") as plain text; the closed set lives in the
/// service's domain layer, not in a database enum type.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "orders")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub customer_id: String,
    pub items: Json,
    pub status: String,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
