use sea_orm_migration::prelude::*;

mod m20260801_000001_create_orders;
mod m20260801_000002_create_idempotency_requests;
mod m20260801_000003_create_outbox_events;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20260801_000001_create_orders::Migration),
            Box::new(m20260801_000002_create_idempotency_requests::Migration),
            Box::new(m20260801_000003_create_outbox_events::Migration),
        ]
    }
}
