use sea_orm_migration::prelude::*;

use venta_orders_migration::Migrator;

#[tokio::main]
async fn main() {
    cli::run_cli(Migrator).await;
}
