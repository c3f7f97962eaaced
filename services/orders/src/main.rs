use sea_orm::Database;
use tracing::info;

use venta_core::config::Config;
use venta_orders::config::OrdersConfig;
use venta_orders::router::build_router;
use venta_orders::state::AppState;
use venta_orders::usecase::sweep::SweepOutboxUseCase;

#[tokio::main]
async fn main() {
    venta_core::tracing::init_tracing();

    let config = OrdersConfig::from_env();

    let db = Database::connect(&config.database_url)
        .await
        .expect("failed to connect to database");

    let state = AppState { db };

    // Outbox sweeper: re-triggers events whose fire-and-forget relay trigger
    // never ran.
    let sweeper = SweepOutboxUseCase {
        repo: state.outbox_repo(),
        relay: state.relay_trigger(),
        min_age: chrono::Duration::seconds(config.sweep_min_age_secs),
        batch: config.sweep_batch,
    };
    let sweep_interval = std::time::Duration::from_secs(config.sweep_interval_secs);
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(sweep_interval);
        loop {
            ticker.tick().await;
            if let Err(e) = sweeper.run_once().await {
                tracing::warn!(error = %e, "outbox sweep failed");
            }
        }
    });

    let router = build_router(state);
    let addr = format!("0.0.0.0:{}", config.orders_port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .expect("failed to bind");

    info!("orders service listening on {addr}");
    axum::serve(listener, router).await.expect("server error");
}
