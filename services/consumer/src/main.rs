use std::time::Duration;

use tracing::info;

use venta_core::config::Config;
use venta_consumer::config::ConsumerConfig;
use venta_consumer::delivery::HttpOrderDelivery;
use venta_consumer::queue::RedisQueue;
use venta_consumer::worker::ConsumerWorker;

#[tokio::main]
async fn main() {
    venta_core::tracing::init_tracing();

    let config = ConsumerConfig::from_env();

    let redis_cfg = deadpool_redis::Config::from_url(&config.redis_url);
    let pool = redis_cfg
        .create_pool(Some(deadpool_redis::Runtime::Tokio1))
        .expect("failed to create Redis pool");

    let queue = RedisQueue {
        pool,
        queue: config.queue_name.clone(),
    };
    let delivery = HttpOrderDelivery::new(
        config.target_url.clone(),
        Duration::from_secs(config.http_timeout_secs),
    )
    .expect("failed to build HTTP client");

    let worker = ConsumerWorker {
        queue,
        delivery,
        batch: config.batch.min(10),
        wait: Duration::from_secs(config.wait_secs),
        visibility: Duration::from_secs(config.visibility_secs),
    };

    info!(
        queue = %config.queue_name,
        target = %config.target_url,
        "consumer starting"
    );
    worker.run().await
}
