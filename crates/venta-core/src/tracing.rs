use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Install the JSON subscriber every service logs through. `RUST_LOG`
/// controls the filter. Repeat calls are no-ops, which keeps tests that
/// share a process from fighting over the global subscriber.
pub fn init_tracing() {
    let _ = tracing_subscriber::registry()
        .with(EnvFilter::from_default_env())
        .with(fmt::layer().json())
        .try_init();
}
