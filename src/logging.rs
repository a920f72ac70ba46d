//! Tracing setup for the CLI
//!
//! Uses the `RUST_LOG` env var when set, `info` otherwise.

use tracing_subscriber::{
    Layer, filter::EnvFilter, layer::SubscriberExt, util::SubscriberInitExt,
};

/// Initialize tracing with an env filter and the plain fmt layer
pub fn init_standard_tracing() {
    init_with_default("info");
}

/// Same as [`init_standard_tracing`], with `warn` as the fallback level
pub fn init_quiet_tracing() {
    init_with_default("warn");
}

fn init_with_default(default: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_filter(filter),
        )
        .init();
}
