//! Tracing subscriber setup for the `skypost` binary.

use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Filter used when `RUST_LOG` is not set: `level` for every `skypost*`
/// target, `info` for everything else.
pub fn default_filter(level: &str) -> String {
    format!("skypost={level},info")
}

/// Installs a global `fmt` subscriber.
///
/// `RUST_LOG` takes precedence over `level`. Call once, early in `main`.
pub fn init_tracing(level: &str) {
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter(level).into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}
