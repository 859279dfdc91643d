//! Tracing subscriber setup.

use tracing_subscriber::EnvFilter;

/// Install a compact fmt subscriber.
///
/// The filter comes from `RUST_LOG` when set, else `default_filter`.
/// Returns `false` if a global subscriber was already installed.
pub fn init_logging(default_filter: &str) -> bool {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_filter))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .compact()
        .try_init()
        .is_ok()
}
