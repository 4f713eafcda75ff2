//! Telemetry helpers for structured logging and tracing.

use tracing_subscriber::EnvFilter;

/// Initialize tracing/telemetry. Users can install their own subscriber; this
/// helper installs a default env-based subscriber if none is set.
pub fn init_tracing() {
    init_tracing_with_default("info");
}

/// Same as [`init_tracing`], but falls back to `default_level` when
/// `RUST_LOG` is unset or unparsable. A `default_level` that is not a valid
/// filter directive falls back to `info`.
///
/// Returns `true` if this call installed the global subscriber, `false` if
/// one was already in place.
pub fn init_tracing_with_default(default_level: &str) -> bool {
    if tracing::dispatcher::has_been_set() {
        return false;
    }
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_level))
        .unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).try_init().is_ok()
}
