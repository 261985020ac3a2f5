//! Logging setup utilities for the Taikyoku game relay.

use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Build the default filter directive for the given crate and binary.
///
/// Both names are normalized to the form `tracing` uses for module paths
/// (`taikyoku-server` → `taikyoku_server`).
pub fn default_filter_directive(
    crate_name: &str,
    binary_name: &str,
    default_log_level: &str,
) -> String {
    format!(
        "{}={},{}={},tower_http={}",
        crate_name.replace('-', "_"),
        default_log_level,
        binary_name.replace('-', "_"),
        default_log_level,
        default_log_level
    )
}

/// Initialize the tracing subscriber with the specified default log level.
///
/// The log level can be overridden using the `RUST_LOG` environment variable.
///
/// # Arguments
///
/// * `crate_name` - The library crate whose logs should be shown (e.g., "taikyoku-server")
/// * `binary_name` - The name of the binary (e.g., "taikyoku-server")
/// * `default_log_level` - The default log level (e.g., "debug", "info", "warn", "error")
///
/// # Examples
///
/// ```no_run
/// use taikyoku_shared::logger::setup_logger;
///
/// setup_logger("taikyoku-server", "taikyoku-server", "debug");
/// ```
pub fn setup_logger(crate_name: &str, binary_name: &str, default_log_level: &str) {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            default_filter_directive(crate_name, binary_name, default_log_level).into()
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();
}
