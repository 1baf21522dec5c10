use std::sync::OnceLock;

use anyhow::{Error, Result};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

static TRACING_INIT: OnceLock<std::result::Result<(), String>> = OnceLock::new();

/// Installs the global tracing subscriber once.
///
/// JSON lines go to stderr so stdout stays free for results. The filter
/// comes from `RUST_LOG` and defaults to `info`. Later calls return the
/// outcome of the first one.
///
/// # Errors
/// Returns an error when another subscriber was installed first.
pub fn init() -> Result<()> {
    TRACING_INIT
        .get_or_init(install_subscriber)
        .clone()
        .map_err(Error::msg)
}

fn install_subscriber() -> std::result::Result<(), String> {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_target(false)
        .with_writer(std::io::stderr)
        .json();

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .try_init()
        .map_err(|e: tracing_subscriber::util::TryInitError| e.to_string())
}
