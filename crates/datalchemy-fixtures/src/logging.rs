use tracing_subscriber::EnvFilter;

use crate::errors::{GenerationError, Result};

/// Installs a stderr `fmt` subscriber.
///
/// `RUST_LOG` takes precedence over `default_filter`. Fails when a global
/// subscriber is already installed.
pub fn init_tracing(default_filter: &str) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_filter))
        .map_err(|err| GenerationError::Logging(err.to_string()))?;

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|err| GenerationError::Logging(err.to_string()))
}
