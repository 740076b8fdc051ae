use thiserror::Error;

/// Core error type shared across Datalchemy crates.
#[derive(Debug, Error)]
pub enum Error {
    /// Conversion through the serde representation failed.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Convenience alias for results returned by Datalchemy crates.
pub type Result<T> = std::result::Result<T, Error>;
