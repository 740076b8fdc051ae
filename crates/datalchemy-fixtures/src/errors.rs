use thiserror::Error;

/// Errors emitted while configuring or running a fixture build.
#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("Amount supplied to {call} must be zero or positive, but got {amount}")]
    NegativeAmount { call: &'static str, amount: i64 },
    #[error("Cannot override nested path \"{path}\" - missing .with(\"{parent}\") call")]
    MissingRelation { path: String, parent: String },
    #[error("cannot generate an array of AutoIncrement values at \"{path}\"")]
    SequentialArray { path: String },
    #[error("invalid selection at \"{path}\": {message}")]
    InvalidSelection { path: String, message: String },
    #[error("invalid options: {0}")]
    InvalidOptions(String),
    #[error("config error: {0}")]
    Config(#[from] toml::de::Error),
    #[error("logging error: {0}")]
    Logging(String),
    #[error(transparent)]
    Core(#[from] datalchemy_core::Error),
}

/// Result alias for fixture operations.
pub type Result<T> = std::result::Result<T, GenerationError>;
