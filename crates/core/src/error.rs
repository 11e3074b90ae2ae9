use thiserror::Error;

/// Result type alias for tailview-core
pub type Result<T> = std::result::Result<T, Error>;

/// Core error types for the tailview viewer
///
/// The viewer state machine itself is infallible; these cover the
/// surfaces around it (config, logging setup, history sources).
#[derive(Debug, Error)]
pub enum Error {
    /// I/O error for file operations
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration errors
    #[error("configuration error: {0}")]
    Config(String),

    /// Parse/serialization errors
    #[error("parse error: {0}")]
    Parse(String),

    /// History source errors (file vanished, channel closed, ...)
    #[error("history source error: {0}")]
    Source(String),

    /// Generic errors
    #[error("{0}")]
    Other(String),
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Parse(err.to_string())
    }
}

impl From<toml::de::Error> for Error {
    fn from(err: toml::de::Error) -> Self {
        Error::Config(format!("TOML parse error: {}", err))
    }
}
