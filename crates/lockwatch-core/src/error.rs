use thiserror::Error;

/// Core error type for lockwatch operations.
#[derive(Error, Debug)]
pub enum LockwatchError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("HTTP error: {0}")]
    Http(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<serde_json::Error> for LockwatchError {
    fn from(e: serde_json::Error) -> Self {
        LockwatchError::Serialization(e.to_string())
    }
}

/// Result type alias using LockwatchError.
pub type Result<T> = std::result::Result<T, LockwatchError>;
