//! Error types used throughout the application

use thiserror::Error;

/// Main error type for timebridge
#[derive(Error, Debug)]
pub enum TimebridgeError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Authentication error: {0}")]
    Auth(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Result type alias for timebridge operations
pub type Result<T> = std::result::Result<T, TimebridgeError>;
