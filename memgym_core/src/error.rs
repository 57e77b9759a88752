//! Error types for the memgym_core library.

use std::io;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for memgym_core operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// IO error occurred
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// CSV error
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// TOML parsing error
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Configuration validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Card or subject validation error
    #[error("Invalid card: {0}")]
    CardValidation(String),

    /// A session operation was invoked in a phase that forbids it.
    /// The session is left untouched in its prior state.
    #[error("Session state violation: {0}")]
    StateViolation(String),

    /// Generic error
    #[error("{0}")]
    Other(String),
}
