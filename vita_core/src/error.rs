//! Error types for the vita_core library.

use std::io;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for vita_core operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// IO error occurred
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// SQLite error
    #[error("Database error: {0}")]
    Sqlite(#[from] rusqlite::Error),

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

    /// Rejected user input (empty name, non-positive height, ...)
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Activity level text outside the closed selection set
    #[error("Unknown activity level: {0}")]
    UnknownActivityLevel(String),

    /// Damage table loading or shape error
    #[error("Damage data error: {0}")]
    Damage(String),
}
