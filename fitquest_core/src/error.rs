//! Error types for the fitquest_core library.

use std::io;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for fitquest_core operations
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

    /// Input outside the documented domain (e.g. level 0)
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Workout plan failed validation
    #[error("Workout plan validation error: {0}")]
    PlanValidation(String),

    /// Workout plan lookup error (missing plan, day or exercise)
    #[error("Workout plan error: {0}")]
    Plan(String),

    /// Progress state management error
    #[error("State error: {0}")]
    State(String),

    /// Generic error
    #[error("{0}")]
    Other(String),
}
