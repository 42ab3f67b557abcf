//! Error types for Geostress

use thiserror::Error;

/// Errors that can occur outside the pure engine
///
/// The engine itself never fails; these errors surface at the gateway,
/// configuration, and encoding boundaries.
#[derive(Debug, Error)]
pub enum StressError {
    #[error("Failed to parse payload: {0}")]
    ParseError(String),

    #[error("Invalid JSON: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Invalid configuration: {0}")]
    ConfigError(String),

    #[error("Missing required field: {0}")]
    MissingField(String),

    #[error("Date parse error: {0}")]
    DateParseError(String),

    #[error("No displacement series available for station {0}")]
    MissingSeries(String),

    #[error("Gateway failure: {0}")]
    Gateway(String),

    #[error("Invalid location: {0}")]
    InvalidLocation(String),

    #[error("Encoding error: {0}")]
    EncodingError(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
