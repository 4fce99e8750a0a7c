//! Custom error types for validation operations

use thiserror::Error;

/// Validation-related errors
#[derive(Error, Debug)]
pub enum ValidationError {
    /// Transport-level failure: the service is unreachable or returned an
    /// undecodable body. Fatal to the whole dispatch.
    #[error("transport failure for \"{text}\": {message}")]
    TransportError {
        text: String,
        message: String,
    },

    /// Configuration error
    #[error("Configuration error: {message}")]
    ConfigError {
        message: String,
    },

    /// Language code has no column in the loaded corpus
    #[error("language {code} not found in corpus (looked for column {column})")]
    UnmappedLanguage {
        code: String,
        column: String,
    },

    /// Corpus file error
    #[error("Corpus error: {path} - {message}")]
    CorpusError {
        path: String,
        message: String,
    },

    /// IO error
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// Reqwest error
    #[error("HTTP client error: {0}")]
    HttpError(#[from] reqwest::Error),

    /// JSON error
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
}

impl From<anyhow::Error> for ValidationError {
    fn from(err: anyhow::Error) -> Self {
        ValidationError::ConfigError {
            message: err.to_string(),
        }
    }
}

/// Result type for validation operations
pub type Result<T> = std::result::Result<T, ValidationError>;
