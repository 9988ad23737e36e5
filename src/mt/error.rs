//! Error types for the translation backends

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MtError {
    /// Backend cannot be used as configured (unsupported language pair,
    /// missing credentials, invalid batch size)
    #[error("Configuration error: {0}")]
    ConfigError(String),
    /// Locale code is empty or malformed
    #[error("Invalid locale: {0}")]
    InvalidLocale(String),
    /// Request could not be sent or the response could not be read
    #[error("Network error: {0}")]
    NetworkError(String),
    /// Backend rejected the request or returned an unusable response
    #[error("Translation error: {0}")]
    TranslationError(String),
}

impl From<reqwest::Error> for MtError {
    fn from(err: reqwest::Error) -> Self {
        MtError::NetworkError(err.to_string())
    }
}

/// Result type for translation backend operations
pub type MtResult<T> = Result<T, MtError>;
