//! Error types for the bot platform client

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PlatformError {
    /// The platform answered with a non-success status; `body` is the
    /// response payload, verbatim
    #[error("Platform rejected the request ({status}): {body}")]
    RemoteRejected { status: u16, body: String },
    /// OAuth token request failed
    #[error("Authentication failed: {0}")]
    Authentication(String),
    #[error("Network error: {0}")]
    Network(String),
    /// Response body did not have the expected shape
    #[error("Unexpected platform response: {0}")]
    Decode(String),
}

impl From<reqwest::Error> for PlatformError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            PlatformError::Decode(err.to_string())
        } else {
            PlatformError::Network(err.to_string())
        }
    }
}

pub type PlatformResult<T> = Result<T, PlatformError>;
