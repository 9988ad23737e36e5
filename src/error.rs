//! Errors of a translation run

use crate::mt::MtError;
use crate::normalize::NormalizeError;
use crate::platform::PlatformError;
use std::path::PathBuf;
use thiserror::Error;

/// Anything that aborts a translation run
///
/// Nothing is retried: the first failing call ends the run.
#[derive(Debug, Error)]
pub enum TranslationRunError {
    #[error("Translation failed: {0}")]
    Translation(#[from] MtError),

    #[error("Platform call failed: {0}")]
    Platform(#[from] PlatformError),

    #[error("Invalid dataset export: {0}")]
    Normalize(#[from] NormalizeError),

    #[error("Failed to access '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid dataset JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid configuration: {0}")]
    Config(String),
}

pub type RunResult<T> = Result<T, TranslationRunError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_remote_payload_is_shown_verbatim() {
        let error = TranslationRunError::from(PlatformError::RemoteRejected {
            status: 409,
            body: r#"{"message":"Expression already exists"}"#.to_string(),
        });
        assert!(error
            .to_string()
            .contains(r#"{"message":"Expression already exists"}"#));
    }

    #[test]
    fn test_io_error_names_path() {
        let error = TranslationRunError::Io {
            path: PathBuf::from("/tmp/missing.json"),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "not found"),
        };
        assert!(error.to_string().contains("/tmp/missing.json"));
    }
}
