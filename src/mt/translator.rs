//! Machine translation trait and utilities
//!
//! This module defines the `MachineTranslator` trait for backend abstraction.
//! A translator is bound to one language pair when it is built, so the pair
//! is validated once, before any text is sent anywhere.
//!
//! # Example
//!
//! ```ignore
//! use dataset_translation::mt::{LanguagePair, MachineTranslator, PassThroughTranslator};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let pair = LanguagePair::new("en", "fr")?;
//!     let translator = PassThroughTranslator::new(pair);
//!
//!     let texts = vec!["Hello".to_string(), "Goodbye".to_string()];
//!     let results = translator.translate_batch(&texts, 10).await?;
//!     println!("{:?}", results);
//!
//!     Ok(())
//! }
//! ```

use crate::mt::error::{MtError, MtResult};
use async_trait::async_trait;

/// Generic trait for machine translation backends
///
/// Implementations handle the actual translation work, whether through an
/// API (the hosted translation service) or deterministic logic (pass-through,
/// mock).
#[async_trait]
pub trait MachineTranslator: Send + Sync {
    /// Translate `texts`, sending at most `batch_size` of them per request
    ///
    /// # Guarantees
    ///
    /// - Output order matches input order
    /// - Output length equals input length
    /// - An empty output string means the backend could not translate that input
    ///
    /// # Errors
    ///
    /// * `MtError::ConfigError` - If `batch_size` is zero
    /// * `MtError::TranslationError` / `MtError::NetworkError` - If the backend fails
    async fn translate_batch(&self, texts: &[String], batch_size: usize)
    -> MtResult<Vec<String>>;

    /// Translate a single string as a one-element batch
    async fn translate(&self, text: &str) -> MtResult<String> {
        let results = self.translate_batch(&[text.to_string()], 1).await?;
        results.into_iter().next().ok_or_else(|| {
            MtError::TranslationError(format!("No translation returned for '{}'", text))
        })
    }

    /// Source and target languages this translator was built for
    fn language_pair(&self) -> &LanguagePair;

    /// Name of the backend, used in logs and output file names
    fn provider_name(&self) -> &str;
}

/// Source/target language codes (ISO 639-1, e.g. `en`, `fr`)
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LanguagePair {
    pub source: String,
    pub target: String,
}

impl LanguagePair {
    /// Build a pair from two locale codes, normalized to their base language
    ///
    /// # Example
    ///
    /// ```ignore
    /// let pair = LanguagePair::new("en-US", "FR")?;
    /// assert_eq!(pair.source, "en");
    /// assert_eq!(pair.target, "fr");
    /// ```
    pub fn new(source: &str, target: &str) -> MtResult<Self> {
        validate_locale(source)?;
        validate_locale(target)?;
        Ok(Self {
            source: normalize_locale(source),
            target: normalize_locale(target),
        })
    }
}

impl std::fmt::Display for LanguagePair {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} → {}", self.source, self.target)
    }
}

/// Reject a zero batch size, which would never make progress
pub fn check_batch_size(batch_size: usize) -> MtResult<()> {
    if batch_size == 0 {
        return Err(MtError::ConfigError(
            "Batch size must be at least 1".to_string(),
        ));
    }
    Ok(())
}

/// Normalize a locale code by stripping region information
///
/// - `en-US` → `en`
/// - `zh-Hans` → `zh`
/// - `en` → `en` (unchanged)
pub fn normalize_locale(locale: &str) -> String {
    locale
        .split(['-', '_'])
        .next()
        .unwrap_or(locale)
        .to_lowercase()
}

/// Validate that a locale code is in acceptable format
///
/// Checks that the locale code contains only alphanumeric characters,
/// hyphens, and underscores.
pub fn validate_locale(locale: &str) -> MtResult<()> {
    if locale.is_empty() {
        return Err(MtError::InvalidLocale("Locale code is empty".to_string()));
    }

    if !locale
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
    {
        return Err(MtError::InvalidLocale(format!(
            "Invalid characters in locale code: {}",
            locale
        )));
    }

    Ok(())
}
