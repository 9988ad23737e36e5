//! Translation backends
//!
//! Text translation is delegated to a backend implementing
//! [`MachineTranslator`]. The backend is chosen explicitly with a
//! [`TranslatorKind`]:
//!
//! 1. **Translation hub** - the hosted document-translation service
//! 2. **None** - a pass-through backend that leaves texts untouched
//!
//! A [`MockTranslator`] is provided for tests.
//!
//! # Example
//!
//! ```ignore
//! use dataset_translation::mt::{build_translator, LanguagePair, TranslatorKind};
//!
//! let pair = LanguagePair::new("en", "fr")?;
//! let translator = build_translator(TranslatorKind::None, pair, None)?;
//! let translated = translator.translate_batch(&texts, 10).await?;
//! ```

pub mod error;
pub mod mock;
pub mod passthrough;
pub mod translation_hub;
pub mod translator;

pub use error::{MtError, MtResult};
pub use mock::{MockMode, MockTranslator};
pub use passthrough::PassThroughTranslator;
pub use translation_hub::{HubCredentials, HubEndpoints, TranslationHubProvider};
pub use translator::{LanguagePair, MachineTranslator};

use std::str::FromStr;

/// Which translation backend a run uses
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TranslatorKind {
    TranslationHub,
    None,
}

impl TranslatorKind {
    pub const VALUES: [&'static str; 2] = ["translationhub", "none"];

    pub fn as_str(self) -> &'static str {
        match self {
            TranslatorKind::TranslationHub => "translationhub",
            TranslatorKind::None => "none",
        }
    }
}

impl FromStr for TranslatorKind {
    type Err = MtError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "translationhub" => Ok(TranslatorKind::TranslationHub),
            "none" => Ok(TranslatorKind::None),
            other => Err(MtError::ConfigError(format!(
                "Unknown translator API '{}' (expected one of: {})",
                other,
                Self::VALUES.join(", ")
            ))),
        }
    }
}

/// Build the backend selected by `kind`
///
/// Translation hub credentials fall back to the environment when `credentials`
/// is `None`. The language pair is checked before credentials are looked at,
/// and nothing here makes a network request.
pub fn build_translator(
    kind: TranslatorKind,
    pair: LanguagePair,
    credentials: Option<HubCredentials>,
) -> MtResult<Box<dyn MachineTranslator>> {
    match kind {
        TranslatorKind::TranslationHub => {
            let provider = match credentials {
                Some(credentials) => TranslationHubProvider::new(pair, credentials)?,
                None => TranslationHubProvider::from_env(pair)?,
            };
            Ok(Box::new(provider))
        }
        TranslatorKind::None => Ok(Box::new(PassThroughTranslator::new(pair))),
    }
}
