//! Chatbot dataset translation
//!
//! Translates the training data of a bot (intents, their annotated
//! expressions, and entity synonyms) from one language to another, and
//! imports the result into the bot platform with entity annotations kept.
//!
//! Machine translation changes the words an entity is written with, and the
//! platform only re-detects gold entities (numbers, pronouns, ...) on its own.
//! Free and restricted entity annotations are recovered by
//! [`reconcile`]: every translated token is matched against the translations
//! and synonyms of the original entity words.
//!
//! # Example
//!
//! ```ignore
//! use dataset_translation::mt::{build_translator, LanguagePair, TranslatorKind};
//! use dataset_translation::platform::{PlatformClient, PlatformEndpoints};
//! use dataset_translation::translation::DatasetTranslation;
//! use std::sync::Arc;
//!
//! let translator = build_translator(TranslatorKind::None, LanguagePair::new("en", "fr")?, None)?;
//! let platform = PlatformClient::connect(&credentials, &PlatformEndpoints::default()).await?;
//! let summary = DatasetTranslation::new(translator, Arc::new(platform))
//!     .translate(&mut dataset)
//!     .await?;
//! ```

pub mod config;
pub mod dataset;
pub mod error;
pub mod io;
pub mod mt;
pub mod normalize;
pub mod platform;
pub mod reconcile;
pub mod translation;

pub use dataset::{Dataset, EntityKind, Expression, Gazette, Intent, Token, TokenEntity};
pub use error::{RunResult, TranslationRunError};
pub use translation::{DatasetTranslation, RunSummary};
