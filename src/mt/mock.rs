//! Mock machine translator for testing
//!
//! A deterministic, network-free translator for exercising the translation
//! run without credentials. It also records how many batches it was asked to
//! translate, so tests can check batching.
//!
//! # Example
//!
//! ```ignore
//! use dataset_translation::mt::{LanguagePair, MachineTranslator, MockMode, MockTranslator};
//!
//! #[tokio::test]
//! async fn test_translation() {
//!     let mock = MockTranslator::new(LanguagePair::new("en", "fr").unwrap(), MockMode::Uppercase);
//!     let result = mock.translate("hello").await.unwrap();
//!     assert_eq!(result, "HELLO");
//! }
//! ```

use crate::mt::error::{MtError, MtResult};
use crate::mt::translator::{LanguagePair, MachineTranslator, check_batch_size};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Mock translation modes for testing different scenarios
#[derive(Debug, Clone)]
pub enum MockMode {
    /// Use predefined mappings; unknown texts come back unchanged
    Mappings(HashMap<String, String>),

    /// Uppercase every text
    Uppercase,

    /// Return an empty string for every text (untranslatable input)
    Empty,

    /// Simulate backend errors
    Error(String),
}

/// Mock translator that simulates various translation scenarios
#[derive(Debug)]
pub struct MockTranslator {
    pair: LanguagePair,
    mode: MockMode,
    batches: AtomicUsize,
}

impl MockTranslator {
    pub fn new(pair: LanguagePair, mode: MockMode) -> Self {
        Self {
            pair,
            mode,
            batches: AtomicUsize::new(0),
        }
    }

    /// Convenience constructor for a mapping table given as string pairs
    pub fn with_mappings<'a>(
        pair: LanguagePair,
        mappings: impl IntoIterator<Item = (&'a str, &'a str)>,
    ) -> Self {
        let map = mappings
            .into_iter()
            .map(|(from, to)| (from.to_string(), to.to_string()))
            .collect();
        Self::new(pair, MockMode::Mappings(map))
    }

    /// Number of batches translated so far
    pub fn batch_count(&self) -> usize {
        self.batches.load(Ordering::SeqCst)
    }

    fn apply_translation(&self, text: &str) -> MtResult<String> {
        match &self.mode {
            MockMode::Mappings(map) => Ok(map.get(text).cloned().unwrap_or_else(|| text.to_string())),
            MockMode::Uppercase => Ok(text.to_uppercase()),
            MockMode::Empty => Ok(String::new()),
            MockMode::Error(msg) => Err(MtError::TranslationError(msg.clone())),
        }
    }
}

#[async_trait]
impl MachineTranslator for MockTranslator {
    async fn translate_batch(
        &self,
        texts: &[String],
        batch_size: usize,
    ) -> MtResult<Vec<String>> {
        check_batch_size(batch_size)?;

        let mut results = Vec::with_capacity(texts.len());
        for chunk in texts.chunks(batch_size) {
            self.batches.fetch_add(1, Ordering::SeqCst);
            for text in chunk {
                results.push(self.apply_translation(text)?);
            }
        }
        Ok(results)
    }

    fn language_pair(&self) -> &LanguagePair {
        &self.pair
    }

    fn provider_name(&self) -> &str {
        "mock"
    }
}
