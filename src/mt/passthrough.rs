//! Pass-through translator
//!
//! Returns every input unchanged. Selected with `--api none`, it runs the
//! whole import pipeline (re-tokenization, entity reconciliation, synonym
//! upload) without a translation service, e.g. to copy a dataset into a bot
//! version for a language the service does not cover.

use crate::mt::error::MtResult;
use crate::mt::translator::{LanguagePair, MachineTranslator, check_batch_size};
use async_trait::async_trait;

#[derive(Debug, Clone)]
pub struct PassThroughTranslator {
    pair: LanguagePair,
}

impl PassThroughTranslator {
    pub fn new(pair: LanguagePair) -> Self {
        Self { pair }
    }
}

#[async_trait]
impl MachineTranslator for PassThroughTranslator {
    async fn translate_batch(
        &self,
        texts: &[String],
        batch_size: usize,
    ) -> MtResult<Vec<String>> {
        check_batch_size(batch_size)?;
        Ok(texts.to_vec())
    }

    fn language_pair(&self) -> &LanguagePair {
        &self.pair
    }

    fn provider_name(&self) -> &str {
        "none"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mt::error::MtError;

    fn translator() -> PassThroughTranslator {
        PassThroughTranslator::new(LanguagePair::new("en", "fr").unwrap())
    }

    #[tokio::test]
    async fn test_returns_inputs_unchanged() {
        let texts = vec!["BOXOPTION and plug CPL".to_string(), "".to_string()];
        let results = translator().translate_batch(&texts, 10).await.unwrap();
        assert_eq!(results, texts);
    }

    #[tokio::test]
    async fn test_single_translation() {
        assert_eq!(translator().translate("Roller").await.unwrap(), "Roller");
    }

    #[tokio::test]
    async fn test_zero_batch_size() {
        let result = translator().translate_batch(&["a".to_string()], 0).await;
        assert!(matches!(result, Err(MtError::ConfigError(_))));
    }

    #[test]
    fn test_accepts_any_pair() {
        let pair = LanguagePair::new("language1", "language2").unwrap();
        let translator = PassThroughTranslator::new(pair.clone());
        assert_eq!(translator.language_pair(), &pair);
        assert_eq!(translator.provider_name(), "none");
    }
}
