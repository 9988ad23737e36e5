//! Dataset translation run
//!
//! [`DatasetTranslation`] drives a whole run over a canonical [`Dataset`]:
//!
//! 1. the dataset language is switched to the target language
//! 2. every gazette's synonyms are translated and uploaded to the platform
//! 3. every intent's expressions are translated as a batch, then each
//!    translated expression is created on the platform and its entity
//!    annotations are recovered (see [`crate::reconcile`])
//!
//! Calls are issued one at a time, in document order. The first failure
//! aborts the run; the dataset is left partially rewritten.

use crate::dataset::{Dataset, Expression, Gazette, Intent, Token};
use crate::error::RunResult;
use crate::mt::MachineTranslator;
use crate::platform::PlatformApi;
use crate::reconcile::{build_candidate_index, reconcile_expression, ExpressionRef};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, warn};

/// Number of texts sent to the translation backend per request
pub const DEFAULT_BATCH_SIZE: usize = 10;

/// Counters reported at the end of a run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub intents: usize,
    pub expressions_translated: usize,
    /// Expressions whose translation came back empty
    pub expressions_skipped: usize,
    pub synonym_groups_uploaded: usize,
    pub token_updates: usize,
    /// Free/restricted entities annotated in the dataset without a gazette
    pub dangling_entities: Vec<String>,
}

pub struct DatasetTranslation {
    translator: Box<dyn MachineTranslator>,
    platform: Arc<dyn PlatformApi>,
    batch_size: usize,
}

impl DatasetTranslation {
    pub fn new(translator: Box<dyn MachineTranslator>, platform: Arc<dyn PlatformApi>) -> Self {
        Self {
            translator,
            platform,
            batch_size: DEFAULT_BATCH_SIZE,
        }
    }

    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size;
        self
    }

    fn target_language(&self) -> &str {
        &self.translator.language_pair().target
    }

    /// Translate `dataset` in place and import it into the platform
    pub async fn translate(&self, dataset: &mut Dataset) -> RunResult<RunSummary> {
        let start = Instant::now();
        let mut summary = RunSummary::default();
        info!(
            languages = %self.translator.language_pair(),
            provider = self.translator.provider_name(),
            intents = dataset.intents.len(),
            expressions = dataset.expression_count(),
            "Starting dataset translation"
        );

        summary.dangling_entities = dataset.dangling_entities();
        if !summary.dangling_entities.is_empty() {
            warn!(
                entities = ?summary.dangling_entities,
                "Annotated entities without a gazette, their tokens get no candidates"
            );
        }

        dataset.language = self.target_language().to_string();

        info!("Translating synonyms");
        summary.synonym_groups_uploaded = self.translate_synonyms(&mut dataset.gazettes).await?;
        debug!("Translated synonyms");

        info!("Translating expressions");
        let total = dataset.expression_count();
        let mut processed = 0;
        for intent in dataset.intents.iter_mut() {
            self.translate_intent(intent, &dataset.gazettes, &mut summary)
                .await?;
            processed += intent.expressions.len();
            summary.intents += 1;
            info!(intent = %intent.name, processed, total, "Intent translated");
        }
        debug!("Translated expressions");

        info!(
            elapsed = ?start.elapsed(),
            translated = summary.expressions_translated,
            skipped = summary.expressions_skipped,
            token_updates = summary.token_updates,
            "Dataset translation finished"
        );
        Ok(summary)
    }

    /// Translate the synonyms of every gazette in place and upload them
    ///
    /// Gazettes without synonyms are left alone. Returns the number of
    /// uploaded synonym lists.
    pub async fn translate_synonyms(&self, gazettes: &mut [Gazette]) -> RunResult<usize> {
        let mut uploaded = 0;
        for gazette in gazettes.iter_mut() {
            if gazette.synonyms.is_empty() {
                continue;
            }
            gazette.synonyms = self
                .translator
                .translate_batch(&gazette.synonyms, self.batch_size)
                .await?;
            self.platform
                .bulk_create_synonyms(&gazette.slug, &gazette.synonyms, self.target_language())
                .await?;
            debug!(entity = %gazette.name, count = gazette.synonyms.len(), "Uploaded synonyms");
            uploaded += 1;
        }
        Ok(uploaded)
    }

    async fn translate_intent(
        &self,
        intent: &mut Intent,
        gazettes: &[Gazette],
        summary: &mut RunSummary,
    ) -> RunResult<()> {
        let sources: Vec<String> = intent
            .expressions
            .iter()
            .map(|expression| expression.source.clone())
            .collect();
        let translations = self
            .translator
            .translate_batch(&sources, self.batch_size)
            .await?;
        for (expression, translation) in intent.expressions.iter_mut().zip(translations) {
            expression.source = translation;
        }

        for expression in intent.expressions.iter_mut() {
            if expression.source.is_empty() {
                warn!(intent = %intent.name, "Empty translation, skipping expression");
                summary.expressions_skipped += 1;
                continue;
            }
            summary.token_updates += self
                .translate_expression(&intent.name, expression, gazettes)
                .await?;
            summary.expressions_translated += 1;
        }
        Ok(())
    }

    /// Create one translated expression on the platform and recover its
    /// entity annotations; `expression.source` already holds the translation
    async fn translate_expression(
        &self,
        intent_name: &str,
        expression: &mut Expression,
        gazettes: &[Gazette],
    ) -> RunResult<usize> {
        let candidates =
            build_candidate_index(&expression.tokens, gazettes, self.translator.as_ref()).await?;

        let created = self
            .platform
            .create_expression(intent_name, &expression.source, self.target_language())
            .await?;
        let output: Vec<Token> = created.tokens.into_iter().map(Token::from).collect();

        let reconciled = reconcile_expression(
            self.platform.as_ref(),
            output,
            &candidates,
            &expression.tokens,
            ExpressionRef {
                intent: intent_name,
                source: &expression.source,
                expression_id: &created.id,
            },
        )
        .await?;

        debug!(
            intent = intent_name,
            compiled = %reconciled.compiled,
            updates = reconciled.updates,
            "Expression translated"
        );
        expression.tokens = reconciled.tokens;
        expression.compiled = Some(reconciled.compiled);
        Ok(reconciled.updates)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::{EntityKind, TokenEntity};
    use crate::error::TranslationRunError;
    use crate::mt::{LanguagePair, MockMode, MockTranslator, PassThroughTranslator};
    use crate::platform::recording::{PlatformCall, RecordingPlatform};
    use crate::platform::PlatformError;

    fn en_fr() -> LanguagePair {
        LanguagePair::new("en", "fr").unwrap()
    }

    fn accessories_dataset() -> Dataset {
        let mut dataset = Dataset::new("en");
        dataset
            .gazettes
            .push(Gazette::new("BOX_OPTION", "box-option", EntityKind::Free));
        dataset.gazettes.push(
            Gazette::new("ACCESSORIES", "accessories", EntityKind::Free).with_synonyms(["CPL"]),
        );

        let mut intent = Intent::new("accessories-information");
        intent.expressions.push(Expression::new(
            "BOXOPTION and socket CPL",
            vec![
                Token::new("BOXOPTION", true, "NOUN")
                    .with_entity(TokenEntity::new("BOX_OPTION", EntityKind::Free)),
                Token::new("and", true, "CCONJ"),
                Token::new("socket", true, "NOUN"),
                Token::new("CPL", false, "NOUN")
                    .with_entity(TokenEntity::new("ACCESSORIES", EntityKind::Free)),
            ],
        ));
        dataset.intents.push(intent);
        dataset
    }

    fn translator() -> MockTranslator {
        MockTranslator::with_mappings(
            en_fr(),
            [
                ("BOXOPTION and socket CPL", "BOXOPTION et prise CPL"),
                ("I want red", "Je veux du rouge"),
                ("red", "rouge"),
                ("crimson", "carmin"),
                ("Hello there", ""),
            ],
        )
    }

    #[tokio::test]
    async fn test_translate_dataset() {
        let platform = Arc::new(RecordingPlatform::new());
        let run = DatasetTranslation::new(Box::new(translator()), platform.clone());
        let mut dataset = accessories_dataset();

        let summary = run.translate(&mut dataset).await.unwrap();

        assert_eq!(dataset.language, "fr");
        let expression = &dataset.intents[0].expressions[0];
        assert_eq!(expression.source, "BOXOPTION et prise CPL");
        assert_eq!(
            expression.compiled.as_deref(),
            Some("BOXOPTION et prise ACCESSORIES")
        );
        assert_eq!(
            expression.tokens[0].entity,
            Some(TokenEntity::new("BOX_OPTION", EntityKind::Free))
        );
        assert_eq!(
            expression.tokens[3].entity,
            Some(TokenEntity::new("ACCESSORIES", EntityKind::Free))
        );
        assert_eq!(expression.tokens[1].entity, None);

        assert_eq!(
            summary,
            RunSummary {
                intents: 1,
                expressions_translated: 1,
                expressions_skipped: 0,
                synonym_groups_uploaded: 1,
                token_updates: 2,
                dangling_entities: Vec::new(),
            }
        );
    }

    #[tokio::test]
    async fn test_calls_are_issued_in_order() {
        let platform = Arc::new(RecordingPlatform::new());
        let run = DatasetTranslation::new(Box::new(translator()), platform.clone());
        let mut dataset = accessories_dataset();
        run.translate(&mut dataset).await.unwrap();

        let calls = platform.calls();
        assert_eq!(calls.len(), 4);
        assert_eq!(
            calls[0],
            PlatformCall::BulkSynonyms {
                entity_slug: "accessories".to_string(),
                synonyms: vec!["CPL".to_string()],
                language: "fr".to_string(),
            }
        );
        assert_eq!(
            calls[1],
            PlatformCall::CreateExpression {
                intent: "accessories-information".to_string(),
                source: "BOXOPTION et prise CPL".to_string(),
                language: "fr".to_string(),
            }
        );
        let positions: Vec<usize> = platform.updates().into_iter().map(|(p, _)| p).collect();
        assert_eq!(positions, vec![0, 3]);
        match &calls[2] {
            PlatformCall::UpdateToken { expression_id, .. } => {
                assert_eq!(expression_id, "expression-2")
            }
            other => panic!("Expected a token update, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_synonyms_translated_before_matching() {
        let platform = Arc::new(RecordingPlatform::new().with_gold("Je", "PRONOUN"));
        let run = DatasetTranslation::new(Box::new(translator()), platform.clone());

        let mut dataset = Dataset::new("en");
        dataset.gazettes.push(
            Gazette::new("COLOR", "color", EntityKind::Restricted)
                .with_synonyms(["red", "crimson"]),
        );
        let mut intent = Intent::new("paint");
        intent.expressions.push(Expression::new(
            "I want red",
            vec![
                Token::new("I", true, "PRON")
                    .with_entity(TokenEntity::new("PRONOUN", EntityKind::Gold)),
                Token::new("want", true, "VERB"),
                Token::new("red", false, "ADJ")
                    .with_entity(TokenEntity::new("COLOR", EntityKind::Restricted)),
            ],
        ));
        dataset.intents.push(intent);

        let summary = run.translate(&mut dataset).await.unwrap();

        assert_eq!(dataset.gazettes[0].synonyms, vec!["rouge", "carmin"]);
        let expression = &dataset.intents[0].expressions[0];
        assert_eq!(expression.compiled.as_deref(), Some("PRONOUN veux du COLOR"));
        assert_eq!(summary.token_updates, 1);
    }

    #[tokio::test]
    async fn test_entity_without_gazette_is_reported() {
        let platform = Arc::new(RecordingPlatform::new());
        let run = DatasetTranslation::new(Box::new(translator()), platform.clone());

        let mut dataset = Dataset::new("en");
        let mut intent = Intent::new("paint");
        intent.expressions.push(Expression::new(
            "I want red",
            vec![
                Token::new("I", true, "PRON"),
                Token::new("want", true, "VERB"),
                Token::new("red", false, "ADJ")
                    .with_entity(TokenEntity::new("COLOR", EntityKind::Restricted)),
            ],
        ));
        dataset.intents.push(intent);

        let summary = run.translate(&mut dataset).await.unwrap();

        assert_eq!(summary.dangling_entities, vec!["COLOR".to_string()]);
        assert_eq!(summary.token_updates, 0);
        assert!(platform.updates().is_empty());
        let expression = &dataset.intents[0].expressions[0];
        assert_eq!(expression.compiled.as_deref(), Some("Je veux du rouge"));
    }

    #[tokio::test]
    async fn test_empty_translation_is_skipped() {
        let platform = Arc::new(RecordingPlatform::new());
        let run = DatasetTranslation::new(Box::new(translator()), platform.clone());

        let mut dataset = Dataset::new("en");
        let mut intent = Intent::new("greetings");
        intent.expressions.push(Expression::new(
            "Hello there",
            vec![
                Token::new("Hello", true, "INTJ"),
                Token::new("there", false, "ADV"),
            ],
        ));
        dataset.intents.push(intent);

        let summary = run.translate(&mut dataset).await.unwrap();

        assert_eq!(summary.expressions_skipped, 1);
        assert_eq!(summary.expressions_translated, 0);
        assert!(platform.calls().is_empty());
        let expression = &dataset.intents[0].expressions[0];
        assert_eq!(expression.source, "");
        assert_eq!(expression.compiled, None);
    }

    #[tokio::test]
    async fn test_expressions_are_batched() {
        let platform = Arc::new(RecordingPlatform::new());
        let translator = Arc::new(MockTranslator::new(en_fr(), MockMode::Uppercase));

        let mut dataset = Dataset::new("en");
        let mut intent = Intent::new("greetings");
        for i in 0..5 {
            intent
                .expressions
                .push(Expression::new(format!("hello {}", i), Vec::new()));
        }
        dataset.intents.push(intent);

        let run = DatasetTranslation::new(Box::new(ArcTranslator(translator.clone())), platform)
            .with_batch_size(2);
        let summary = run.translate(&mut dataset).await.unwrap();

        assert_eq!(summary.expressions_translated, 5);
        assert_eq!(translator.batch_count(), 3);
        assert_eq!(dataset.intents[0].expressions[4].source, "HELLO 4");
        assert_eq!(
            dataset.intents[0].expressions[4].compiled.as_deref(),
            Some("HELLO 4")
        );
    }

    #[tokio::test]
    async fn test_remote_rejection_aborts_run() {
        let platform = Arc::new(
            RecordingPlatform::new().rejecting_creates(400, r#"{"message":"Invalid intent"}"#),
        );
        let run = DatasetTranslation::new(Box::new(PassThroughTranslator::new(en_fr())), platform);
        let mut dataset = accessories_dataset();

        let error = run.translate(&mut dataset).await.unwrap_err();
        match error {
            TranslationRunError::Platform(PlatformError::RemoteRejected { status, body }) => {
                assert_eq!(status, 400);
                assert_eq!(body, r#"{"message":"Invalid intent"}"#);
            }
            other => panic!("Expected a remote rejection, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_translation_failure_aborts_run() {
        let platform = Arc::new(RecordingPlatform::new());
        let translator = MockTranslator::new(en_fr(), MockMode::Error("quota exceeded".into()));
        let run = DatasetTranslation::new(Box::new(translator), platform.clone());
        let mut dataset = accessories_dataset();

        let error = run.translate(&mut dataset).await.unwrap_err();
        assert!(matches!(error, TranslationRunError::Translation(_)));
        assert!(platform.calls().is_empty());
    }

    /// Shares a mock with the test so its counters stay observable
    struct ArcTranslator(Arc<MockTranslator>);

    #[async_trait::async_trait]
    impl MachineTranslator for ArcTranslator {
        async fn translate_batch(
            &self,
            texts: &[String],
            batch_size: usize,
        ) -> crate::mt::MtResult<Vec<String>> {
            self.0.translate_batch(texts, batch_size).await
        }

        fn language_pair(&self) -> &LanguagePair {
            self.0.language_pair()
        }

        fn provider_name(&self) -> &str {
            self.0.provider_name()
        }
    }
}
