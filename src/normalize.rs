//! Platform export → canonical dataset
//!
//! A platform export is a flat, relational dump: intents, entities, synonyms
//! and expressions in separate lists that reference each other by position
//! (`intent_id`, `entity_id`), with the tokens of every expression stored as
//! a JSON-encoded string. [`normalize`] folds it into the nested
//! [`Dataset`] tree, keeping only synonyms and expressions written in the
//! requested language.

use crate::dataset::{Dataset, EntityKind, Expression, Gazette, Intent, Token, TokenEntity};
use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, info};

#[derive(Debug, Error)]
pub enum NormalizeError {
    #[error("Unknown entity type code {code} for entity '{entity}'")]
    UnknownEntityType { entity: String, code: u8 },
    #[error("Reference to entity #{0} which is not in the export")]
    EntityOutOfRange(usize),
    #[error("Reference to intent #{0} which is not in the export")]
    IntentOutOfRange(usize),
    #[error("Invalid token list for expression '{source_text}': {reason}")]
    InvalidTokens { source_text: String, reason: String },
}

pub type NormalizeResult<T> = Result<T, NormalizeError>;

#[derive(Debug, Clone, Deserialize)]
pub struct ExportDataset {
    #[serde(default)]
    pub intents: Vec<ExportIntent>,
    #[serde(default)]
    pub entities: Vec<ExportEntity>,
    #[serde(default)]
    pub synonyms: Vec<ExportSynonym>,
    #[serde(default)]
    pub expressions: Vec<ExportExpression>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ExportIntent {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub strictness: Option<i64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ExportEntity {
    pub name: String,
    pub slug: String,
    #[serde(default)]
    pub locked: bool,
    #[serde(rename = "type")]
    pub type_code: u8,
    #[serde(default)]
    pub is_open: bool,
    #[serde(default)]
    pub strictness: Option<i64>,
    #[serde(default)]
    pub enrichment_strictness: Option<i64>,
    #[serde(default)]
    pub regex_pattern: Option<String>,
    #[serde(default)]
    pub regex_flags: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ExportSynonym {
    pub entity_id: usize,
    pub value: String,
    pub language: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ExportExpression {
    pub intent_id: usize,
    pub source: String,
    pub language: String,
    /// JSON-encoded list of [`ExportToken`]
    pub tokens: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ExportToken {
    pub word: String,
    #[serde(default)]
    pub space: bool,
    pub pos: String,
    #[serde(default)]
    pub entity_id: Option<usize>,
}

/// Convert a platform export into the canonical dataset for `language`
pub fn normalize(export: &ExportDataset, language: &str) -> NormalizeResult<Dataset> {
    info!("Transforming dataset");

    let mut dataset = Dataset::new(language);
    dataset.intents = fill_intents(&export.intents);
    dataset.gazettes = fill_gazettes(&export.entities, &export.synonyms, language)?;
    fill_expressions(
        &mut dataset.intents,
        &dataset.gazettes,
        &export.expressions,
        language,
    )?;

    debug!(
        intents = dataset.intents.len(),
        gazettes = dataset.gazettes.len(),
        expressions = dataset.expression_count(),
        "Transformed dataset"
    );
    Ok(dataset)
}

fn fill_intents(intents: &[ExportIntent]) -> Vec<Intent> {
    intents
        .iter()
        .map(|intent| Intent {
            name: intent.name.clone(),
            description: intent.description.clone().unwrap_or_default(),
            strictness: intent.strictness,
            expressions: Vec::new(),
        })
        .collect()
}

fn fill_gazettes(
    entities: &[ExportEntity],
    synonyms: &[ExportSynonym],
    language: &str,
) -> NormalizeResult<Vec<Gazette>> {
    let mut gazettes = entities
        .iter()
        .map(|entity| {
            let kind = EntityKind::from_code(entity.type_code).ok_or_else(|| {
                NormalizeError::UnknownEntityType {
                    entity: entity.name.clone(),
                    code: entity.type_code,
                }
            })?;
            Ok(Gazette {
                name: entity.name.clone(),
                slug: entity.slug.clone(),
                locked: entity.locked,
                kind,
                is_open: entity.is_open,
                strictness: entity.strictness,
                enrichment_strictness: entity.enrichment_strictness,
                synonyms: Vec::new(),
                regex_pattern: entity.regex_pattern.clone(),
                regex_flags: entity.regex_flags.clone(),
            })
        })
        .collect::<NormalizeResult<Vec<_>>>()?;

    for synonym in synonyms.iter().filter(|s| s.language == language) {
        gazettes
            .get_mut(synonym.entity_id)
            .ok_or(NormalizeError::EntityOutOfRange(synonym.entity_id))?
            .synonyms
            .push(synonym.value.clone());
    }

    Ok(gazettes)
}

fn fill_expressions(
    intents: &mut [Intent],
    gazettes: &[Gazette],
    expressions: &[ExportExpression],
    language: &str,
) -> NormalizeResult<()> {
    for expression in expressions.iter().filter(|e| e.language == language) {
        let export_tokens: Vec<ExportToken> =
            serde_json::from_str(&expression.tokens).map_err(|e| NormalizeError::InvalidTokens {
                source_text: expression.source.clone(),
                reason: e.to_string(),
            })?;

        let tokens = export_tokens
            .into_iter()
            .map(|token| {
                let entity = match token.entity_id {
                    Some(id) => {
                        let gazette =
                            gazettes.get(id).ok_or(NormalizeError::EntityOutOfRange(id))?;
                        Some(TokenEntity::new(gazette.name.clone(), gazette.kind))
                    }
                    None => None,
                };
                Ok(Token {
                    word: token.word,
                    space: token.space,
                    pos: token.pos,
                    entity,
                })
            })
            .collect::<NormalizeResult<Vec<_>>>()?;

        intents
            .get_mut(expression.intent_id)
            .ok_or(NormalizeError::IntentOutOfRange(expression.intent_id))?
            .expressions
            .push(Expression::new(expression.source.clone(), tokens));
    }
    Ok(())
}
