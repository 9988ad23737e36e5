//! In-memory platform for tests
//!
//! Tokenizes created expressions on whitespace, tags punctuation-only words as
//! `PUNCT`, annotates words found in its gold lexicon, and records every call.

use crate::dataset::{EntityKind, Token};
use crate::platform::error::{PlatformError, PlatformResult};
use crate::platform::wire::{CreatedExpression, RawEntity, RawToken, RawWord};
use crate::platform::PlatformApi;
use async_trait::async_trait;
use serde_json::Map;
use std::collections::HashMap;
use std::sync::Mutex;

#[derive(Debug, Clone, PartialEq)]
pub enum PlatformCall {
    CreateExpression {
        intent: String,
        source: String,
        language: String,
    },
    UpdateToken {
        position: usize,
        token: Token,
        intent: String,
        source: String,
        expression_id: String,
    },
    BulkSynonyms {
        entity_slug: String,
        synonyms: Vec<String>,
        language: String,
    },
}

#[derive(Debug, Default)]
pub struct RecordingPlatform {
    /// lowercase word → gold entity name
    gold: HashMap<String, String>,
    reject_creates: Option<(u16, String)>,
    calls: Mutex<Vec<PlatformCall>>,
}

impl RecordingPlatform {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_gold(mut self, word: &str, entity: &str) -> Self {
        self.gold.insert(word.to_lowercase(), entity.to_string());
        self
    }

    /// Answer every expression creation with `status` and `body`
    pub fn rejecting_creates(mut self, status: u16, body: &str) -> Self {
        self.reject_creates = Some((status, body.to_string()));
        self
    }

    pub fn calls(&self) -> Vec<PlatformCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn updates(&self) -> Vec<(usize, Token)> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                PlatformCall::UpdateToken {
                    position, token, ..
                } => Some((position, token)),
                _ => None,
            })
            .collect()
    }

    fn record(&self, call: PlatformCall) -> usize {
        let mut calls = self.calls.lock().unwrap();
        calls.push(call);
        calls.len()
    }

    fn tokenize(&self, source: &str) -> Vec<RawToken> {
        let words: Vec<&str> = source.split_whitespace().collect();
        words
            .iter()
            .enumerate()
            .map(|(position, word)| {
                let punctuation = word.chars().all(|c| c.is_ascii_punctuation());
                RawToken {
                    ind: Some(position),
                    space: position + 1 < words.len(),
                    part_of_speech: if punctuation { "PUNCT" } else { "X" }.to_string(),
                    word: RawWord {
                        name: word.to_string(),
                    },
                    entity: self.gold.get(&word.to_lowercase()).map(|name| RawEntity {
                        name: name.clone(),
                        kind: Some(EntityKind::Gold),
                        custom: Some(false),
                        extra: Map::new(),
                    }),
                }
            })
            .collect()
    }
}

#[async_trait]
impl PlatformApi for RecordingPlatform {
    async fn fetch_entities(&self) -> PlatformResult<Vec<RawEntity>> {
        Ok(Vec::new())
    }

    async fn create_expression(
        &self,
        intent: &str,
        source: &str,
        language: &str,
    ) -> PlatformResult<CreatedExpression> {
        let count = self.record(PlatformCall::CreateExpression {
            intent: intent.to_string(),
            source: source.to_string(),
            language: language.to_string(),
        });
        if let Some((status, body)) = &self.reject_creates {
            return Err(PlatformError::RemoteRejected {
                status: *status,
                body: body.clone(),
            });
        }
        Ok(CreatedExpression {
            id: format!("expression-{}", count),
            tokens: self.tokenize(source),
        })
    }

    async fn update_expression_token(
        &self,
        position: usize,
        token: &Token,
        intent: &str,
        source: &str,
        expression_id: &str,
    ) -> PlatformResult<()> {
        self.record(PlatformCall::UpdateToken {
            position,
            token: token.clone(),
            intent: intent.to_string(),
            source: source.to_string(),
            expression_id: expression_id.to_string(),
        });
        Ok(())
    }

    async fn bulk_create_synonyms(
        &self,
        entity_slug: &str,
        synonyms: &[String],
        language: &str,
    ) -> PlatformResult<()> {
        self.record(PlatformCall::BulkSynonyms {
            entity_slug: entity_slug.to_string(),
            synonyms: synonyms.to_vec(),
            language: language.to_string(),
        });
        Ok(())
    }
}
