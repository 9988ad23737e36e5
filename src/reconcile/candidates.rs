//! Candidate surface forms for free and restricted entities
//!
//! A free or restricted entity rarely keeps its surface form across
//! translation. For every such token of the original expression this module
//! lists the lowercase words the translated sentence may use for it: the
//! entity's synonyms in the target language, plus the machine translation of
//! the original word itself.

use crate::dataset::{Gazette, Token};
use crate::mt::{MachineTranslator, MtResult};
use std::collections::BTreeMap;
use tracing::{debug, warn};

/// Either a single value or a list of values, flattened by [`flatten`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Nested<T> {
    Item(T),
    List(Vec<T>),
}

/// Flatten one level of nesting, keeping order
///
/// `[1, [2, 3], 4]` → `[1, 2, 3, 4]`
pub fn flatten<T>(items: Vec<Nested<T>>) -> Vec<T> {
    let mut flat = Vec::with_capacity(items.len());
    for item in items {
        match item {
            Nested::Item(value) => flat.push(value),
            Nested::List(values) => flat.extend(values),
        }
    }
    flat
}

/// Candidate words for one entity occurrence
///
/// `translated` is the lowercase translation of the original word. With no
/// synonyms it is the only candidate; otherwise the synonyms are the
/// candidates and `translated` is appended when it is not one of them.
pub fn candidates_for(translated: &str, synonyms: &[String]) -> Vec<String> {
    let mut nested = Vec::with_capacity(2);
    if synonyms.is_empty() {
        nested.push(Nested::Item(translated.to_string()));
    } else {
        let lowered: Vec<String> = synonyms.iter().map(|s| s.to_lowercase()).collect();
        let listed = lowered.iter().any(|s| s == translated);
        nested.push(Nested::List(lowered));
        if !listed {
            nested.push(Nested::Item(translated.to_string()));
        }
    }
    flatten(nested)
}

/// Original token index → candidate words, for the free/restricted tokens of
/// one expression
///
/// Indices are kept ordered so lookups resolve ties to the lowest index.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CandidateIndex {
    entries: BTreeMap<usize, Vec<String>>,
}

impl CandidateIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, index: usize, candidates: Vec<String>) {
        self.entries.insert(index, candidates);
    }

    pub fn get(&self, index: usize) -> Option<&[String]> {
        self.entries.get(&index).map(Vec::as_slice)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Lowest original index whose candidates contain `word`
    pub fn first_match(&self, word: &str) -> Option<usize> {
        let word = word.to_lowercase();
        self.entries
            .iter()
            .find(|(_, candidates)| candidates.contains(&word))
            .map(|(&index, _)| index)
    }
}

impl FromIterator<(usize, Vec<String>)> for CandidateIndex {
    fn from_iter<I: IntoIterator<Item = (usize, Vec<String>)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

/// Build the candidate index of an expression's original tokens
///
/// Each free/restricted token's word is machine-translated on its own
/// (batch size 1). Tokens whose entity has no gazette are left out.
pub async fn build_candidate_index(
    tokens: &[Token],
    gazettes: &[Gazette],
    translator: &dyn MachineTranslator,
) -> MtResult<CandidateIndex> {
    let mut index = CandidateIndex::new();

    for (position, token) in tokens.iter().enumerate() {
        let Some(entity) = token.non_gold_entity() else {
            continue;
        };
        let Some(gazette) = gazettes.iter().find(|g| g.name == entity.name) else {
            warn!(entity = %entity.name, word = %token.word, "No gazette for entity, skipping");
            continue;
        };

        let translated = translator.translate(&token.word).await?.to_lowercase();
        let candidates = candidates_for(&translated, &gazette.synonyms);
        debug!(position, entity = %entity.name, ?candidates, "Entity candidates");
        index.insert(position, candidates);
    }

    Ok(index)
}
