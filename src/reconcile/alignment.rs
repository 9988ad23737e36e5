//! Token reconciliation
//!
//! After a translated expression is created, the platform re-tokenizes it in
//! the target language. Gold entities (numbers, pronouns, ...) come back
//! annotated, but free and restricted entities do not: their translated words
//! are unknown to the platform. This module walks the new tokens and restores
//! those annotations from the original expression, using the
//! [`CandidateIndex`] to recognize translated entity words.
//!
//! The alignment is heuristic. It does not look at positions: a new token is
//! attributed to the lowest original index whose candidates contain its word.

use crate::dataset::Token;
use crate::platform::{PlatformApi, PlatformResult};
use crate::reconcile::candidates::CandidateIndex;
use tracing::debug;

/// The expression on the platform that token updates are sent to
#[derive(Debug, Clone, Copy)]
pub struct ExpressionRef<'a> {
    pub intent: &'a str,
    /// Translated source text
    pub source: &'a str,
    pub expression_id: &'a str,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alignment {
    pub tokens: Vec<Token>,
    /// Positions whose free/restricted annotation was restored
    pub resolved: Vec<usize>,
}

impl Alignment {
    pub fn update_count(&self) -> usize {
        self.resolved.len()
    }
}

/// Reconcile the platform's tokens of a translated expression with the
/// annotations of the original tokens
///
/// For each output token, in order:
/// 1. its word matches a candidate: the matched original token replaces it,
///    with the output word, and is pushed to the platform at that position;
/// 2. otherwise: kept as the platform returned it, annotation included.
///
/// Only restored positions and gold annotations count as entities when the
/// expression is compiled; see [`crate::reconcile::compile_expression`].
pub async fn reconcile_tokens(
    platform: &dyn PlatformApi,
    output: Vec<Token>,
    candidates: &CandidateIndex,
    original: &[Token],
    expression: ExpressionRef<'_>,
) -> PlatformResult<Alignment> {
    let mut tokens = Vec::with_capacity(output.len());
    let mut resolved = Vec::new();

    for (position, token) in output.into_iter().enumerate() {
        let matched = candidates
            .first_match(&token.word)
            .and_then(|index| original.get(index).map(|source| (index, source)));

        if let Some((index, source)) = matched {
            let mut restored = source.clone();
            restored.word = token.word;
            debug!(
                position,
                original = index,
                word = %restored.word,
                "Restoring entity annotation"
            );
            platform
                .update_expression_token(
                    position,
                    &restored,
                    expression.intent,
                    expression.source,
                    expression.expression_id,
                )
                .await?;
            tokens.push(restored);
            resolved.push(position);
        } else {
            tokens.push(token);
        }
    }

    Ok(Alignment { tokens, resolved })
}
