//! Entity annotation recovery for translated expressions
//!
//! Three steps, run once per translated expression:
//!
//! 1. [`build_candidate_index`]: list the words each free/restricted entity
//!    of the original expression may appear as after translation
//! 2. [`reconcile_tokens`]: walk the platform's tokens of the translated
//!    expression and restore the original annotations on matching words
//! 3. [`compile_expression`]: render the reconciled tokens with entity names
//!    in place of entity spans

pub mod alignment;
pub mod candidates;
pub mod compile;

pub use alignment::{reconcile_tokens, Alignment, ExpressionRef};
pub use candidates::{build_candidate_index, candidates_for, flatten, CandidateIndex, Nested};
pub use compile::{add_entity_name, compile_expression, strip_punctuation};

use crate::dataset::Token;
use crate::platform::{PlatformApi, PlatformResult};

/// Tokens and compiled form of a translated expression
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReconciledExpression {
    pub tokens: Vec<Token>,
    pub compiled: String,
    /// Number of token updates pushed to the platform
    pub updates: usize,
}

/// Reconcile the platform's tokens of a translated expression, then compile
/// the result
pub async fn reconcile_expression(
    platform: &dyn PlatformApi,
    output: Vec<Token>,
    candidates: &CandidateIndex,
    original: &[Token],
    expression: ExpressionRef<'_>,
) -> PlatformResult<ReconciledExpression> {
    let alignment = reconcile_tokens(platform, output, candidates, original, expression).await?;
    let compiled = compile_expression(&alignment.tokens, &alignment.resolved);
    let updates = alignment.update_count();
    Ok(ReconciledExpression {
        tokens: alignment.tokens,
        compiled,
        updates,
    })
}
