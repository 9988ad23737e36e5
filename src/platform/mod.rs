//! Bot platform access
//!
//! The translation run talks to the platform through [`PlatformApi`]: it
//! uploads translated synonyms, creates each translated expression (which the
//! platform re-tokenizes in the target language), and pushes corrected entity
//! annotations back token by token. [`PlatformClient`] is the HTTP
//! implementation.

pub mod client;
pub mod error;
#[cfg(test)]
pub(crate) mod recording;
pub mod wire;

pub use client::{PlatformClient, PlatformCredentials, PlatformEndpoints};
pub use error::{PlatformError, PlatformResult};
pub use wire::{CreatedExpression, RawEntity, RawToken, RawWord};

use crate::dataset::Token;
use async_trait::async_trait;

/// Operations the translation run needs from the bot platform
///
/// Every call is a single blocking request/response; a non-success answer is
/// returned as [`PlatformError::RemoteRejected`] and is never retried.
#[async_trait]
pub trait PlatformApi: Send + Sync {
    /// Entity records of the bot
    async fn fetch_entities(&self) -> PlatformResult<Vec<RawEntity>>;

    /// Create an expression in `intent`; the platform answers with its id and
    /// its tokenization of `source` in `language`
    async fn create_expression(
        &self,
        intent: &str,
        source: &str,
        language: &str,
    ) -> PlatformResult<CreatedExpression>;

    /// Replace the token at `position` of an existing expression
    async fn update_expression_token(
        &self,
        position: usize,
        token: &Token,
        intent: &str,
        source: &str,
        expression_id: &str,
    ) -> PlatformResult<()>;

    /// Add `synonyms` in `language` to the entity `entity_slug`
    async fn bulk_create_synonyms(
        &self,
        entity_slug: &str,
        synonyms: &[String],
        language: &str,
    ) -> PlatformResult<()>;
}
