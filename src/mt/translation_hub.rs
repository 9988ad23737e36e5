//! Hosted document-translation service provider
//!
//! This module drives the translation hub's document API: a batch of texts is
//! uploaded as one plain-text document, lines separated by
//! [`TranslationHubProvider::SEPARATOR`], and the translated document is split
//! back on the same separator.
//!
//! # Authentication
//!
//! The provider uses OAuth client credentials. The client id and secret are
//! passed explicitly or read from the `TRANSLATION_HUB_CLIENT_ID` and
//! `TRANSLATION_HUB_CLIENT_SECRET` environment variables. The access token is
//! fetched once, right before the first translation request.
//!
//! # Example
//!
//! ```ignore
//! use dataset_translation::mt::{LanguagePair, MachineTranslator, TranslationHubProvider};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let pair = LanguagePair::new("en", "fr")?;
//!     let provider = TranslationHubProvider::from_env(pair)?;
//!
//!     let texts = vec!["Hello".to_string(), "Goodbye".to_string()];
//!     let results = provider.translate_batch(&texts, 10).await?;
//!     println!("{:?}", results);
//!
//!     Ok(())
//! }
//! ```

use crate::mt::error::{MtError, MtResult};
use crate::mt::translator::{LanguagePair, MachineTranslator, check_batch_size};
use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use tokio::sync::OnceCell;
use tracing::debug;
use unicode_normalization::UnicodeNormalization;

/// Language pairs the service translates between
pub const SUPPORTED_PAIRS: &[(&str, &str)] = &[
    ("en", "fr"),
    ("en", "es"),
    ("en", "de"),
    ("fr", "en"),
    ("de", "en"),
    ("de", "fr"),
    ("de", "es"),
    ("es", "en"),
];

/// Whether the service supports translating from `source` to `target`
pub fn is_supported(source: &str, target: &str) -> bool {
    SUPPORTED_PAIRS
        .iter()
        .any(|&(s, t)| s == source && t == target)
}

/// Service-specific language code for an ISO 639-1 code
pub fn service_code(language: &str) -> Option<&'static str> {
    match language {
        "fr" => Some("fr-FR"),
        "en" => Some("en-US"),
        "es" => Some("es-ES"),
        "de" => Some("de-DE"),
        _ => None,
    }
}

/// OAuth client credentials of a translation hub account
#[derive(Clone)]
pub struct HubCredentials {
    pub client_id: String,
    pub client_secret: String,
}

impl HubCredentials {
    pub fn new(client_id: impl Into<String>, client_secret: impl Into<String>) -> Self {
        Self {
            client_id: client_id.into(),
            client_secret: client_secret.into(),
        }
    }

    /// Read credentials from `TRANSLATION_HUB_CLIENT_ID` / `TRANSLATION_HUB_CLIENT_SECRET`
    pub fn from_env() -> MtResult<Self> {
        let read = |name: &str| {
            std::env::var(name).map_err(|_| {
                MtError::ConfigError(format!("{} environment variable not set", name))
            })
        };
        Ok(Self::new(
            read("TRANSLATION_HUB_CLIENT_ID")?,
            read("TRANSLATION_HUB_CLIENT_SECRET")?,
        ))
    }
}

impl std::fmt::Debug for HubCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HubCredentials")
            .field("client_id", &self.client_id)
            .field("client_secret", &"***")
            .finish()
    }
}

/// Service endpoints, overridable for staging deployments
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HubEndpoints {
    pub translate_url: String,
    pub token_url: String,
}

impl Default for HubEndpoints {
    fn default() -> Self {
        Self {
            translate_url:
                "https://document-translation.cfapps.sap.hana.ondemand.com/api/v1/translation"
                    .to_string(),
            token_url: "https://translation.authentication.sap.hana.ondemand.com/oauth/token"
                .to_string(),
        }
    }
}

/// Translation hub provider
///
/// Bound to one supported language pair; translates batches sequentially.
pub struct TranslationHubProvider {
    pair: LanguagePair,
    source_code: &'static str,
    target_code: &'static str,
    credentials: HubCredentials,
    endpoints: HubEndpoints,
    client: reqwest::Client,
    token: OnceCell<String>,
}

impl TranslationHubProvider {
    /// Separator between texts inside one uploaded document
    pub const SEPARATOR: &'static str = " \n ";

    /// Create a provider for `pair`
    ///
    /// No request is made here: an unsupported pair or empty credentials are
    /// reported before anything touches the network.
    ///
    /// # Errors
    ///
    /// * `MtError::ConfigError` - If the pair is not supported or a credential is empty
    /// * `MtError::NetworkError` - If the HTTP client cannot be built
    pub fn new(pair: LanguagePair, credentials: HubCredentials) -> MtResult<Self> {
        if !is_supported(&pair.source, &pair.target) {
            return Err(MtError::ConfigError(format!(
                "Translation not supported: {}",
                pair
            )));
        }
        let codes = (service_code(&pair.source), service_code(&pair.target));
        let (source_code, target_code) = match codes {
            (Some(source), Some(target)) => (source, target),
            _ => {
                return Err(MtError::ConfigError(format!(
                    "No service language code for {}",
                    pair
                )));
            }
        };
        if credentials.client_id.trim().is_empty() || credentials.client_secret.trim().is_empty() {
            return Err(MtError::ConfigError(
                "Translation hub client id and secret cannot be empty".to_string(),
            ));
        }

        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(60))
            .build()
            .map_err(|e| MtError::NetworkError(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            pair,
            source_code,
            target_code,
            credentials,
            endpoints: HubEndpoints::default(),
            client,
            token: OnceCell::new(),
        })
    }

    /// Create a provider with credentials from the environment
    pub fn from_env(pair: LanguagePair) -> MtResult<Self> {
        if !is_supported(&pair.source, &pair.target) {
            return Err(MtError::ConfigError(format!(
                "Translation not supported: {}",
                pair
            )));
        }
        Self::new(pair, HubCredentials::from_env()?)
    }

    pub fn with_endpoints(mut self, endpoints: HubEndpoints) -> Self {
        self.endpoints = endpoints;
        self
    }

    /// Document translation URL for this provider's language pair
    fn translate_url(&self) -> String {
        format!(
            "{}?sourceLanguage={}&targetLanguage={}",
            self.endpoints.translate_url, self.source_code, self.target_code
        )
    }

    async fn access_token(&self) -> MtResult<&str> {
        self.token
            .get_or_try_init(|| self.login())
            .await
            .map(String::as_str)
    }

    async fn login(&self) -> MtResult<String> {
        debug!(url = %self.endpoints.token_url, "Requesting translation hub access token");
        let response = self
            .client
            .post(&self.endpoints.token_url)
            .basic_auth(
                &self.credentials.client_id,
                Some(&self.credentials.client_secret),
            )
            .form(&[("grant_type", "client_credentials")])
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(MtError::ConfigError(format!(
                "Authentication failed ({}): {}",
                status, error_text
            )));
        }

        let json: serde_json::Value = response.json().await.map_err(|e| {
            MtError::TranslationError(format!("Failed to parse token response: {}", e))
        })?;
        json["access_token"]
            .as_str()
            .map(str::to_string)
            .ok_or_else(|| {
                MtError::TranslationError(
                    "Invalid token response: missing 'access_token'".to_string(),
                )
            })
    }

    /// Translate one chunk of texts as a single uploaded document
    async fn translate_chunk(&self, texts: &[String]) -> MtResult<Vec<String>> {
        let token = self.access_token().await?;

        let part = Part::text(texts.join(Self::SEPARATOR))
            .file_name("null")
            .mime_str("text/plain")?;
        let form = Form::new().part("file", part);

        let response = self
            .client
            .post(self.translate_url())
            .bearer_auth(token)
            .multipart(form)
            .send()
            .await?;

        if response.status() != reqwest::StatusCode::OK {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(MtError::TranslationError(error_text));
        }

        let body = response.text().await?;
        split_document(&body, texts.len())
    }
}

/// Split a translated document back into its texts
///
/// The service may return composed or compatibility characters; the text is
/// NFKD-normalized first so the result is stable across responses.
pub fn split_document(document: &str, expected: usize) -> MtResult<Vec<String>> {
    let normalized: String = document.nfkd().collect();
    let texts: Vec<String> = normalized
        .split(TranslationHubProvider::SEPARATOR)
        .map(str::to_string)
        .collect();

    if texts.len() != expected {
        return Err(MtError::TranslationError(format!(
            "Expected {} translations, service returned {}",
            expected,
            texts.len()
        )));
    }
    Ok(texts)
}

impl std::fmt::Debug for TranslationHubProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TranslationHubProvider")
            .field("pair", &self.pair)
            .field("credentials", &self.credentials)
            .field("endpoints", &self.endpoints)
            .finish()
    }
}

#[async_trait]
impl MachineTranslator for TranslationHubProvider {
    async fn translate_batch(
        &self,
        texts: &[String],
        batch_size: usize,
    ) -> MtResult<Vec<String>> {
        check_batch_size(batch_size)?;

        if texts.is_empty() {
            return Ok(Vec::new());
        }

        let mut all_results = Vec::with_capacity(texts.len());
        for chunk in texts.chunks(batch_size) {
            debug!(size = chunk.len(), pair = %self.pair, "Translating batch");
            let chunk_results = self.translate_chunk(chunk).await?;
            all_results.extend(chunk_results);
        }

        Ok(all_results)
    }

    fn language_pair(&self) -> &LanguagePair {
        &self.pair
    }

    fn provider_name(&self) -> &str {
        "translationhub"
    }
}
