//! HTTP client for the bot platform's training API
//!
//! All calls are scoped to one bot version's dataset:
//! `{api_base}/users/{user}/bots/{bot}/versions/{version}/dataset`.
//!
//! # Authentication
//!
//! Two credentials are sent with every request: an OAuth bearer token
//! obtained with the bot's client id and secret when the client connects, and
//! the bot owner's developer token in the `X-Token` header.

use crate::dataset::Token;
use crate::platform::error::{PlatformError, PlatformResult};
use crate::platform::wire::{CreatedExpression, RawEntity, RawToken};
use crate::platform::PlatformApi;
use async_trait::async_trait;
use reqwest::{RequestBuilder, Response, StatusCode};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::json;
use tracing::debug;

/// Everything needed to address and authenticate against one bot version
#[derive(Clone)]
pub struct PlatformCredentials {
    pub user_slug: String,
    pub bot_slug: String,
    pub version_slug: String,
    pub developer_token: String,
    pub bot_client_id: String,
    pub bot_client_secret: String,
}

impl std::fmt::Debug for PlatformCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PlatformCredentials")
            .field("user_slug", &self.user_slug)
            .field("bot_slug", &self.bot_slug)
            .field("version_slug", &self.version_slug)
            .field("developer_token", &"***")
            .field("bot_client_id", &self.bot_client_id)
            .field("bot_client_secret", &"***")
            .finish()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlatformEndpoints {
    pub api_base: String,
    pub token_url: String,
}

impl Default for PlatformEndpoints {
    fn default() -> Self {
        Self {
            api_base: "https://api.cai.tools.sap/train/v2".to_string(),
            token_url: "https://sapcai-community.authentication.eu10.hana.ondemand.com/oauth/token"
                .to_string(),
        }
    }
}

/// `{"results": ...}` envelope wrapping every platform response
#[derive(Debug, Deserialize)]
struct Envelope<T> {
    results: T,
}

/// Dataset URL prefix for the bot version named in `credentials`
pub fn dataset_url(api_base: &str, credentials: &PlatformCredentials) -> String {
    format!(
        "{}/users/{}/bots/{}/versions/{}/dataset",
        api_base.trim_end_matches('/'),
        credentials.user_slug,
        credentials.bot_slug,
        credentials.version_slug
    )
}

pub struct PlatformClient {
    client: reqwest::Client,
    url_prefix: String,
    access_token: String,
    developer_token: String,
    /// Entity records of the bot, used to annotate tokens sent back
    entities: Vec<RawEntity>,
}

impl PlatformClient {
    /// Authenticate and load the bot's entity catalog
    pub async fn connect(
        credentials: &PlatformCredentials,
        endpoints: &PlatformEndpoints,
    ) -> PlatformResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .build()
            .map_err(|e| PlatformError::Network(format!("Failed to create HTTP client: {}", e)))?;

        let access_token = fetch_access_token(&client, &endpoints.token_url, credentials).await?;

        let mut platform = Self {
            client,
            url_prefix: dataset_url(&endpoints.api_base, credentials),
            access_token,
            developer_token: credentials.developer_token.clone(),
            entities: Vec::new(),
        };
        platform.entities = platform.fetch_entities().await?;
        debug!(entities = platform.entities.len(), "Loaded platform entity catalog");

        Ok(platform)
    }

    pub fn entities(&self) -> &[RawEntity] {
        &self.entities
    }

    /// Platform form of `token`, carrying the platform's own entity record
    /// when the catalog knows the entity
    pub fn raw_token(&self, position: usize, token: &Token) -> RawToken {
        let mut raw = RawToken::from_token(position, token);
        if let Some(entity) = &token.entity {
            if let Some(record) = self.entities.iter().find(|e| e.name == entity.name) {
                raw.entity = Some(record.clone());
            }
        }
        raw
    }

    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        request
            .bearer_auth(&self.access_token)
            .header("X-Token", format!("Token {}", self.developer_token))
    }
}

async fn fetch_access_token(
    client: &reqwest::Client,
    token_url: &str,
    credentials: &PlatformCredentials,
) -> PlatformResult<String> {
    let response = client
        .post(token_url)
        .form(&[
            ("grant_type", "client_credentials"),
            ("client_id", credentials.bot_client_id.as_str()),
            ("client_secret", credentials.bot_client_secret.as_str()),
        ])
        .send()
        .await?;

    if !response.status().is_success() {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        return Err(PlatformError::Authentication(format!("{}: {}", status, body)));
    }

    let json: serde_json::Value = response.json().await?;
    json["access_token"]
        .as_str()
        .map(str::to_string)
        .ok_or_else(|| PlatformError::Authentication("missing 'access_token' in response".to_string()))
}

/// Pass `response` through when its status is one of `accepted`
async fn check_status(response: Response, accepted: &[StatusCode]) -> PlatformResult<Response> {
    let status = response.status();
    if accepted.contains(&status) {
        return Ok(response);
    }
    let body = response
        .text()
        .await
        .unwrap_or_else(|_| "Unknown error".to_string());
    Err(PlatformError::RemoteRejected {
        status: status.as_u16(),
        body,
    })
}

async fn read_results<T: DeserializeOwned>(response: Response) -> PlatformResult<T> {
    let envelope: Envelope<T> = response
        .json()
        .await
        .map_err(|e| PlatformError::Decode(e.to_string()))?;
    Ok(envelope.results)
}

const OK_OR_CREATED: &[StatusCode] = &[StatusCode::OK, StatusCode::CREATED];

#[async_trait]
impl PlatformApi for PlatformClient {
    async fn fetch_entities(&self) -> PlatformResult<Vec<RawEntity>> {
        let url = format!("{}/entities", self.url_prefix);
        let response = self.authorized(self.client.get(&url)).send().await?;
        let response = check_status(response, &[StatusCode::OK]).await?;
        read_results(response).await
    }

    async fn create_expression(
        &self,
        intent: &str,
        source: &str,
        language: &str,
    ) -> PlatformResult<CreatedExpression> {
        let url = format!("{}/intents/{}/expressions", self.url_prefix, intent);
        let body = json!({
            "source": source,
            "language": {"isocode": language}
        });
        let response = self
            .authorized(self.client.post(&url))
            .json(&body)
            .send()
            .await?;
        let response = check_status(response, OK_OR_CREATED).await?;
        read_results(response).await
    }

    async fn update_expression_token(
        &self,
        position: usize,
        token: &Token,
        intent: &str,
        source: &str,
        expression_id: &str,
    ) -> PlatformResult<()> {
        let url = format!(
            "{}/intents/{}/expressions/{}",
            self.url_prefix, intent, expression_id
        );
        let body = json!({
            "source": source,
            "tokens": [self.raw_token(position, token)]
        });
        let response = self
            .authorized(self.client.put(&url))
            .json(&body)
            .send()
            .await?;
        check_status(response, &[StatusCode::OK]).await?;
        Ok(())
    }

    async fn bulk_create_synonyms(
        &self,
        entity_slug: &str,
        synonyms: &[String],
        language: &str,
    ) -> PlatformResult<()> {
        let url = format!(
            "{}/entities/{}/synonyms/bulk_create",
            self.url_prefix, entity_slug
        );
        let body = json!({ "synonyms": synonym_payload(synonyms, language) });
        let response = self
            .authorized(self.client.post(&url))
            .json(&body)
            .send()
            .await?;
        check_status(response, OK_OR_CREATED).await?;
        Ok(())
    }
}

fn synonym_payload(synonyms: &[String], language: &str) -> Vec<serde_json::Value> {
    synonyms
        .iter()
        .map(|value| json!({"value": value, "language": {"isocode": language}}))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::{EntityKind, TokenEntity};

    fn credentials() -> PlatformCredentials {
        PlatformCredentials {
            user_slug: "user_slug".to_string(),
            bot_slug: "bot_slug".to_string(),
            version_slug: "version_slug".to_string(),
            developer_token: "developer_token".to_string(),
            bot_client_id: "bot_client_id".to_string(),
            bot_client_secret: "bot_client_secret".to_string(),
        }
    }

    fn offline_client(entities: Vec<RawEntity>) -> PlatformClient {
        PlatformClient {
            client: reqwest::Client::new(),
            url_prefix: dataset_url(&PlatformEndpoints::default().api_base, &credentials()),
            access_token: "access_token0".to_string(),
            developer_token: "developer_token".to_string(),
            entities,
        }
    }

    #[test]
    fn test_dataset_url() {
        assert_eq!(
            dataset_url("https://api.cai.tools.sap/train/v2", &credentials()),
            "https://api.cai.tools.sap/train/v2/users/user_slug/bots/bot_slug/versions/version_slug/dataset"
        );
        assert_eq!(
            dataset_url("http://localhost:8080/", &credentials()),
            "http://localhost:8080/users/user_slug/bots/bot_slug/versions/version_slug/dataset"
        );
    }

    #[test]
    fn test_synonym_payload() {
        let payload = synonym_payload(&["synonym0".to_string(), "synonym1".to_string()], "en");
        assert_eq!(
            payload,
            vec![
                json!({"value": "synonym0", "language": {"isocode": "en"}}),
                json!({"value": "synonym1", "language": {"isocode": "en"}}),
            ]
        );
    }

    #[test]
    fn test_raw_token_uses_catalog_record() {
        let catalog: Vec<RawEntity> = serde_json::from_value(json!([
            {"name": "ACCESSORIES", "id": 0, "type": "free"},
            {"name": "BOX_OPTION", "id": 1, "type": "free"}
        ]))
        .unwrap();
        let client = offline_client(catalog);

        let token = Token::new("CPL", false, "NOUN")
            .with_entity(TokenEntity::new("ACCESSORIES", EntityKind::Free));
        assert_eq!(
            serde_json::to_value(client.raw_token(3, &token)).unwrap(),
            json!({
                "ind": 3,
                "space": false,
                "part_of_speech": "NOUN",
                "word": {"name": "CPL"},
                "entity": {"name": "ACCESSORIES", "id": 0, "type": "free"}
            })
        );
    }

    #[test]
    fn test_raw_token_without_catalog_match() {
        let client = offline_client(Vec::new());
        let token = Token::new("rouge", true, "ADJ")
            .with_entity(TokenEntity::new("COLOR", EntityKind::Restricted));
        let raw = client.raw_token(1, &token);
        let entity = raw.entity.unwrap();
        assert_eq!(entity.name, "COLOR");
        assert_eq!(entity.custom, Some(true));
    }

    #[test]
    fn test_credentials_debug_masks_secrets() {
        let debug_str = format!("{:?}", credentials());
        assert!(debug_str.contains("user_slug"));
        assert!(!debug_str.contains("bot_client_secret\""));
        assert!(!debug_str.contains("\"developer_token\""));
    }

    #[tokio::test]
    #[ignore] // Run with: cargo test --ignored
    async fn test_real_platform_connect() {
        let vars = [
            "PLATFORM_USER_SLUG",
            "PLATFORM_BOT_SLUG",
            "PLATFORM_VERSION_SLUG",
            "PLATFORM_DEVELOPER_TOKEN",
            "PLATFORM_BOT_CLIENT_ID",
            "PLATFORM_BOT_CLIENT_SECRET",
        ];
        let Ok(values) = vars
            .iter()
            .map(|v| std::env::var(v))
            .collect::<Result<Vec<_>, _>>()
        else {
            eprintln!("Skipping: PLATFORM_* variables not set");
            return;
        };
        let credentials = PlatformCredentials {
            user_slug: values[0].clone(),
            bot_slug: values[1].clone(),
            version_slug: values[2].clone(),
            developer_token: values[3].clone(),
            bot_client_id: values[4].clone(),
            bot_client_secret: values[5].clone(),
        };
        let client = PlatformClient::connect(&credentials, &PlatformEndpoints::default())
            .await
            .unwrap();
        println!("Entities: {}", client.entities().len());
    }
}
