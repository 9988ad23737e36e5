//! Token representation exchanged with the platform API
//!
//! The platform's tokens differ from the canonical [`Token`] in shape only:
//!
//! | canonical            | platform                        |
//! |----------------------|---------------------------------|
//! | position in the list | `ind`                           |
//! | `pos`                | `part_of_speech`                |
//! | `word: "x"`          | `word: {"name": "x"}`           |
//! | `entity: null`       | `entity` key absent             |
//! | `entity.is_custom`   | `entity.custom`                 |
//!
//! Conversions in both directions keep every canonical field.

use crate::dataset::{EntityKind, Token, TokenEntity};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawWord {
    pub name: String,
}

/// Entity record as the platform returns it
///
/// Fields other than `name`, `type` and `custom` (ids, slugs, colors, ...)
/// are kept in `extra` so the record can be sent back unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawEntity {
    pub name: String,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<EntityKind>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom: Option<bool>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl RawEntity {
    /// Entity kind, inferred from `custom` when the platform omits `type`
    pub fn kind(&self) -> EntityKind {
        self.kind.unwrap_or(match self.custom {
            Some(true) => EntityKind::Free,
            _ => EntityKind::Gold,
        })
    }
}

impl From<&TokenEntity> for RawEntity {
    fn from(entity: &TokenEntity) -> Self {
        Self {
            name: entity.name.clone(),
            kind: Some(entity.kind),
            custom: Some(entity.is_custom),
            extra: Map::new(),
        }
    }
}

impl From<RawEntity> for TokenEntity {
    fn from(raw: RawEntity) -> Self {
        let kind = raw.kind();
        TokenEntity {
            is_custom: raw.custom.unwrap_or(!kind.is_gold()),
            name: raw.name,
            kind,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawToken {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ind: Option<usize>,
    #[serde(default)]
    pub space: bool,
    pub part_of_speech: String,
    pub word: RawWord,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entity: Option<RawEntity>,
}

impl RawToken {
    /// Platform form of `token` at `position` in its expression
    pub fn from_token(position: usize, token: &Token) -> Self {
        Self {
            ind: Some(position),
            space: token.space,
            part_of_speech: token.pos.clone(),
            word: RawWord {
                name: token.word.clone(),
            },
            entity: token.entity.as_ref().map(RawEntity::from),
        }
    }
}

impl From<RawToken> for Token {
    fn from(raw: RawToken) -> Self {
        Token {
            word: raw.word.name,
            space: raw.space,
            pos: raw.part_of_speech,
            entity: raw.entity.map(TokenEntity::from),
        }
    }
}

/// Expression created on the platform, re-tokenized in the target language
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CreatedExpression {
    #[serde(deserialize_with = "id_string")]
    pub id: String,
    #[serde(default)]
    pub tokens: Vec<RawToken>,
}

/// Accept expression ids given either as strings or as numbers
fn id_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::String(id) => Ok(id),
        Value::Number(id) => Ok(id.to_string()),
        other => Err(serde::de::Error::custom(format!(
            "invalid expression id: {}",
            other
        ))),
    }
}
