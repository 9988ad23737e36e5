//! Canonical dataset model
//!
//! This is the intermediate JSON schema the translation run works on: a
//! dataset in one language, its intents with their annotated expressions, and
//! one gazette (synonym list) per entity. The whole tree is owned by a single
//! run and rewritten in place as translations come back.
//!
//! Tokens do not carry their own position: a token's position is its index in
//! [`Expression::tokens`].

use serde::{Deserialize, Serialize};

/// Entity category as stored in the canonical dataset (`"gold"`, `"free"`,
/// `"restricted"`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityKind {
    /// Structural entity (numbers, pronouns, ...) detected by the platform in any language
    Gold,
    /// Lexical entity with an open synonym list
    Free,
    /// Lexical entity restricted to its synonym list
    Restricted,
}

impl EntityKind {
    /// Map the numeric type code used by platform exports (0, 1, 2)
    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(EntityKind::Gold),
            1 => Some(EntityKind::Free),
            2 => Some(EntityKind::Restricted),
            _ => None,
        }
    }

    pub fn is_gold(self) -> bool {
        self == EntityKind::Gold
    }

    pub fn as_str(self) -> &'static str {
        match self {
            EntityKind::Gold => "gold",
            EntityKind::Free => "free",
            EntityKind::Restricted => "restricted",
        }
    }
}

/// Entity annotation attached to a token
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenEntity {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: EntityKind,
    /// Always `kind != Gold` for annotations built by this crate
    pub is_custom: bool,
}

impl TokenEntity {
    pub fn new(name: impl Into<String>, kind: EntityKind) -> Self {
        Self {
            name: name.into(),
            kind,
            is_custom: !kind.is_gold(),
        }
    }

    pub fn is_gold(&self) -> bool {
        self.kind.is_gold()
    }
}

/// One token of an expression as produced by the platform's tokenizer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    pub word: String,
    /// Whether whitespace follows this token in the source text
    pub space: bool,
    /// Part-of-speech tag (`NOUN`, `VERB`, `PUNCT`, ...)
    pub pos: String,
    #[serde(default)]
    pub entity: Option<TokenEntity>,
}

impl Token {
    /// Part-of-speech tag the tokenizer assigns to punctuation
    pub const PUNCTUATION_TAG: &'static str = "PUNCT";

    pub fn new(word: impl Into<String>, space: bool, pos: impl Into<String>) -> Self {
        Self {
            word: word.into(),
            space,
            pos: pos.into(),
            entity: None,
        }
    }

    pub fn with_entity(mut self, entity: TokenEntity) -> Self {
        self.entity = Some(entity);
        self
    }

    pub fn is_punctuation(&self) -> bool {
        self.pos == Self::PUNCTUATION_TAG
    }

    pub fn is_gold_entity(&self) -> bool {
        self.entity.as_ref().is_some_and(TokenEntity::is_gold)
    }

    /// Free or restricted entity annotation, if any
    pub fn non_gold_entity(&self) -> Option<&TokenEntity> {
        self.entity.as_ref().filter(|entity| !entity.is_gold())
    }
}

/// Synonym container for one entity in the dataset language
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Gazette {
    pub name: String,
    pub slug: String,
    #[serde(default)]
    pub locked: bool,
    #[serde(rename = "type", default = "Gazette::default_kind")]
    pub kind: EntityKind,
    #[serde(default)]
    pub is_open: bool,
    #[serde(default)]
    pub strictness: Option<i64>,
    #[serde(default)]
    pub enrichment_strictness: Option<i64>,
    #[serde(default)]
    pub synonyms: Vec<String>,
    #[serde(default)]
    pub regex_pattern: Option<String>,
    #[serde(default)]
    pub regex_flags: Option<String>,
}

impl Gazette {
    pub fn new(name: impl Into<String>, slug: impl Into<String>, kind: EntityKind) -> Self {
        Self {
            name: name.into(),
            slug: slug.into(),
            locked: false,
            kind,
            is_open: true,
            strictness: None,
            enrichment_strictness: None,
            synonyms: Vec::new(),
            regex_pattern: None,
            regex_flags: None,
        }
    }

    pub fn with_synonyms<I, S>(mut self, synonyms: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.synonyms = synonyms.into_iter().map(Into::into).collect();
        self
    }

    fn default_kind() -> EntityKind {
        EntityKind::Free
    }
}

/// A training sentence of an intent
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Expression {
    pub source: String,
    #[serde(default)]
    pub tokens: Vec<Token>,
    /// Source text with entity spans replaced by entity names, set once translated
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub compiled: Option<String>,
}

impl Expression {
    pub fn new(source: impl Into<String>, tokens: Vec<Token>) -> Self {
        Self {
            source: source.into(),
            tokens,
            compiled: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Intent {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub strictness: Option<i64>,
    #[serde(default)]
    pub expressions: Vec<Expression>,
}

impl Intent {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
            strictness: None,
            expressions: Vec::new(),
        }
    }
}

/// Root of the canonical schema
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dataset {
    pub language: String,
    #[serde(default)]
    pub intents: Vec<Intent>,
    #[serde(default)]
    pub gazettes: Vec<Gazette>,
}

impl Dataset {
    pub fn new(language: impl Into<String>) -> Self {
        Self {
            language: language.into(),
            intents: Vec::new(),
            gazettes: Vec::new(),
        }
    }

    /// Look up the gazette of an entity by name
    pub fn gazette(&self, entity_name: &str) -> Option<&Gazette> {
        self.gazettes.iter().find(|g| g.name == entity_name)
    }

    pub fn expression_count(&self) -> usize {
        self.intents.iter().map(|i| i.expressions.len()).sum()
    }

    /// Names of free/restricted entities referenced by tokens but missing
    /// from the gazettes
    ///
    /// Gold entities are built into the platform and never have a gazette.
    pub fn dangling_entities(&self) -> Vec<String> {
        let mut missing: Vec<String> = self
            .intents
            .iter()
            .flat_map(|intent| intent.expressions.iter())
            .flat_map(|expression| expression.tokens.iter())
            .filter_map(|token| token.entity.as_ref())
            .filter(|entity| !entity.is_gold() && self.gazette(&entity.name).is_none())
            .map(|entity| entity.name.clone())
            .collect();
        missing.sort();
        missing.dedup();
        missing
    }
}
