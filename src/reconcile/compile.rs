//! Compiled expressions
//!
//! The compiled form of an expression is its text with every entity span
//! replaced by the entity's name, e.g. `PRONOUN would like information on the
//! MASS Roller`. Punctuation tokens are left out.

use crate::dataset::Token;
use regex::Regex;

/// Remove ASCII punctuation from an entity name (`TEST_1-0/=.0` → `TEST100`)
pub fn strip_punctuation(name: &str) -> String {
    name.chars().filter(|c| !c.is_ascii_punctuation()).collect()
}

/// Append an entity placeholder to `compiled`
///
/// The placeholder is the entity name without punctuation, followed by a
/// space. Repeats of the placeholder separated by single spaces collapse into
/// one, so a multi-token entity span compiles to a single name.
///
/// `add_entity_name("TEST_1-0/=.0", "this is a ")` → `"this is a TEST100 "`
pub fn add_entity_name(entity_name: &str, compiled: &str) -> String {
    let name = strip_punctuation(entity_name);
    if name.is_empty() {
        return compiled.to_string();
    }

    let appended = format!("{}{} ", compiled, name);
    let escaped = regex::escape(&name);
    match Regex::new(&format!(r"\b({escaped})(?: {escaped}\b)+")) {
        Ok(repeats) => repeats.replace_all(&appended, "${1}").into_owned(),
        Err(_) => appended,
    }
}

/// Compile reconciled tokens
///
/// Tokens at a `resolved` position and tokens carrying a gold entity become
/// placeholders. Any other token contributes its word and a space, even when
/// the platform annotated it, unless it is punctuation. Trailing whitespace is
/// trimmed from the result.
pub fn compile_expression(tokens: &[Token], resolved: &[usize]) -> String {
    let mut compiled = String::new();
    for (position, token) in tokens.iter().enumerate() {
        let placeholder = match &token.entity {
            Some(entity) if entity.is_gold() || resolved.contains(&position) => Some(entity),
            _ => None,
        };
        if let Some(entity) = placeholder {
            compiled = add_entity_name(&entity.name, &compiled);
        } else if !token.is_punctuation() {
            compiled.push_str(&token.word);
            compiled.push(' ');
        }
    }
    compiled.truncate(compiled.trim_end().len());
    compiled
}
