//! JSON collaborator interfaces
//!
//! The token core never picks a JSON layer on its own: encoding takes a
//! [`JsonOut`] and decoding takes a [`JsonIn`]. Closures work directly, and
//! [`SerdeJson`] adapts `serde_json` for callers without a preference.

use crate::error::{JwtError, JwtResult};
use std::fmt::Display;

/// Insertion-ordered claim/header storage
pub type JsonMap = serde_json::Map<String, serde_json::Value>;

/// Serialize a map to JSON text
pub trait JsonOut {
    /// Render `map` as JSON text
    ///
    /// # Errors
    /// Returns `JwtError::Serialization` if the map cannot be rendered
    fn to_json(&self, map: &JsonMap) -> JwtResult<String>;
}

/// Deserialize JSON text into a map
pub trait JsonIn {
    /// Parse `text` as a JSON object
    ///
    /// # Errors
    /// Returns `JwtError::Serialization` if the text is not a JSON object
    fn parse_json(&self, text: &str) -> JwtResult<JsonMap>;
}

impl<F, E> JsonOut for F
where
    F: Fn(&JsonMap) -> Result<String, E>,
    E: Display,
{
    fn to_json(&self, map: &JsonMap) -> JwtResult<String> {
        self(map).map_err(|e| JwtError::Serialization(e.to_string()))
    }
}

impl<F, E> JsonIn for F
where
    F: Fn(&str) -> Result<JsonMap, E>,
    E: Display,
{
    fn parse_json(&self, text: &str) -> JwtResult<JsonMap> {
        self(text).map_err(|e| JwtError::Serialization(e.to_string()))
    }
}

/// `serde_json` backed collaborator
#[derive(Debug, Clone, Copy, Default)]
pub struct SerdeJson;

impl JsonOut for SerdeJson {
    fn to_json(&self, map: &JsonMap) -> JwtResult<String> {
        serde_json::to_string(map).map_err(|e| JwtError::Serialization(e.to_string()))
    }
}

impl JsonIn for SerdeJson {
    fn parse_json(&self, text: &str) -> JwtResult<JsonMap> {
        serde_json::from_str(text).map_err(|e| JwtError::Serialization(e.to_string()))
    }
}
