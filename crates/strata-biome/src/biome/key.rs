//! Namespaced biome keys (`namespace:path`).

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Namespace of the base game content. Bare paths resolve into it.
pub const BASE_NAMESPACE: &str = "minecraft";

/// Errors produced when parsing a [`BiomeKey`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BiomeKeyError {
    /// The input was empty or only whitespace.
    #[error("biome key is empty")]
    Empty,
    /// The namespace contains characters outside `[a-z0-9_.-]`.
    #[error("invalid namespace in biome key `{0}`")]
    InvalidNamespace(String),
    /// The path is empty or contains characters outside `[a-z0-9_.-/]`.
    #[error("invalid path in biome key `{0}`")]
    InvalidPath(String),
}

/// A validated, namespaced biome identifier such as `minecraft:desert`.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct BiomeKey {
    full: String,
    split: usize,
}

impl BiomeKey {
    /// Parse a key, defaulting the namespace to [`BASE_NAMESPACE`].
    pub fn parse(raw: &str) -> Result<Self, BiomeKeyError> {
        let raw = raw.trim();
        if raw.is_empty() {
            return Err(BiomeKeyError::Empty);
        }
        let (namespace, path) = raw.split_once(':').unwrap_or((BASE_NAMESPACE, raw));

        let ns_ok = !namespace.is_empty()
            && namespace
                .bytes()
                .all(|b| matches!(b, b'a'..=b'z' | b'0'..=b'9' | b'_' | b'.' | b'-'));
        if !ns_ok {
            return Err(BiomeKeyError::InvalidNamespace(raw.to_string()));
        }
        let path_ok = !path.is_empty()
            && path
                .bytes()
                .all(|b| matches!(b, b'a'..=b'z' | b'0'..=b'9' | b'_' | b'.' | b'-' | b'/'));
        if !path_ok {
            return Err(BiomeKeyError::InvalidPath(raw.to_string()));
        }

        Ok(Self {
            full: format!("{namespace}:{path}"),
            split: namespace.len(),
        })
    }

    /// The namespace, e.g. `minecraft`.
    pub fn namespace(&self) -> &str {
        &self.full[..self.split]
    }

    /// The path, e.g. `desert`.
    pub fn path(&self) -> &str {
        &self.full[self.split + 1..]
    }

    /// The full `namespace:path` string.
    pub fn as_str(&self) -> &str {
        &self.full
    }
}

impl fmt::Display for BiomeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.full)
    }
}

impl FromStr for BiomeKey {
    type Err = BiomeKeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for BiomeKey {
    type Error = BiomeKeyError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<BiomeKey> for String {
    fn from(key: BiomeKey) -> Self {
        key.full
    }
}
