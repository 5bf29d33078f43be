//! Provider credentials.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

/// How a set of credentials was obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CredentialType {
    ApiKey,
    #[serde(rename = "oauth2")]
    OAuth2,
    #[default]
    Unauthorized,
}

impl std::fmt::Display for CredentialType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::ApiKey => "api-key",
            Self::OAuth2 => "oauth2",
            Self::Unauthorized => "unauthorized",
        };
        f.write_str(s)
    }
}

/// Read-only credential map handed to every lifecycle and dispatch call.
///
/// Persistence is the host's job; this type is never written anywhere.
#[derive(Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Credentials(HashMap<String, Value>);

impl Credentials {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a credential value.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.0.insert(key.into(), value.into());
        self
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Get a credential as a non-empty string.
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.0
            .get(key)
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &String> {
        self.0.keys()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<HashMap<String, Value>> for Credentials {
    fn from(map: HashMap<String, Value>) -> Self {
        Self(map)
    }
}

impl FromIterator<(String, Value)> for Credentials {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

// Values are secrets; only the key names are printed.
impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut keys: Vec<&String> = self.0.keys().collect();
        keys.sort();
        f.debug_struct("Credentials").field("keys", &keys).finish()
    }
}
