//! Configuration schema definitions.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

mod schema_provider;
mod schema_rules;

pub use schema_provider::*;
pub use schema_rules::*;

/// Shared default helper used by submodules.
pub(crate) fn default_true() -> bool {
    true
}

/// Root configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub logging: LoggingConfig,

    #[serde(default)]
    pub provider: ProviderConfig,

    #[serde(default)]
    pub upstream: UpstreamConfig,

    #[serde(default)]
    pub refresh: RefreshConfig,

    /// Classification rules. Empty means the provider's built-in rules.
    #[serde(default)]
    pub rules: Vec<RuleConfig>,

    /// Subscriptions created at startup.
    #[serde(default)]
    pub subscriptions: Vec<SubscriptionConfig>,
}

/// Server configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    /// Externally reachable base URL used to build callback endpoints.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub public_url: Option<String>,
}

impl ServerConfig {
    /// Base URL for callback endpoints, without a trailing slash.
    pub fn public_url(&self) -> String {
        match &self.public_url {
            Some(url) => url.trim_end_matches('/').to_string(),
            None => format!("http://{}:{}", self.host, self.port),
        }
    }

    /// Callback endpoint for a subscription id.
    pub fn endpoint_for(&self, subscription_id: &str) -> String {
        format!("{}/triggers/{}", self.public_url(), subscription_id)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            public_url: None,
        }
    }
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8080
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Default filter directive, overridden by `RUST_LOG`.
    #[serde(default = "default_level")]
    pub level: String,

    /// Directory for rolling log files.
    #[serde(default = "default_log_dir")]
    pub dir: String,

    #[serde(default = "default_max_log_files")]
    pub max_log_files: usize,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_level(),
            dir: default_log_dir(),
            max_log_files: default_max_log_files(),
        }
    }
}

fn default_level() -> String {
    "info".to_string()
}

/// Hookline's home directory, `~/.hookline`.
pub fn hookline_dir() -> PathBuf {
    dirs::home_dir()
        .map(|h| h.join(".hookline"))
        .unwrap_or_else(|| PathBuf::from(".hookline"))
}

fn default_log_dir() -> String {
    hookline_dir().join("logs").to_string_lossy().into_owned()
}

fn default_max_log_files() -> usize {
    7
}

#[cfg(test)]
#[path = "schema_tests.rs"]
mod tests;
