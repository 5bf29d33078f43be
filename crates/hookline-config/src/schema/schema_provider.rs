//! Provider, upstream and lease refresh configuration.

use hookline_protocols::types::{CredentialType, Credentials};
use serde::{Deserialize, Serialize};

use super::default_true;

/// Trigger provider identity and credentials.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    #[serde(default = "default_provider_name")]
    pub name: String,

    #[serde(default = "default_author")]
    pub author: String,

    #[serde(default = "default_credential_type")]
    pub credential_type: CredentialType,

    /// Credential values, usually `${VAR}` references.
    #[serde(default)]
    pub credentials: Credentials,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            name: default_provider_name(),
            author: default_author(),
            credential_type: default_credential_type(),
            credentials: Credentials::default(),
        }
    }
}

fn default_provider_name() -> String {
    "example".to_string()
}

fn default_author() -> String {
    "hookline".to_string()
}

fn default_credential_type() -> CredentialType {
    CredentialType::ApiKey
}

/// Upstream service that owns webhook registrations.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpstreamConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Per-request timeout.
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,

    /// Lease granted when the upstream reports no expiry.
    #[serde(default = "default_lease_seconds")]
    pub lease_seconds: u64,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_seconds: default_timeout_seconds(),
            lease_seconds: default_lease_seconds(),
        }
    }
}

fn default_base_url() -> String {
    "http://127.0.0.1:9000".to_string()
}

fn default_timeout_seconds() -> u64 {
    30
}

fn default_lease_seconds() -> u64 {
    7 * 24 * 60 * 60
}

/// Background lease refresher.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefreshConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,

    #[serde(default = "default_check_interval")]
    pub check_interval_secs: u64,

    /// Refresh once fewer than this many seconds remain on a lease.
    #[serde(default = "default_refresh_before")]
    pub refresh_before_secs: u64,
}

impl Default for RefreshConfig {
    fn default() -> Self {
        Self {
            enabled: default_true(),
            check_interval_secs: default_check_interval(),
            refresh_before_secs: default_refresh_before(),
        }
    }
}

fn default_check_interval() -> u64 {
    60
}

fn default_refresh_before() -> u64 {
    3600
}
