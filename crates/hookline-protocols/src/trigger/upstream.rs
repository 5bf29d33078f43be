//! Upstream service client seam.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::TriggerContext;
use crate::error::UpstreamError;
use crate::types::{Credentials, Timestamp};

/// Registration request sent to the upstream service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegistrationRequest {
    /// Callback URL the upstream should invoke.
    pub endpoint: String,
    /// Event types to deliver. Empty means all events.
    pub events: Vec<String>,
}

/// What the upstream granted for a registration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Registration {
    /// Upstream-assigned registration id.
    pub id: String,
    /// Upstream-granted expiry, if the upstream leases registrations.
    #[serde(default)]
    pub expires_at: Option<Timestamp>,
    /// Signing secret for deliveries, if the upstream issues one.
    #[serde(default)]
    pub secret: Option<String>,
}

/// Client for the upstream service that owns webhook registrations.
///
/// Implementations bound every call with a timeout and report it as
/// [`UpstreamError::Timeout`].
#[async_trait]
pub trait UpstreamClient: Send + Sync {
    /// Register a webhook.
    async fn register(
        &self,
        ctx: &TriggerContext,
        request: &RegistrationRequest,
    ) -> Result<Registration, UpstreamError>;

    /// Renew the lease of an existing registration. Returns the new expiry
    /// if the upstream reports one.
    async fn renew(
        &self,
        ctx: &TriggerContext,
        external_id: &str,
    ) -> Result<Option<Timestamp>, UpstreamError>;

    /// Remove a registration.
    async fn unregister(&self, ctx: &TriggerContext, external_id: &str)
        -> Result<(), UpstreamError>;

    /// Check credentials against the upstream. Defaults to accepting them.
    async fn verify_credentials(&self, _credentials: &Credentials) -> Result<(), UpstreamError> {
        Ok(())
    }
}
