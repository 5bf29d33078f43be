//! Per-call trigger context.

use crate::types::{CredentialType, Credentials};

/// Context threaded through every lifecycle and dispatch call.
///
/// Carries the credentials explicitly instead of relying on ambient state.
#[derive(Debug, Clone)]
pub struct TriggerContext {
    /// Provider name, used for log correlation.
    pub provider: String,

    /// Credentials validated at provider setup.
    pub credentials: Credentials,

    /// How the credentials were obtained.
    pub credential_type: CredentialType,

    /// Correlation ID for tracing.
    pub correlation_id: String,
}

impl TriggerContext {
    /// Create a new context with a fresh correlation ID.
    pub fn new(
        provider: impl Into<String>,
        credentials: Credentials,
        credential_type: CredentialType,
    ) -> Self {
        Self {
            provider: provider.into(),
            credentials,
            credential_type,
            correlation_id: uuid::Uuid::new_v4().to_string(),
        }
    }

    /// Replace the correlation ID, e.g. with one taken from a request header.
    pub fn with_correlation_id(mut self, id: impl Into<String>) -> Self {
        self.correlation_id = id.into();
        self
    }

    /// A span carrying provider and correlation id.
    pub fn span(&self, operation: &'static str) -> tracing::Span {
        tracing::info_span!(
            "trigger",
            operation,
            provider = %self.provider,
            correlation_id = %self.correlation_id,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_context_new() {
        let ctx = TriggerContext::new(
            "github",
            Credentials::new().with("api_key", "k"),
            CredentialType::ApiKey,
        );
        assert_eq!(ctx.provider, "github");
        assert_eq!(ctx.credential_type, CredentialType::ApiKey);
        assert!(!ctx.correlation_id.is_empty());
    }

    #[test]
    fn test_context_unique_correlation_ids() {
        let a = TriggerContext::new("p", Credentials::new(), CredentialType::Unauthorized);
        let b = TriggerContext::new("p", Credentials::new(), CredentialType::Unauthorized);
        assert_ne!(a.correlation_id, b.correlation_id);
    }

    #[test]
    fn test_with_correlation_id() {
        let ctx = TriggerContext::new("p", Credentials::new(), CredentialType::Unauthorized)
            .with_correlation_id("req-42");
        assert_eq!(ctx.correlation_id, "req-42");
    }
}
