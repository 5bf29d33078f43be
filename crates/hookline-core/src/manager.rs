//! Subscription lifecycle against an upstream service.

use async_trait::async_trait;
use serde_json::Value;
use tracing::{Instrument, info, warn};

use hookline_protocols::error::{
    CredentialValidationError, SubscriptionError, UnsubscribeError, UpstreamError,
};
use hookline_protocols::trigger::{
    RegistrationRequest, SubscriptionConstructor, TriggerContext, UpstreamClient,
};
use hookline_protocols::types::{
    Credentials, PROPERTY_EVENTS, PROPERTY_EXTERNAL_ID, PROPERTY_WEBHOOK_SECRET, Parameters,
    Subscription, Timestamp, UnsubscribeResult, now_timestamp,
};

/// Lease granted when the upstream does not report an expiry: 7 days.
pub const DEFAULT_LEASE_SECS: i64 = 7 * 24 * 60 * 60;

/// [`SubscriptionConstructor`] delegating to an [`UpstreamClient`].
///
/// Holds no mutable state. Never looks at payloads.
pub struct SubscriptionManager<U> {
    upstream: U,
    lease_secs: i64,
    required_credentials: Vec<String>,
}

impl<U: UpstreamClient> SubscriptionManager<U> {
    pub fn new(upstream: U) -> Self {
        Self {
            upstream,
            lease_secs: DEFAULT_LEASE_SECS,
            required_credentials: Vec::new(),
        }
    }

    /// Lease used when the upstream grants no expiry.
    pub fn with_lease_secs(mut self, lease_secs: i64) -> Self {
        self.lease_secs = lease_secs;
        self
    }

    /// Credential key that must be present and non-empty.
    pub fn require_credential(mut self, key: impl Into<String>) -> Self {
        self.required_credentials.push(key.into());
        self
    }

    pub fn upstream(&self) -> &U {
        &self.upstream
    }

    pub fn lease_secs(&self) -> i64 {
        self.lease_secs
    }

    async fn create(
        &self,
        ctx: &TriggerContext,
        endpoint: &str,
        parameters: &Parameters,
    ) -> Result<Subscription, SubscriptionError> {
        let events = parse_events(parameters)?;
        let request = RegistrationRequest {
            endpoint: endpoint.to_string(),
            events: events.clone(),
        };

        let registration = self.upstream.register(ctx, &request).await?;
        if registration.id.is_empty() {
            return Err(SubscriptionError::InvalidResponse(
                "registration id is empty".to_string(),
            ));
        }

        let now = now_timestamp();
        let expires_at = match registration.expires_at {
            Some(granted) if granted <= now => {
                return Err(SubscriptionError::InvalidResponse(format!(
                    "granted expiry {granted} is not in the future"
                )));
            }
            Some(granted) => granted,
            None => now + self.lease_secs,
        };

        let mut subscription = Subscription::new(endpoint, expires_at)
            .with_property(PROPERTY_EXTERNAL_ID, registration.id.clone())
            .with_property(PROPERTY_EVENTS, events);
        if let Some(secret) = registration.secret.filter(|s| !s.is_empty()) {
            subscription = subscription.with_property(PROPERTY_WEBHOOK_SECRET, secret);
        }

        info!(external_id = %registration.id, expires_at, "Subscription created");
        Ok(subscription)
    }

    async fn refresh(
        &self,
        ctx: &TriggerContext,
        subscription: &Subscription,
    ) -> Result<Subscription, SubscriptionError> {
        let external_id = subscription.external_id().ok_or_else(|| {
            SubscriptionError::InvalidParameters(format!(
                "subscription has no {PROPERTY_EXTERNAL_ID}"
            ))
        })?;

        let granted = self.upstream.renew(ctx, external_id).await?;
        let now = now_timestamp();
        let candidate = match granted {
            Some(granted) if granted <= now => {
                return Err(SubscriptionError::InvalidResponse(format!(
                    "granted expiry {granted} is not in the future"
                )));
            }
            Some(granted) => granted,
            None => now + self.lease_secs,
        };
        let expires_at = next_expiry(candidate, subscription.expires_at);

        info!(external_id, expires_at, "Subscription refreshed");
        Ok(Subscription {
            endpoint: subscription.endpoint.clone(),
            expires_at,
            properties: subscription.properties.clone(),
        })
    }

    async fn delete(
        &self,
        ctx: &TriggerContext,
        subscription: &Subscription,
    ) -> Result<UnsubscribeResult, UnsubscribeError> {
        let external_id = match subscription.property(PROPERTY_EXTERNAL_ID) {
            None | Some(Value::Null) => {
                return Err(UnsubscribeError::MissingProperty(
                    PROPERTY_EXTERNAL_ID.to_string(),
                ));
            }
            Some(value) => value.as_str().filter(|s| !s.is_empty()).ok_or_else(|| {
                UnsubscribeError::InvalidProperty {
                    key: PROPERTY_EXTERNAL_ID.to_string(),
                    reason: "must be a non-empty string".to_string(),
                }
            })?,
        };

        match self.upstream.unregister(ctx, external_id).await {
            Ok(()) => {
                info!(external_id, "Subscription removed");
                Ok(UnsubscribeResult::ok("Subscription removed."))
            }
            Err(e) if e.is_not_found() => {
                info!(external_id, "Subscription already removed upstream");
                Ok(UnsubscribeResult::ok("Subscription already removed upstream."))
            }
            Err(e) => {
                warn!(external_id, error = %e, "Failed to remove subscription upstream");
                Ok(UnsubscribeResult::failed(format!(
                    "Failed to remove subscription: {e}"
                )))
            }
        }
    }
}

/// Expiry after a refresh, strictly later than `previous`.
fn next_expiry(candidate: Timestamp, previous: Timestamp) -> Timestamp {
    candidate.max(previous.saturating_add(1))
}

fn parse_events(parameters: &Parameters) -> Result<Vec<String>, SubscriptionError> {
    match parameters.get(PROPERTY_EVENTS) {
        None | Some(Value::Null) => Ok(Vec::new()),
        Some(Value::Array(items)) => items
            .iter()
            .map(|item| {
                item.as_str().map(str::to_string).ok_or_else(|| {
                    SubscriptionError::InvalidParameters(format!(
                        "{PROPERTY_EVENTS} must contain only strings, got {item}"
                    ))
                })
            })
            .collect(),
        Some(other) => Err(SubscriptionError::InvalidParameters(format!(
            "{PROPERTY_EVENTS} must be an array, got {other}"
        ))),
    }
}

fn credential_error(error: UpstreamError) -> CredentialValidationError {
    match error {
        UpstreamError::Unauthorized(msg) => CredentialValidationError::Rejected(msg),
        UpstreamError::Status { status, body } if status == 401 || status == 403 => {
            CredentialValidationError::Rejected(format!("HTTP {status}: {body}"))
        }
        other => CredentialValidationError::CheckFailed(other.to_string()),
    }
}

#[async_trait]
impl<U: UpstreamClient> SubscriptionConstructor for SubscriptionManager<U> {
    async fn validate_credentials(
        &self,
        credentials: &Credentials,
    ) -> Result<(), CredentialValidationError> {
        for key in &self.required_credentials {
            if !credentials.contains_key(key) {
                return Err(CredentialValidationError::Missing(key.clone()));
            }
            if credentials.get_str(key).is_none() {
                return Err(CredentialValidationError::Invalid {
                    field: key.clone(),
                    reason: "must be a non-empty string".to_string(),
                });
            }
        }

        self.upstream
            .verify_credentials(credentials)
            .await
            .map_err(credential_error)
    }

    async fn create_subscription(
        &self,
        ctx: &TriggerContext,
        endpoint: &str,
        parameters: &Parameters,
    ) -> Result<Subscription, SubscriptionError> {
        self.create(ctx, endpoint, parameters)
            .instrument(ctx.span("create_subscription"))
            .await
    }

    async fn refresh_subscription(
        &self,
        ctx: &TriggerContext,
        subscription: &Subscription,
    ) -> Result<Subscription, SubscriptionError> {
        self.refresh(ctx, subscription)
            .instrument(ctx.span("refresh_subscription"))
            .await
    }

    async fn delete_subscription(
        &self,
        ctx: &TriggerContext,
        subscription: &Subscription,
    ) -> Result<UnsubscribeResult, UnsubscribeError> {
        self.delete(ctx, subscription)
            .instrument(ctx.span("delete_subscription"))
            .await
    }
}

#[cfg(test)]
#[path = "manager_tests.rs"]
mod tests;
