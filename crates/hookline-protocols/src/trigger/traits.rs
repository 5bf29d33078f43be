//! Trigger traits.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;

use super::{TriggerContext, TriggerProviderDeclaration};
use crate::error::{
    CredentialValidationError, SubscriptionError, TriggerDispatchError, UnsubscribeError,
};
use crate::types::{
    Credentials, EventDispatch, EventOutcome, Parameters, Subscription, UnsubscribeResult,
    WebhookRequest,
};

/// Manages the lifecycle of one upstream webhook registration.
///
/// Never inspects payload content. Calls are not serialized here; the host
/// orders lifecycle calls per logical subscription.
#[async_trait]
pub trait SubscriptionConstructor: Send + Sync {
    /// Validate credentials once, before any other call is allowed.
    async fn validate_credentials(
        &self,
        credentials: &Credentials,
    ) -> Result<(), CredentialValidationError>;

    /// Register a webhook pointing at `endpoint`. Not idempotent.
    async fn create_subscription(
        &self,
        ctx: &TriggerContext,
        endpoint: &str,
        parameters: &Parameters,
    ) -> Result<Subscription, SubscriptionError>;

    /// Extend the lease. Returns a replacement record.
    async fn refresh_subscription(
        &self,
        ctx: &TriggerContext,
        subscription: &Subscription,
    ) -> Result<Subscription, SubscriptionError>;

    /// Best-effort teardown. Upstream failures are reported in the result.
    async fn delete_subscription(
        &self,
        ctx: &TriggerContext,
        subscription: &Subscription,
    ) -> Result<UnsubscribeResult, UnsubscribeError>;
}

/// Turns an inbound webhook request into zero or more event names.
///
/// Never mutates the subscription.
#[async_trait]
pub trait Trigger: Send + Sync {
    async fn dispatch_event(
        &self,
        ctx: &TriggerContext,
        subscription: &Subscription,
        request: &WebhookRequest,
    ) -> Result<EventDispatch, TriggerDispatchError>;
}

/// A single named event that turns a payload into variables.
#[async_trait]
pub trait Event: Send + Sync {
    /// Event name as declared by the provider.
    fn name(&self) -> &str;

    /// Evaluate the event against its configured parameters.
    async fn on_event(
        &self,
        ctx: &TriggerContext,
        request: &WebhookRequest,
        parameters: &Parameters,
        payload: &Value,
    ) -> Result<EventOutcome, TriggerDispatchError>;
}

/// A complete trigger plugin.
pub trait TriggerProvider: Send + Sync {
    fn declaration(&self) -> &TriggerProviderDeclaration;

    fn constructor(&self) -> Arc<dyn SubscriptionConstructor>;

    fn trigger(&self) -> Arc<dyn Trigger>;

    /// Look up an event implementation by name.
    fn event(&self, name: &str) -> Option<Arc<dyn Event>>;

    /// Provider name, taken from the declaration.
    fn name(&self) -> &str {
        &self.declaration().identity.name
    }
}
