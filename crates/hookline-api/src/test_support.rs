//! In-memory provider used by the handler and refresher tests.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use async_trait::async_trait;

use hookline_core::{
    EventClassifier, EventDispatcher, EventRule, Matcher, SampleFilterEvent, TriggerRegistry,
};
use hookline_protocols::error::{CredentialValidationError, SubscriptionError, UnsubscribeError};
use hookline_protocols::trigger::{
    Event, EventDeclaration, ProviderIdentity, SubscriptionConstructor, Trigger, TriggerContext,
    TriggerProvider, TriggerProviderDeclaration,
};
use hookline_protocols::types::{
    CredentialType, Credentials, PROPERTY_EVENTS, PROPERTY_EXTERNAL_ID, Parameters, Subscription,
    UnsubscribeResult, Version, now_timestamp,
};

use crate::state::{AppState, ProviderCredentials};

pub const PROVIDER: &str = "mock";
pub const EVENT: &str = "mock_event";

#[derive(Default)]
pub struct MockConstructor {
    pub created: AtomicUsize,
    pub refreshed: AtomicUsize,
    pub deleted: AtomicUsize,
    /// Refresh answers as if the upstream dropped the registration.
    pub forget_upstream: AtomicBool,
    pub fail_delete: AtomicBool,
}

#[async_trait]
impl SubscriptionConstructor for MockConstructor {
    async fn validate_credentials(
        &self,
        credentials: &Credentials,
    ) -> Result<(), CredentialValidationError> {
        match credentials.get_str("api_key") {
            Some(_) => Ok(()),
            None => Err(CredentialValidationError::Missing("api_key".to_string())),
        }
    }

    async fn create_subscription(
        &self,
        _ctx: &TriggerContext,
        endpoint: &str,
        parameters: &Parameters,
    ) -> Result<Subscription, SubscriptionError> {
        let n = self.created.fetch_add(1, Ordering::SeqCst) + 1;
        let events = parameters
            .get(PROPERTY_EVENTS)
            .cloned()
            .unwrap_or_else(|| serde_json::json!([]));
        Ok(Subscription::new(endpoint, now_timestamp() + 3600)
            .with_property(PROPERTY_EXTERNAL_ID, format!("ext-{n}"))
            .with_property(PROPERTY_EVENTS, events))
    }

    async fn refresh_subscription(
        &self,
        _ctx: &TriggerContext,
        subscription: &Subscription,
    ) -> Result<Subscription, SubscriptionError> {
        self.refreshed.fetch_add(1, Ordering::SeqCst);
        if self.forget_upstream.swap(false, Ordering::SeqCst) {
            return Err(SubscriptionError::Expired(
                subscription.external_id().unwrap_or_default().to_string(),
            ));
        }
        let mut refreshed = subscription.clone();
        refreshed.expires_at = subscription.expires_at.max(now_timestamp()) + 3600;
        Ok(refreshed)
    }

    async fn delete_subscription(
        &self,
        _ctx: &TriggerContext,
        subscription: &Subscription,
    ) -> Result<UnsubscribeResult, UnsubscribeError> {
        if subscription.external_id().is_none() {
            return Err(UnsubscribeError::MissingProperty(
                PROPERTY_EXTERNAL_ID.to_string(),
            ));
        }
        self.deleted.fetch_add(1, Ordering::SeqCst);
        if self.fail_delete.load(Ordering::SeqCst) {
            return Ok(UnsubscribeResult::failed("upstream unavailable"));
        }
        Ok(UnsubscribeResult::ok("Subscription removed."))
    }
}

pub struct MockProvider {
    declaration: TriggerProviderDeclaration,
    pub constructor: Arc<MockConstructor>,
    trigger: Arc<EventDispatcher>,
}

impl MockProvider {
    pub fn new() -> Self {
        let classifier = EventClassifier::new()
            .with_rule(EventRule::new(EVENT, Matcher::Prefix("my-event-type".into())))
            .with_rule(EventRule::new("unhandled_event", Matcher::Equals("unhandled".into())));
        Self {
            declaration: TriggerProviderDeclaration::new(ProviderIdentity {
                author: "test".to_string(),
                name: PROVIDER.to_string(),
                label: "Mock".to_string(),
                description: String::new(),
                icon: String::new(),
                version: Version::new(0, 1, 0),
            })
            .with_event(EventDeclaration::new(EVENT, "Mock Event")),
            constructor: Arc::new(MockConstructor::default()),
            trigger: Arc::new(EventDispatcher::new(classifier)),
        }
    }
}

impl TriggerProvider for MockProvider {
    fn declaration(&self) -> &TriggerProviderDeclaration {
        &self.declaration
    }

    fn constructor(&self) -> Arc<dyn SubscriptionConstructor> {
        self.constructor.clone()
    }

    fn trigger(&self) -> Arc<dyn Trigger> {
        self.trigger.clone()
    }

    fn event(&self, name: &str) -> Option<Arc<dyn Event>> {
        (name == EVENT).then(|| Arc::new(SampleFilterEvent::new(EVENT, "Hello from Mock!")) as Arc<dyn Event>)
    }
}

/// State with the mock provider registered, plus a handle to its constructor.
pub fn test_state() -> (Arc<AppState>, Arc<MockConstructor>) {
    let provider = Arc::new(MockProvider::new());
    let constructor = provider.constructor.clone();
    let registry = Arc::new(TriggerRegistry::new());
    registry
        .register(provider)
        .expect("mock provider registers");
    let state = AppState::new(registry, "https://hooks.test", PROVIDER).with_credentials(
        PROVIDER,
        ProviderCredentials::new(
            Credentials::new().with("api_key", "k"),
            CredentialType::ApiKey,
        ),
    );
    (Arc::new(state), constructor)
}
