//! Application state.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

use hookline_core::TriggerRegistry;
use hookline_protocols::trigger::TriggerContext;
use hookline_protocols::types::{CredentialType, Credentials, Parameters};

use crate::store::SubscriptionStore;

const EVENT_CHANNEL_CAPACITY: usize = 256;

/// Credentials the host holds for one provider.
#[derive(Debug, Clone, Default)]
pub struct ProviderCredentials {
    pub credentials: Credentials,
    pub credential_type: CredentialType,
}

impl ProviderCredentials {
    pub fn new(credentials: Credentials, credential_type: CredentialType) -> Self {
        Self {
            credentials,
            credential_type,
        }
    }
}

/// An event produced by an inbound webhook.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmittedEvent {
    pub subscription_id: String,
    pub provider: String,
    pub event: String,
    pub variables: Parameters,
    pub received_at: DateTime<Utc>,
}

/// Application state shared across handlers.
pub struct AppState {
    pub registry: Arc<TriggerRegistry>,
    pub store: Arc<SubscriptionStore>,
    /// Base URL for callback endpoints, without a trailing slash.
    pub public_url: String,
    /// Provider used when a request names none.
    pub default_provider: String,
    credentials: HashMap<String, ProviderCredentials>,
    events_tx: broadcast::Sender<EmittedEvent>,
    start_time: Instant,
}

impl AppState {
    pub fn new(
        registry: Arc<TriggerRegistry>,
        public_url: impl Into<String>,
        default_provider: impl Into<String>,
    ) -> Self {
        let (events_tx, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Self {
            registry,
            store: Arc::new(SubscriptionStore::new()),
            public_url: public_url.into().trim_end_matches('/').to_string(),
            default_provider: default_provider.into(),
            credentials: HashMap::new(),
            events_tx,
            start_time: Instant::now(),
        }
    }

    pub fn with_store(mut self, store: Arc<SubscriptionStore>) -> Self {
        self.store = store;
        self
    }

    pub fn with_credentials(
        mut self,
        provider: impl Into<String>,
        credentials: ProviderCredentials,
    ) -> Self {
        self.credentials.insert(provider.into(), credentials);
        self
    }

    /// Fresh per-call context for `provider`.
    pub fn context(&self, provider: &str) -> TriggerContext {
        let creds = self.credentials.get(provider).cloned().unwrap_or_default();
        TriggerContext::new(provider, creds.credentials, creds.credential_type)
    }

    /// Callback endpoint for a subscription id.
    pub fn endpoint_for(&self, id: &str) -> String {
        format!("{}/triggers/{}", self.public_url, id)
    }

    /// Receive events emitted from now on.
    pub fn subscribe_events(&self) -> broadcast::Receiver<EmittedEvent> {
        self.events_tx.subscribe()
    }

    /// Publish an event. Returns the number of receivers reached.
    pub fn publish(&self, event: EmittedEvent) -> usize {
        self.events_tx.send(event).unwrap_or(0)
    }

    pub fn uptime(&self) -> std::time::Duration {
        self.start_time.elapsed()
    }
}
