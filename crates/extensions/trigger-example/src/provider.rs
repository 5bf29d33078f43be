//! Example trigger provider.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use hookline_core::{
    DEFAULT_LEASE_SECS, EventClassifier, EventDispatcher, EventRule, Matcher, SampleFilterEvent,
    SubscriptionManager,
};
use hookline_protocols::error::UpstreamError;
use hookline_protocols::trigger::{
    Event, EventDeclaration, ParameterDeclaration, ParameterType, ProviderIdentity,
    SubscriptionConstructor, Trigger, TriggerProvider, TriggerProviderDeclaration,
};
use hookline_protocols::types::Version;
use serde_json::json;

use crate::upstream::{API_KEY, HttpUpstream};

/// Payload `type` prefix matched by the built-in rule.
pub const EVENT_TYPE_PREFIX: &str = "my-event-type";

/// Settings for [`ExampleTriggerProvider`].
#[derive(Debug, Clone)]
pub struct ExampleSettings {
    pub name: String,
    pub author: String,
    pub base_url: String,
    pub timeout: Duration,
    pub lease_secs: i64,
    /// Classification rules. Empty installs the built-in prefix rule.
    pub rules: Vec<EventRule>,
}

impl ExampleSettings {
    pub fn new(name: impl Into<String>, base_url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            author: "hookline".to_string(),
            base_url: base_url.into(),
            timeout: Duration::from_secs(30),
            lease_secs: DEFAULT_LEASE_SECS,
            rules: Vec::new(),
        }
    }

    pub fn with_author(mut self, author: impl Into<String>) -> Self {
        self.author = author.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_lease_secs(mut self, lease_secs: i64) -> Self {
        self.lease_secs = lease_secs;
        self
    }

    pub fn with_rules(mut self, rules: Vec<EventRule>) -> Self {
        self.rules = rules;
        self
    }

    /// Name of the single built-in event.
    pub fn default_event(&self) -> String {
        format!("{}_event", self.name)
    }
}

/// `my_provider-x` becomes `MyProviderX`.
pub fn camel_name(name: &str) -> String {
    name.split(['_', '-'])
        .filter(|part| !part.is_empty())
        .map(|part| {
            let mut chars = part.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect()
}

/// Template trigger provider backed by [`HttpUpstream`].
pub struct ExampleTriggerProvider {
    declaration: TriggerProviderDeclaration,
    constructor: Arc<SubscriptionManager<HttpUpstream>>,
    trigger: Arc<EventDispatcher>,
    events: HashMap<String, Arc<dyn Event>>,
}

impl ExampleTriggerProvider {
    pub fn new(settings: ExampleSettings) -> Result<Self, UpstreamError> {
        let upstream = HttpUpstream::new(&settings.base_url, settings.timeout)?;
        let constructor = SubscriptionManager::new(upstream)
            .with_lease_secs(settings.lease_secs)
            .require_credential(API_KEY);

        let rules = if settings.rules.is_empty() {
            vec![EventRule::new(
                settings.default_event(),
                Matcher::Prefix(EVENT_TYPE_PREFIX.to_string()),
            )]
        } else {
            settings.rules.clone()
        };
        let classifier: EventClassifier = rules.into_iter().collect();

        let label = camel_name(&settings.name);
        let greeting = format!("Hello from {label}!");

        let mut declaration = TriggerProviderDeclaration::new(ProviderIdentity {
            author: settings.author.clone(),
            name: settings.name.clone(),
            label: label.clone(),
            description: format!("{label} webhook trigger"),
            icon: String::new(),
            version: Version::new(0, 1, 0),
        })
        .with_subscription_parameter(
            ParameterDeclaration::new("events", ParameterType::Array)
                .with_default(json!([]))
                .with_description("Upstream event types to receive. Empty receives all."),
        );

        let mut events: HashMap<String, Arc<dyn Event>> = HashMap::new();
        for rule in classifier.rules() {
            if events.contains_key(&rule.event) {
                continue;
            }
            declaration = declaration.with_event(event_declaration(&rule.event));
            events.insert(
                rule.event.clone(),
                Arc::new(SampleFilterEvent::new(rule.event.clone(), greeting.clone())),
            );
        }

        Ok(Self {
            declaration,
            constructor: Arc::new(constructor),
            trigger: Arc::new(EventDispatcher::new(classifier)),
            events,
        })
    }
}

fn event_declaration(name: &str) -> EventDeclaration {
    EventDeclaration::new(name, camel_name(name))
        .with_description("Emits the raw webhook payload")
        .with_parameter(
            ParameterDeclaration::new("sample_filter", ParameterType::String)
                .with_description("Only emit when the payload contains this text"),
        )
        .with_output_schema(json!({
            "type": "object",
            "properties": {
                "message": {"type": "string"},
                "raw_event": {"type": "object"}
            }
        }))
}

impl TriggerProvider for ExampleTriggerProvider {
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
        self.events.get(name).cloned()
    }
}

#[cfg(test)]
#[path = "provider_tests.rs"]
mod tests;
