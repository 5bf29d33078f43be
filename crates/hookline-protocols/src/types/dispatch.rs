//! Dispatch results and event outcomes.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{Parameters, WebhookResponse};

/// Result of turning one inbound webhook call into events.
///
/// `events` may be empty; that is a successful dispatch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventDispatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    /// Matched event names, in match order.
    pub events: Vec<String>,
    /// Parsed payload, handed back so the host can pass it to events.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payload: Option<Value>,
    /// Acknowledgment relayed verbatim to the sender.
    pub response: WebhookResponse,
}

impl EventDispatch {
    pub fn new(events: Vec<String>, response: WebhookResponse) -> Self {
        Self {
            user_id: None,
            events,
            payload: None,
            response,
        }
    }

    pub fn with_payload(mut self, payload: Value) -> Self {
        self.payload = Some(payload);
        self
    }

    pub fn with_user_id(mut self, user_id: impl Into<String>) -> Self {
        self.user_id = Some(user_id.into());
        self
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

/// Flat variable map exposed to downstream automation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Variables {
    pub variables: Parameters,
}

impl Variables {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.variables.insert(key.into(), value.into());
        self
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.variables.get(key)
    }

    pub fn len(&self) -> usize {
        self.variables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.variables.is_empty()
    }
}

/// What an event handler decided for one invocation.
///
/// `Ignored` is a deliberate no-op: acknowledge the sender, emit nothing,
/// log nothing above debug.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum EventOutcome {
    Emit(Variables),
    Ignored,
}

impl EventOutcome {
    pub fn is_ignored(&self) -> bool {
        matches!(self, Self::Ignored)
    }

    pub fn variables(&self) -> Option<&Variables> {
        match self {
            Self::Emit(vars) => Some(vars),
            Self::Ignored => None,
        }
    }

    pub fn into_variables(self) -> Option<Variables> {
        match self {
            Self::Emit(vars) => Some(vars),
            Self::Ignored => None,
        }
    }
}
