//! Classification rules and startup subscriptions.

use std::collections::HashMap;

use hookline_protocols::types::Parameters;
use serde::{Deserialize, Serialize};

/// Match kinds understood by the classifier.
pub const MATCH_KINDS: [&str; 4] = ["prefix", "equals", "contains", "exists"];

/// One `[[rules]]` entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RuleConfig {
    /// Event emitted when the rule matches.
    pub event: String,

    /// Dotted path into the payload.
    #[serde(default = "default_field")]
    pub field: String,

    /// One of [`MATCH_KINDS`].
    #[serde(rename = "match", default = "default_match")]
    pub match_kind: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
}

fn default_field() -> String {
    "type".to_string()
}

fn default_match() -> String {
    "prefix".to_string()
}

/// One `[[subscriptions]]` entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubscriptionConfig {
    pub id: String,

    /// Upstream event types. Empty subscribes to all events.
    #[serde(default)]
    pub events: Vec<String>,

    /// Parameters handed to each event, keyed by event name.
    #[serde(default)]
    pub event_parameters: HashMap<String, Parameters>,
}
