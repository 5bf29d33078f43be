//! Payload classification.
//!
//! An [`EventClassifier`] holds an ordered list of rules. Each rule looks up a
//! dotted field path in the payload and, when its matcher accepts the value,
//! contributes its event name.

use serde_json::Value;
use thiserror::Error;

/// Field inspected when a rule does not name one.
pub const DEFAULT_FIELD: &str = "type";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RuleError {
    #[error("Unknown match kind: {0}")]
    UnknownMatch(String),

    #[error("Match kind '{0}' requires a value")]
    MissingValue(String),
}

/// How a rule tests the selected field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Matcher {
    /// String field starts with the value.
    Prefix(String),
    /// Field equals the value. Scalars compare by their text form.
    Equals(String),
    /// String field contains the value, or array field has it as an element.
    Contains(String),
    /// Field is present and not null.
    Exists,
}

impl Matcher {
    /// Build a matcher from its configured kind and value.
    pub fn parse(kind: &str, value: Option<&str>) -> Result<Self, RuleError> {
        let required = || {
            value
                .map(str::to_string)
                .ok_or_else(|| RuleError::MissingValue(kind.to_string()))
        };
        match kind {
            "prefix" => Ok(Self::Prefix(required()?)),
            "equals" => Ok(Self::Equals(required()?)),
            "contains" => Ok(Self::Contains(required()?)),
            "exists" => Ok(Self::Exists),
            other => Err(RuleError::UnknownMatch(other.to_string())),
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Self::Prefix(_) => "prefix",
            Self::Equals(_) => "equals",
            Self::Contains(_) => "contains",
            Self::Exists => "exists",
        }
    }

    pub fn matches(&self, field: Option<&Value>) -> bool {
        let Some(field) = field.filter(|v| !v.is_null()) else {
            return false;
        };
        match self {
            Self::Exists => true,
            Self::Prefix(prefix) => field.as_str().is_some_and(|s| s.starts_with(prefix.as_str())),
            Self::Equals(expected) => scalar_text(field).is_some_and(|s| s == *expected),
            Self::Contains(needle) => match field {
                Value::String(s) => s.contains(needle.as_str()),
                Value::Array(items) => items
                    .iter()
                    .any(|item| scalar_text(item).is_some_and(|s| s == *needle)),
                _ => false,
            },
        }
    }
}

fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Resolve a dotted path such as `data.items.0.kind`.
///
/// Numeric segments index into arrays.
pub fn lookup<'a>(payload: &'a Value, path: &str) -> Option<&'a Value> {
    path.split('.').try_fold(payload, |current, segment| match current {
        Value::Object(map) => map.get(segment),
        Value::Array(items) => segment.parse::<usize>().ok().and_then(|i| items.get(i)),
        _ => None,
    })
}

/// One classification rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventRule {
    pub event: String,
    pub field: String,
    pub matcher: Matcher,
}

impl EventRule {
    /// A rule on the default `type` field.
    pub fn new(event: impl Into<String>, matcher: Matcher) -> Self {
        Self {
            event: event.into(),
            field: DEFAULT_FIELD.to_string(),
            matcher,
        }
    }

    pub fn on_field(mut self, field: impl Into<String>) -> Self {
        self.field = field.into();
        self
    }

    pub fn matches(&self, payload: &Value) -> bool {
        self.matcher.matches(lookup(payload, &self.field))
    }
}

/// Ordered rule set.
#[derive(Debug, Clone, Default)]
pub struct EventClassifier {
    rules: Vec<EventRule>,
}

impl EventClassifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_rule(mut self, rule: EventRule) -> Self {
        self.rules.push(rule);
        self
    }

    pub fn push(&mut self, rule: EventRule) {
        self.rules.push(rule);
    }

    pub fn rules(&self) -> &[EventRule] {
        &self.rules
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Event names in rule order, each at most once.
    pub fn classify(&self, payload: &Value) -> Vec<String> {
        let mut events: Vec<String> = Vec::new();
        for rule in &self.rules {
            if rule.matches(payload) && !events.contains(&rule.event) {
                events.push(rule.event.clone());
            }
        }
        events
    }
}

impl FromIterator<EventRule> for EventClassifier {
    fn from_iter<I: IntoIterator<Item = EventRule>>(iter: I) -> Self {
        Self {
            rules: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
#[path = "classify_tests.rs"]
mod tests;
