//! Subscription records.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{Parameters, Timestamp};

/// Property key holding the upstream-assigned registration id.
pub const PROPERTY_EXTERNAL_ID: &str = "external_id";
/// Property key holding the event types the subscription was created for.
pub const PROPERTY_EVENTS: &str = "events";
/// Property key holding the upstream-issued signing secret, if any.
pub const PROPERTY_WEBHOOK_SECRET: &str = "webhook_secret";

/// One active webhook registration with an upstream service.
///
/// Owned by the host's store. Refresh returns a new value rather than
/// mutating this one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Subscription {
    /// Callback URL the upstream invokes. Opaque to Hookline.
    pub endpoint: String,
    /// Lease expiry, seconds since epoch.
    pub expires_at: Timestamp,
    /// Upstream identifiers and subscribed event types.
    #[serde(default)]
    pub properties: Parameters,
}

impl Subscription {
    pub fn new(endpoint: impl Into<String>, expires_at: Timestamp) -> Self {
        Self {
            endpoint: endpoint.into(),
            expires_at,
            properties: Parameters::new(),
        }
    }

    /// Set a property.
    pub fn with_property(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.properties.insert(key.into(), value.into());
        self
    }

    pub fn property(&self, key: &str) -> Option<&Value> {
        self.properties.get(key)
    }

    /// Get a property as a non-empty string.
    pub fn property_str(&self, key: &str) -> Option<&str> {
        self.properties
            .get(key)
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
    }

    /// The upstream registration id, if recorded.
    pub fn external_id(&self) -> Option<&str> {
        self.property_str(PROPERTY_EXTERNAL_ID)
    }

    /// Event types recorded at creation. Empty means all events.
    pub fn events(&self) -> Vec<String> {
        self.property(PROPERTY_EVENTS)
            .and_then(Value::as_array)
            .map(|items| {
                items
                    .iter()
                    .filter_map(|v| v.as_str().map(str::to_string))
                    .collect()
            })
            .unwrap_or_default()
    }

    pub fn is_expired_at(&self, now: Timestamp) -> bool {
        self.expires_at <= now
    }

    /// Seconds left on the lease, negative once expired.
    pub fn remaining_at(&self, now: Timestamp) -> i64 {
        self.expires_at - now
    }
}

/// Host-side lifecycle state of a subscription record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubscriptionState {
    Unsubscribed,
    Active,
    Expired,
}

impl SubscriptionState {
    /// Derive the state of an optional record at `now`.
    pub fn of(subscription: Option<&Subscription>, now: Timestamp) -> Self {
        match subscription {
            None => Self::Unsubscribed,
            Some(s) if s.is_expired_at(now) => Self::Expired,
            Some(_) => Self::Active,
        }
    }
}

/// Outcome report of an unsubscribe call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnsubscribeResult {
    pub success: bool,
    pub message: String,
}

impl UnsubscribeResult {
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
        }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
        }
    }
}

#[cfg(test)]
#[path = "subscription_tests.rs"]
mod tests;
