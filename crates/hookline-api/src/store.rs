//! Host-owned subscription records.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use serde::{Deserialize, Serialize};

use hookline_protocols::types::{Parameters, Subscription, SubscriptionState, Timestamp};

use crate::error::ApiError;

/// A subscription together with the host's bookkeeping.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredSubscription {
    pub id: String,
    pub provider: String,
    pub subscription: Subscription,
    /// Parameters handed to each event, keyed by event name.
    #[serde(default)]
    pub event_parameters: HashMap<String, Parameters>,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refreshed_at: Option<DateTime<Utc>>,
}

impl StoredSubscription {
    pub fn new(id: impl Into<String>, provider: impl Into<String>, subscription: Subscription) -> Self {
        Self {
            id: id.into(),
            provider: provider.into(),
            subscription,
            event_parameters: HashMap::new(),
            created_at: Utc::now(),
            refreshed_at: None,
        }
    }

    pub fn with_event_parameters(mut self, event_parameters: HashMap<String, Parameters>) -> Self {
        self.event_parameters = event_parameters;
        self
    }

    /// Parameters for `event`, empty when none were configured.
    pub fn parameters_for(&self, event: &str) -> Parameters {
        self.event_parameters.get(event).cloned().unwrap_or_default()
    }

    pub fn state_at(&self, now: Timestamp) -> SubscriptionState {
        SubscriptionState::of(Some(&self.subscription), now)
    }
}

/// Concurrent in-memory store keyed by subscription id.
pub struct SubscriptionStore {
    entries: DashMap<String, StoredSubscription>,
}

impl SubscriptionStore {
    pub fn new() -> Self {
        Self {
            entries: DashMap::new(),
        }
    }

    /// Insert a new record. Fails if the id is taken.
    pub fn insert(&self, stored: StoredSubscription) -> Result<(), ApiError> {
        match self.entries.entry(stored.id.clone()) {
            Entry::Occupied(_) => Err(ApiError::SubscriptionExists(stored.id)),
            Entry::Vacant(slot) => {
                slot.insert(stored);
                Ok(())
            }
        }
    }

    pub fn get(&self, id: &str) -> Option<StoredSubscription> {
        self.entries.get(id).map(|e| e.clone())
    }

    pub fn contains(&self, id: &str) -> bool {
        self.entries.contains_key(id)
    }

    /// Swap in a refreshed or recreated subscription.
    pub fn replace_subscription(
        &self,
        id: &str,
        subscription: Subscription,
    ) -> Result<StoredSubscription, ApiError> {
        let mut entry = self
            .entries
            .get_mut(id)
            .ok_or_else(|| ApiError::SubscriptionNotFound(id.to_string()))?;
        entry.subscription = subscription;
        entry.refreshed_at = Some(Utc::now());
        Ok(entry.clone())
    }

    pub fn remove(&self, id: &str) -> Option<StoredSubscription> {
        self.entries.remove(id).map(|(_, stored)| stored)
    }

    /// All records, oldest first.
    pub fn list(&self) -> Vec<StoredSubscription> {
        let mut all: Vec<StoredSubscription> = self.entries.iter().map(|e| e.clone()).collect();
        all.sort_by(|a, b| a.created_at.cmp(&b.created_at).then_with(|| a.id.cmp(&b.id)));
        all
    }

    /// Records whose lease ends within `window` seconds of `now`.
    pub fn due_for_refresh(&self, now: Timestamp, window: i64) -> Vec<StoredSubscription> {
        self.list()
            .into_iter()
            .filter(|s| s.subscription.remaining_at(now) <= window)
            .collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for SubscriptionStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[path = "store_tests.rs"]
mod tests;
