//! Subscription lifecycle on host-owned records.
//!
//! Admin routes, the lease refresher and startup all go through these
//! functions so every change lands in the [`SubscriptionStore`](crate::store::SubscriptionStore).

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::{Instrument, info, warn};

use hookline_protocols::error::SubscriptionError;
use hookline_protocols::trigger::is_valid_identity_name;
use hookline_protocols::types::{PROPERTY_EVENTS, Parameters, UnsubscribeResult};

use crate::error::ApiError;
use crate::state::AppState;
use crate::store::StoredSubscription;

/// Body of `POST /subscriptions`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateSubscriptionRequest {
    /// Subscription id, `[A-Za-z0-9_-]+` so it forms a single path segment.
    /// Generated when absent.
    #[serde(default)]
    pub id: Option<String>,
    /// Provider name. Defaults to the host's default provider.
    #[serde(default)]
    pub provider: Option<String>,
    /// Upstream event types. Empty subscribes to all events.
    #[serde(default)]
    pub events: Vec<String>,
    #[serde(default)]
    pub event_parameters: HashMap<String, Parameters>,
}

fn events_parameter(events: Vec<String>) -> Parameters {
    let mut params = Parameters::new();
    params.insert(PROPERTY_EVENTS.to_string(), events.into());
    params
}

/// Register a new subscription upstream and store it.
pub async fn create(
    state: &AppState,
    request: CreateSubscriptionRequest,
) -> Result<StoredSubscription, ApiError> {
    let id = request
        .id
        .unwrap_or_else(|| uuid::Uuid::new_v4().to_string());
    if !is_valid_identity_name(&id) {
        return Err(ApiError::InvalidRequest(format!("invalid subscription id '{id}'")));
    }
    if state.store.contains(&id) {
        return Err(ApiError::SubscriptionExists(id));
    }

    let provider_name = request
        .provider
        .unwrap_or_else(|| state.default_provider.clone());
    let provider = state.registry.require(&provider_name)?;
    let ctx = state.context(&provider_name);
    let endpoint = state.endpoint_for(&id);

    let constructor = provider.constructor();
    let subscription = constructor
        .create_subscription(&ctx, &endpoint, &events_parameter(request.events))
        .await?;

    let stored = StoredSubscription::new(&id, &provider_name, subscription)
        .with_event_parameters(request.event_parameters);
    if let Err(e) = state.store.insert(stored.clone()) {
        // Lost a race for the id; undo the upstream registration.
        let cleanup = constructor
            .delete_subscription(&ctx, &stored.subscription)
            .await;
        warn!(subscription_id = %id, cleanup = ?cleanup, "Subscription id taken after creation");
        return Err(e);
    }

    info!(
        subscription_id = %id,
        provider = %provider_name,
        expires_at = stored.subscription.expires_at,
        "Subscription stored"
    );
    Ok(stored)
}

/// Extend the lease of a stored subscription.
pub async fn refresh(state: &AppState, id: &str) -> Result<StoredSubscription, ApiError> {
    let stored = state
        .store
        .get(id)
        .ok_or_else(|| ApiError::SubscriptionNotFound(id.to_string()))?;
    let provider = state.registry.require(&stored.provider)?;
    let ctx = state.context(&stored.provider);

    let refreshed = provider
        .constructor()
        .refresh_subscription(&ctx, &stored.subscription)
        .await?;
    state.store.replace_subscription(id, refreshed)
}

/// Refresh, recreating the registration when the upstream no longer knows it.
pub async fn refresh_or_recreate(state: &AppState, id: &str) -> Result<StoredSubscription, ApiError> {
    match refresh(state, id).await {
        Err(ApiError::Subscription(SubscriptionError::Expired(reason))) => {
            warn!(subscription_id = %id, %reason, "Subscription unknown upstream, recreating");
            recreate(state, id).await
        }
        other => other,
    }
}

async fn recreate(state: &AppState, id: &str) -> Result<StoredSubscription, ApiError> {
    let stored = state
        .store
        .get(id)
        .ok_or_else(|| ApiError::SubscriptionNotFound(id.to_string()))?;
    recreate_stored(state, &stored).await
}

async fn recreate_stored(
    state: &AppState,
    stored: &StoredSubscription,
) -> Result<StoredSubscription, ApiError> {
    let id = stored.id.as_str();
    let provider = state.registry.require(&stored.provider)?;
    let ctx = state.context(&stored.provider);
    let constructor = provider.constructor();

    let created = constructor
        .create_subscription(
            &ctx,
            &stored.subscription.endpoint,
            &events_parameter(stored.subscription.events()),
        )
        .instrument(tracing::info_span!("recreate", subscription_id = %id))
        .await?;
    match state.store.replace_subscription(id, created.clone()) {
        Ok(replaced) => Ok(replaced),
        Err(e) => {
            // Deleted while recreating; drop the fresh registration.
            let cleanup = constructor.delete_subscription(&ctx, &created).await;
            warn!(subscription_id = %id, cleanup = ?cleanup, "Subscription removed during recreation");
            Err(e)
        }
    }
}

/// Tear down a subscription. The record is removed even when upstream
/// teardown fails; the result reports what happened.
pub async fn delete(state: &AppState, id: &str) -> Result<UnsubscribeResult, ApiError> {
    let stored = state
        .store
        .remove(id)
        .ok_or_else(|| ApiError::SubscriptionNotFound(id.to_string()))?;
    let provider = state.registry.require(&stored.provider)?;
    let ctx = state.context(&stored.provider);

    let result = provider
        .constructor()
        .delete_subscription(&ctx, &stored.subscription)
        .await?;
    if result.success {
        info!(subscription_id = %id, message = %result.message, "Subscription deleted");
    } else {
        warn!(subscription_id = %id, message = %result.message, "Subscription removed locally, upstream teardown failed");
    }
    Ok(result)
}

#[cfg(test)]
#[path = "lifecycle_tests.rs"]
mod tests;
