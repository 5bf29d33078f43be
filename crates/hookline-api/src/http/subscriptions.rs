//! Subscription admin handlers.

use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde::Serialize;

use hookline_protocols::types::{SubscriptionState, now_timestamp};

use crate::error::ApiError;
use crate::lifecycle::{self, CreateSubscriptionRequest};
use crate::state::AppState;
use crate::store::StoredSubscription;

/// A stored subscription with its lease state at response time.
#[derive(Debug, Serialize)]
pub struct SubscriptionView {
    #[serde(flatten)]
    pub stored: StoredSubscription,
    pub state: SubscriptionState,
}

impl From<StoredSubscription> for SubscriptionView {
    fn from(stored: StoredSubscription) -> Self {
        Self {
            state: stored.state_at(now_timestamp()),
            stored,
        }
    }
}

/// GET /subscriptions
pub async fn list_subscriptions(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let subscriptions: Vec<SubscriptionView> =
        state.store.list().into_iter().map(SubscriptionView::from).collect();
    Json(serde_json::json!({
        "count": subscriptions.len(),
        "subscriptions": subscriptions,
    }))
}

/// POST /subscriptions
pub async fn create_subscription(
    State(state): State<Arc<AppState>>,
    Json(request): Json<CreateSubscriptionRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let stored = lifecycle::create(&state, request).await?;
    Ok((StatusCode::CREATED, Json(SubscriptionView::from(stored))))
}

/// GET /subscriptions/{id}
pub async fn get_subscription(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let stored = state
        .store
        .get(&id)
        .ok_or(ApiError::SubscriptionNotFound(id))?;
    Ok(Json(SubscriptionView::from(stored)))
}

/// POST /subscriptions/{id}/refresh
pub async fn refresh_subscription(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let stored = lifecycle::refresh(&state, &id).await?;
    Ok(Json(SubscriptionView::from(stored)))
}

/// DELETE /subscriptions/{id}
pub async fn delete_subscription(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let result = lifecycle::delete(&state, &id).await?;
    Ok(Json(result))
}
