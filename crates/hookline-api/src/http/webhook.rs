//! Inbound webhook handler.

use std::collections::HashMap;
use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{OriginalUri, Path, Query, State},
    http::{HeaderMap, Method, StatusCode, header},
    response::{IntoResponse, Response},
};
use chrono::Utc;
use tracing::{Instrument, debug, info, warn};

use hookline_core::extract_payload;
use hookline_protocols::trigger::{TriggerContext, TriggerProvider};
use hookline_protocols::types::{
    EventDispatch, EventOutcome, SubscriptionState, WebhookRequest, WebhookResponse,
    now_timestamp,
};

use crate::error::ApiError;
use crate::state::{AppState, EmittedEvent};
use crate::store::StoredSubscription;

/// Handle a delivery from the upstream.
///
/// ANY /triggers/{id}
///
/// The provider's acknowledgment is relayed verbatim. Matched events are
/// invoked afterwards; their failures are logged and never change the
/// response the sender sees.
pub async fn handle_webhook(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    method: Method,
    OriginalUri(uri): OriginalUri,
    Query(query): Query<HashMap<String, String>>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Response, ApiError> {
    let stored = state
        .store
        .get(&id)
        .ok_or_else(|| ApiError::SubscriptionNotFound(id.clone()))?;
    if stored.state_at(now_timestamp()) == SubscriptionState::Expired {
        warn!(subscription_id = %id, "Delivery for expired subscription rejected");
        return Err(ApiError::SubscriptionExpired(id));
    }

    let provider = state.registry.require(&stored.provider)?;
    let ctx = state
        .context(&stored.provider)
        .with_correlation_id(uuid::Uuid::new_v4().to_string());

    let mut request = WebhookRequest::new(body.to_vec())
        .with_method(method.as_str())
        .with_path(uri.path());
    for (name, value) in headers.iter() {
        if let Ok(v) = value.to_str() {
            request = request.with_header(name.as_str(), v);
        }
    }
    for (key, value) in query {
        request = request.with_query(key, value);
    }

    let dispatch = provider
        .trigger()
        .dispatch_event(&ctx, &stored.subscription, &request)
        .await
        .inspect_err(|e| warn!(subscription_id = %id, error = %e, "Webhook dispatch failed"))?;
    info!(
        subscription_id = %id,
        events = ?dispatch.events,
        "Webhook dispatched"
    );

    invoke_events(&state, &*provider, &ctx, &stored, &request, &dispatch)
        .instrument(ctx.span("invoke_events"))
        .await;

    Ok(relay(dispatch.response))
}

async fn invoke_events(
    state: &AppState,
    provider: &dyn TriggerProvider,
    ctx: &TriggerContext,
    stored: &StoredSubscription,
    request: &WebhookRequest,
    dispatch: &EventDispatch,
) {
    if dispatch.is_empty() {
        return;
    }
    let payload = match &dispatch.payload {
        Some(payload) => payload.clone(),
        None => match extract_payload(&request.body) {
            Ok(payload) => payload,
            Err(e) => {
                warn!(subscription_id = %stored.id, error = %e, "Payload unavailable for events");
                return;
            }
        },
    };

    for name in &dispatch.events {
        let Some(event) = provider.event(name) else {
            debug!(event = %name, "No handler registered for event");
            continue;
        };
        let parameters = stored.parameters_for(name);
        match event.on_event(ctx, request, &parameters, &payload).await {
            Ok(EventOutcome::Emit(variables)) => {
                let receivers = state.publish(EmittedEvent {
                    subscription_id: stored.id.clone(),
                    provider: stored.provider.clone(),
                    event: name.clone(),
                    variables: variables.variables,
                    received_at: Utc::now(),
                });
                info!(event = %name, receivers, "Event emitted");
            }
            Ok(EventOutcome::Ignored) => {
                debug!(event = %name, "Event ignored by filter");
            }
            Err(e) => {
                warn!(event = %name, error = %e, "Event handler failed");
            }
        }
    }
}

fn relay(response: WebhookResponse) -> Response {
    let status = StatusCode::from_u16(response.status).unwrap_or(StatusCode::OK);
    (
        status,
        [(header::CONTENT_TYPE, response.content_type)],
        response.body,
    )
        .into_response()
}
