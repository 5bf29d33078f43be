//! Plugin protocol handlers.
//!
//! Each action names its provider and carries its own credentials, so
//! these routes never touch the host's subscription store.

use std::sync::Arc;

use axum::{
    Json,
    extract::State,
    response::IntoResponse,
};
use tracing::{Instrument, debug};

use hookline_core::extract_payload;
use hookline_protocols::error::{CredentialValidationError, TriggerDispatchError};
use hookline_protocols::wire::{
    DispatchEventRequest, InvokeEventRequest, InvokeEventResponse, RefreshRequest,
    SubscribeRequest, SubscriptionResponse, UnsubscribeRequest, UnsubscribeResponse,
    ValidateCredentialsRequest, ValidateCredentialsResponse,
};

use crate::error::ApiError;
use crate::state::AppState;

/// POST /plugin/trigger/validate_credentials
///
/// A rejected or malformed credential set is a normal `{result: false}`
/// answer. Only a check that could not run is an error.
pub async fn validate_credentials(
    State(state): State<Arc<AppState>>,
    Json(request): Json<ValidateCredentialsRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let provider = state.registry.require(&request.call.provider)?;
    let response = match provider
        .constructor()
        .validate_credentials(&request.call.credentials)
        .await
    {
        Ok(()) => ValidateCredentialsResponse::valid(),
        Err(e @ CredentialValidationError::CheckFailed(_)) => return Err(e.into()),
        Err(e) => {
            debug!(provider = %request.call.provider, error = %e, "Credentials not valid");
            ValidateCredentialsResponse::invalid(e.to_string())
        }
    };
    Ok(Json(response))
}

/// POST /plugin/trigger/subscribe
pub async fn subscribe(
    State(state): State<Arc<AppState>>,
    Json(request): Json<SubscribeRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let provider = state.registry.require(&request.call.provider)?;
    let ctx = request.call.context();
    let subscription = provider
        .constructor()
        .create_subscription(&ctx, &request.endpoint, &request.parameters)
        .await?;
    Ok(Json(SubscriptionResponse { subscription }))
}

/// POST /plugin/trigger/refresh
pub async fn refresh(
    State(state): State<Arc<AppState>>,
    Json(request): Json<RefreshRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let provider = state.registry.require(&request.call.provider)?;
    let ctx = request.call.context();
    let subscription = provider
        .constructor()
        .refresh_subscription(&ctx, &request.subscription)
        .await?;
    Ok(Json(SubscriptionResponse { subscription }))
}

/// POST /plugin/trigger/unsubscribe
pub async fn unsubscribe(
    State(state): State<Arc<AppState>>,
    Json(request): Json<UnsubscribeRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let provider = state.registry.require(&request.call.provider)?;
    let ctx = request.call.context();
    let result = provider
        .constructor()
        .delete_subscription(&ctx, &request.subscription)
        .await?;
    Ok(Json(UnsubscribeResponse {
        subscription: request.subscription,
        result,
    }))
}

/// POST /plugin/trigger/dispatch_event
pub async fn dispatch_event(
    State(state): State<Arc<AppState>>,
    Json(request): Json<DispatchEventRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let provider = state.registry.require(&request.call.provider)?;
    let ctx = request.call.context();
    let webhook = request.request()?;
    let dispatch = provider
        .trigger()
        .dispatch_event(&ctx, &request.subscription, &webhook)
        .await?;
    Ok(Json(dispatch))
}

/// POST /plugin/trigger/invoke_event
pub async fn invoke_event(
    State(state): State<Arc<AppState>>,
    Json(request): Json<InvokeEventRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let provider = state.registry.require(&request.call.provider)?;
    let event = provider
        .event(&request.event)
        .ok_or_else(|| TriggerDispatchError::EventNotFound(request.event.clone()))?;
    let ctx = request.call.context();
    let webhook = request.request()?;
    let payload = match request.payload {
        Some(payload) => payload,
        None => extract_payload(&webhook.body)?,
    };

    let outcome = event
        .on_event(&ctx, &webhook, &request.parameters, &payload)
        .instrument(ctx.span("invoke_event"))
        .await?;
    Ok(Json(InvokeEventResponse::from(outcome)))
}
