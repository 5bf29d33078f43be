//! HTTP route definitions.

use std::sync::Arc;

use axum::{
    Router,
    routing::{any, get, post},
};
use tower_http::trace::TraceLayer;

use crate::http::{health, host, subscriptions, webhook};
use crate::state::AppState;

/// Create the main router.
///
/// ## Route Structure
///
/// ```text
/// /triggers
///   ANY    /triggers/{id}              - Inbound webhook delivery
///
/// /subscriptions
///   GET    /subscriptions              - List subscriptions
///   POST   /subscriptions              - Create subscription
///   GET    /subscriptions/{id}         - Get subscription
///   POST   /subscriptions/{id}/refresh - Extend lease
///   DELETE /subscriptions/{id}         - Delete subscription
///
/// /plugin/trigger
///   POST   /plugin/trigger/validate_credentials
///   POST   /plugin/trigger/subscribe
///   POST   /plugin/trigger/refresh
///   POST   /plugin/trigger/unsubscribe
///   POST   /plugin/trigger/dispatch_event
///   POST   /plugin/trigger/invoke_event
///
/// /providers - Registered provider declarations
/// /health    - Health check
/// ```
pub fn create_router(state: Arc<AppState>) -> Router {
    let trigger_routes = Router::new()
        .route("/{id}", any(webhook::handle_webhook))
        .with_state(state.clone());

    let subscription_routes = Router::new()
        .route(
            "/",
            get(subscriptions::list_subscriptions).post(subscriptions::create_subscription),
        )
        .route(
            "/{id}",
            get(subscriptions::get_subscription).delete(subscriptions::delete_subscription),
        )
        .route("/{id}/refresh", post(subscriptions::refresh_subscription))
        .with_state(state.clone());

    let plugin_routes = Router::new()
        .route("/validate_credentials", post(host::validate_credentials))
        .route("/subscribe", post(host::subscribe))
        .route("/refresh", post(host::refresh))
        .route("/unsubscribe", post(host::unsubscribe))
        .route("/dispatch_event", post(host::dispatch_event))
        .route("/invoke_event", post(host::invoke_event))
        .with_state(state.clone());

    let monitoring_routes = Router::new()
        .route("/health", get(health::health_check))
        .route("/providers", get(health::list_providers))
        .with_state(state);

    Router::new()
        .nest("/triggers", trigger_routes)
        .nest("/subscriptions", subscription_routes)
        .nest("/plugin/trigger", plugin_routes)
        .merge(monitoring_routes)
        .layer(TraceLayer::new_for_http())
}

#[cfg(test)]
#[path = "routes_tests.rs"]
mod tests;
