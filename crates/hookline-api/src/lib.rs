//! # Hookline API
//!
//! HTTP host for trigger providers.
//!
//! - **Webhooks**: `ANY /triggers/{id}` receives upstream deliveries and
//!   dispatches them through the subscription's provider
//! - **Subscriptions**: admin routes to create, inspect, refresh and delete
//!   host-owned subscriptions
//! - **Plugin protocol**: `POST /plugin/trigger/{action}` exposes every
//!   provider operation as JSON
//! - **Lease refresher**: background task keeping subscriptions alive

pub mod error;
pub mod http;
pub mod lifecycle;
pub mod refresher;
pub mod server;
pub mod state;
pub mod store;

#[cfg(test)]
pub(crate) mod test_support;

pub use error::ApiError;
pub use http::routes::create_router;
pub use refresher::LeaseRefresher;
pub use server::{ApiServer, ServerSettings};
pub use state::{AppState, EmittedEvent, ProviderCredentials};
pub use store::{StoredSubscription, SubscriptionStore};
