//! HTTP interface module.
//!
//! Provides endpoints for:
//! - Inbound webhook deliveries
//! - Subscription administration
//! - The provider plugin protocol
//! - Health checks

pub mod routes;

pub(crate) mod health;
pub(crate) mod host;
pub(crate) mod subscriptions;
pub(crate) mod webhook;
