//! Unsubscribe errors.

use thiserror::Error;

/// Raised only when a local precondition prevents even attempting the
/// upstream teardown. Upstream failures are reported through
/// [`crate::types::UnsubscribeResult`] instead.
#[derive(Debug, Error)]
pub enum UnsubscribeError {
    #[error("Subscription is missing required property: {0}")]
    MissingProperty(String),

    #[error("Invalid subscription property {key}: {reason}")]
    InvalidProperty { key: String, reason: String },
}
