//! Errors reported by upstream service clients.

use thiserror::Error;

/// Failure of a call to the upstream service that owns the webhook
/// registration.
#[derive(Debug, Error)]
pub enum UpstreamError {
    /// The upstream does not know the referenced registration.
    #[error("Registration not found upstream: {0}")]
    NotFound(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Failed to decode upstream response: {0}")]
    Decode(String),

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Request timed out")]
    Timeout,
}

impl UpstreamError {
    /// Whether the error means the registration is already gone.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}
