//! Subscription lifecycle errors.

use thiserror::Error;

use super::UpstreamError;

/// Raised by subscription creation and refresh.
#[derive(Debug, Error)]
pub enum SubscriptionError {
    #[error("Invalid subscription parameters: {0}")]
    InvalidParameters(String),

    /// The upstream no longer knows the subscription. The host should fall
    /// back to creating a new one.
    #[error("Subscription no longer known upstream: {0}")]
    Expired(String),

    #[error("Upstream returned HTTP {status}: {message}")]
    Upstream { status: u16, message: String },

    #[error("Invalid upstream response: {0}")]
    InvalidResponse(String),

    #[error("Upstream request failed: {0}")]
    Transport(String),

    #[error("Upstream request timed out")]
    Timeout,
}

impl From<UpstreamError> for SubscriptionError {
    fn from(err: UpstreamError) -> Self {
        match err {
            UpstreamError::NotFound(id) => Self::Expired(id),
            UpstreamError::Status { status, body } => Self::Upstream {
                status,
                message: body,
            },
            UpstreamError::Unauthorized(msg) => Self::Upstream {
                status: 401,
                message: msg,
            },
            UpstreamError::Decode(msg) => Self::InvalidResponse(msg),
            UpstreamError::Transport(msg) => Self::Transport(msg),
            UpstreamError::Timeout => Self::Timeout,
        }
    }
}
