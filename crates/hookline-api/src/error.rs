//! API error types.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use hookline_protocols::error::{
    CredentialValidationError, RegistryError, SubscriptionError, TriggerDispatchError,
    UnsubscribeError,
};

/// Errors surfaced by HTTP handlers.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Subscription not found: {0}")]
    SubscriptionNotFound(String),

    #[error("Subscription already exists: {0}")]
    SubscriptionExists(String),

    /// The lease ran out before the delivery arrived.
    #[error("Subscription expired: {0}")]
    SubscriptionExpired(String),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error(transparent)]
    Registry(#[from] RegistryError),

    #[error(transparent)]
    Credentials(#[from] CredentialValidationError),

    #[error(transparent)]
    Subscription(#[from] SubscriptionError),

    #[error(transparent)]
    Unsubscribe(#[from] UnsubscribeError),

    #[error(transparent)]
    Dispatch(#[from] TriggerDispatchError),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::SubscriptionNotFound(_) => StatusCode::NOT_FOUND,
            Self::SubscriptionExists(_) => StatusCode::CONFLICT,
            Self::SubscriptionExpired(_) => StatusCode::GONE,
            Self::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            Self::Registry(e) => match e {
                RegistryError::NotFound(_) => StatusCode::NOT_FOUND,
                RegistryError::AlreadyRegistered(_) => StatusCode::CONFLICT,
                RegistryError::InvalidDeclaration(_) => StatusCode::BAD_REQUEST,
            },
            Self::Credentials(e) => match e {
                CredentialValidationError::Missing(_) | CredentialValidationError::Invalid { .. } => {
                    StatusCode::BAD_REQUEST
                }
                CredentialValidationError::Rejected(_) => StatusCode::UNAUTHORIZED,
                CredentialValidationError::CheckFailed(_) => StatusCode::BAD_GATEWAY,
            },
            Self::Subscription(e) => match e {
                SubscriptionError::InvalidParameters(_) => StatusCode::BAD_REQUEST,
                SubscriptionError::Expired(_) => StatusCode::GONE,
                SubscriptionError::Timeout => StatusCode::GATEWAY_TIMEOUT,
                SubscriptionError::Upstream { .. }
                | SubscriptionError::InvalidResponse(_)
                | SubscriptionError::Transport(_) => StatusCode::BAD_GATEWAY,
            },
            Self::Unsubscribe(_) => StatusCode::BAD_REQUEST,
            Self::Dispatch(e) => match e {
                TriggerDispatchError::EventNotFound(_) => StatusCode::NOT_FOUND,
                TriggerDispatchError::EventFailed(_) => StatusCode::UNPROCESSABLE_ENTITY,
                _ => StatusCode::BAD_REQUEST,
            },
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        (status, Json(serde_json::json!({ "error": self.to_string() }))).into_response()
    }
}
