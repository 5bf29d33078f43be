//! Trigger dispatch errors.

use thiserror::Error;

/// Raised when an inbound webhook cannot be turned into events.
///
/// A dispatch that matches zero events is not an error.
#[derive(Debug, Error)]
pub enum TriggerDispatchError {
    #[error("Empty request body")]
    EmptyBody,

    #[error("Failed to parse payload: {0}")]
    InvalidPayload(String),

    #[error("Webhook signature mismatch")]
    SignatureMismatch,

    #[error("Invalid raw HTTP request: {0}")]
    MalformedRequest(String),

    #[error("Event not found: {0}")]
    EventNotFound(String),

    #[error("Event failed: {0}")]
    EventFailed(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_body_error() {
        assert_eq!(TriggerDispatchError::EmptyBody.to_string(), "Empty request body");
    }

    #[test]
    fn test_invalid_payload_error() {
        let err = TriggerDispatchError::InvalidPayload("expected value at line 1".to_string());
        assert!(err.to_string().starts_with("Failed to parse payload"));
    }

    #[test]
    fn test_signature_mismatch_error() {
        assert!(TriggerDispatchError::SignatureMismatch
            .to_string()
            .contains("signature"));
    }

    #[test]
    fn test_event_not_found_error() {
        let err = TriggerDispatchError::EventNotFound("push".to_string());
        assert!(err.to_string().contains("push"));
    }
}
