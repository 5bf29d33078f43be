//! Credential validation errors.

use thiserror::Error;

/// Raised when provider credentials are rejected at setup time.
///
/// Blocks activation of the provider; nothing else may be called until the
/// credentials validate.
#[derive(Debug, Error)]
pub enum CredentialValidationError {
    #[error("Missing credential: {0}")]
    Missing(String),

    #[error("Invalid credential {field}: {reason}")]
    Invalid { field: String, reason: String },

    #[error("Credentials rejected by upstream: {0}")]
    Rejected(String),

    #[error("Credential check failed: {0}")]
    CheckFailed(String),
}
