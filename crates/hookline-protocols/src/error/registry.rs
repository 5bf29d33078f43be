//! Provider registry errors.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("Trigger provider not found: {0}")]
    NotFound(String),

    #[error("Trigger provider already registered: {0}")]
    AlreadyRegistered(String),

    #[error("Invalid provider declaration: {0}")]
    InvalidDeclaration(String),
}
