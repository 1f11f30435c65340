use thiserror::Error;

use crate::actor_framework::DomainError;

/// Errors that can occur during user operations.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum UserError {
    #[error("User not found: {0}")]
    NotFound(String),
    #[error("User already exists: {0}")]
    AlreadyExists(String),
    #[error("User validation error: {0}")]
    ValidationError(String),
    #[error("Actor communication error: {0}")]
    ActorCommunicationError(String),
}

impl UserError {
    pub fn status_code(&self) -> u16 {
        match self {
            UserError::NotFound(_) => 404,
            UserError::AlreadyExists(_) => 409,
            UserError::ValidationError(_) => 422,
            UserError::ActorCommunicationError(_) => 500,
        }
    }
}

impl DomainError for UserError {
    fn not_found(id: String) -> Self {
        UserError::NotFound(id)
    }
    fn already_exists(id: String) -> Self {
        UserError::AlreadyExists(id)
    }
    fn communication(reason: String) -> Self {
        UserError::ActorCommunicationError(reason)
    }
}
