use thiserror::Error;

use crate::actor_framework::DomainError;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum MenuError {
    #[error("Menu item not found: {0}")]
    NotFound(String),
    #[error("Menu item already exists: {0}")]
    AlreadyExists(String),
    #[error("Menu item validation error: {0}")]
    ValidationError(String),
    #[error("Menu item {0} is not available")]
    Unavailable(String),
    #[error("Actor communication error: {0}")]
    ActorCommunicationError(String),
}

impl MenuError {
    pub fn status_code(&self) -> u16 {
        match self {
            MenuError::NotFound(_) => 404,
            MenuError::AlreadyExists(_) => 409,
            MenuError::ValidationError(_) | MenuError::Unavailable(_) => 422,
            MenuError::ActorCommunicationError(_) => 500,
        }
    }
}

impl DomainError for MenuError {
    fn not_found(id: String) -> Self {
        MenuError::NotFound(id)
    }
    fn already_exists(id: String) -> Self {
        MenuError::AlreadyExists(id)
    }
    fn communication(reason: String) -> Self {
        MenuError::ActorCommunicationError(reason)
    }
}
