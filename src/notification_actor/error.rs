use thiserror::Error;

use crate::actor_framework::DomainError;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum NotificationError {
    #[error("Notification not found: {0}")]
    NotFound(String),
    #[error("Notification already exists: {0}")]
    AlreadyExists(String),
    #[error("Notification validation error: {0}")]
    ValidationError(String),
    #[error("Actor communication error: {0}")]
    ActorCommunicationError(String),
}

impl NotificationError {
    pub fn status_code(&self) -> u16 {
        match self {
            NotificationError::NotFound(_) => 404,
            NotificationError::AlreadyExists(_) => 409,
            NotificationError::ValidationError(_) => 422,
            NotificationError::ActorCommunicationError(_) => 500,
        }
    }
}

impl DomainError for NotificationError {
    fn not_found(id: String) -> Self {
        NotificationError::NotFound(id)
    }
    fn already_exists(id: String) -> Self {
        NotificationError::AlreadyExists(id)
    }
    fn communication(reason: String) -> Self {
        NotificationError::ActorCommunicationError(reason)
    }
}
