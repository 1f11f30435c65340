use thiserror::Error;

use crate::actor_framework::DomainError;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum VendorError {
    #[error("Vendor not found: {0}")]
    NotFound(String),
    #[error("Vendor already exists: {0}")]
    AlreadyExists(String),
    #[error("Vendor validation error: {0}")]
    ValidationError(String),
    #[error("Vendor {0} is not accepting orders right now")]
    Closed(String),
    #[error("Actor communication error: {0}")]
    ActorCommunicationError(String),
}

impl VendorError {
    pub fn status_code(&self) -> u16 {
        match self {
            VendorError::NotFound(_) => 404,
            VendorError::AlreadyExists(_) => 409,
            VendorError::ValidationError(_) | VendorError::Closed(_) => 422,
            VendorError::ActorCommunicationError(_) => 500,
        }
    }
}

impl DomainError for VendorError {
    fn not_found(id: String) -> Self {
        VendorError::NotFound(id)
    }
    fn already_exists(id: String) -> Self {
        VendorError::AlreadyExists(id)
    }
    fn communication(reason: String) -> Self {
        VendorError::ActorCommunicationError(reason)
    }
}
