use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum PickupError {
    #[error("No pickup for order {0}")]
    NotFound(String),
    #[error("Pickup for order {0} was withdrawn")]
    Withdrawn(String),
    #[error("Actor communication error: {0}")]
    ActorCommunicationError(String),
}

impl PickupError {
    pub fn status_code(&self) -> u16 {
        match self {
            PickupError::NotFound(_) => 404,
            PickupError::Withdrawn(_) => 409,
            PickupError::ActorCommunicationError(_) => 500,
        }
    }
}
