use thiserror::Error;

use crate::actor_framework::DomainError;
use crate::cart_actor::CartError;
use crate::menu_actor::MenuError;
use crate::notification_actor::NotificationError;
use crate::ordering::{BuildError, OrderStatus, TransitionError};
use crate::pickup_service::PickupError;
use crate::vendor_actor::VendorError;
use crate::voucher_actor::VoucherError;

/// Errors that can occur during order operations.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum OrderError {
    #[error("Order not found: {0}")]
    NotFound(String),
    #[error("Order already exists: {0}")]
    AlreadyExists(String),
    #[error("Order validation error: {0}")]
    ValidationError(String),
    #[error("{requester} may not {action} order {order_id}")]
    Forbidden {
        requester: String,
        action: String,
        order_id: String,
    },
    #[error(transparent)]
    InvalidTransition(#[from] TransitionError),
    #[error("Only completed orders can be reordered; order {order_id} is {status}")]
    NotReorderable { order_id: String, status: OrderStatus },
    #[error("Nothing from order {0} can be ordered again")]
    NothingToReorder(String),
    #[error(transparent)]
    Build(#[from] BuildError),
    #[error(transparent)]
    Cart(#[from] CartError),
    #[error(transparent)]
    Menu(#[from] MenuError),
    #[error(transparent)]
    Vendor(#[from] VendorError),
    #[error(transparent)]
    Voucher(#[from] VoucherError),
    #[error(transparent)]
    Pickup(#[from] PickupError),
    #[error(transparent)]
    Notification(#[from] NotificationError),
    #[error("Actor communication error: {0}")]
    ActorCommunicationError(String),
}

impl OrderError {
    pub fn status_code(&self) -> u16 {
        match self {
            OrderError::NotFound(_) => 404,
            OrderError::AlreadyExists(_) | OrderError::InvalidTransition(_) => 409,
            OrderError::Forbidden { .. } => 403,
            OrderError::ValidationError(_)
            | OrderError::NotReorderable { .. }
            | OrderError::NothingToReorder(_)
            | OrderError::Build(_) => 422,
            OrderError::Cart(e) => e.status_code(),
            OrderError::Menu(e) => e.status_code(),
            OrderError::Vendor(e) => e.status_code(),
            OrderError::Voucher(e) => e.status_code(),
            OrderError::Pickup(e) => e.status_code(),
            OrderError::Notification(e) => e.status_code(),
            OrderError::ActorCommunicationError(_) => 500,
        }
    }
}

impl DomainError for OrderError {
    fn not_found(id: String) -> Self {
        OrderError::NotFound(id)
    }
    fn already_exists(id: String) -> Self {
        OrderError::AlreadyExists(id)
    }
    fn communication(reason: String) -> Self {
        OrderError::ActorCommunicationError(reason)
    }
}
