use thiserror::Error;

use crate::actor_framework::DomainError;
use crate::menu_actor::MenuError;
use crate::voucher_actor::VoucherError;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum CartError {
    #[error("Cart not found: {0}")]
    NotFound(String),
    #[error("Cart already exists: {0}")]
    AlreadyExists(String),
    #[error("Cart holds items from vendor {cart_vendor}; cannot add items from vendor {item_vendor}")]
    VendorMismatch {
        cart_vendor: String,
        item_vendor: String,
    },
    #[error("Item {0} is not in the cart")]
    ItemNotInCart(String),
    #[error("Invalid quantity {quantity}: must be between 1 and {max}")]
    InvalidQuantity { quantity: u32, max: u32 },
    #[error("Cart is empty")]
    Empty,
    #[error(transparent)]
    Menu(#[from] MenuError),
    #[error(transparent)]
    Voucher(#[from] VoucherError),
    #[error("Actor communication error: {0}")]
    ActorCommunicationError(String),
}

impl CartError {
    pub fn status_code(&self) -> u16 {
        match self {
            CartError::NotFound(_) | CartError::ItemNotInCart(_) => 404,
            CartError::AlreadyExists(_) | CartError::VendorMismatch { .. } => 409,
            CartError::InvalidQuantity { .. } => 400,
            CartError::Empty => 422,
            CartError::Menu(e) => e.status_code(),
            CartError::Voucher(e) => e.status_code(),
            CartError::ActorCommunicationError(_) => 500,
        }
    }
}

impl DomainError for CartError {
    fn not_found(id: String) -> Self {
        CartError::NotFound(id)
    }
    fn already_exists(id: String) -> Self {
        CartError::AlreadyExists(id)
    }
    fn communication(reason: String) -> Self {
        CartError::ActorCommunicationError(reason)
    }
}
