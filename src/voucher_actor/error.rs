use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use thiserror::Error;

use crate::actor_framework::DomainError;
use crate::ordering::RuleError;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum VoucherError {
    #[error("Voucher not found: {0}")]
    NotFound(String),
    #[error("Voucher code already exists: {0}")]
    AlreadyExists(String),
    #[error("Voucher validation error: {0}")]
    ValidationError(String),
    #[error("Invalid discount rule: {0}")]
    Rule(#[from] RuleError),
    #[error("Voucher {0} is not active")]
    Inactive(String),
    #[error("Voucher {code} is valid from {valid_from}")]
    NotYetValid {
        code: String,
        valid_from: DateTime<Utc>,
    },
    #[error("Voucher {0} has expired")]
    Expired(String),
    #[error("Voucher {0} cannot be used at this vendor")]
    WrongVendor(String),
    #[error("Voucher {0} has reached its usage limit")]
    UsageLimitReached(String),
    #[error("Voucher {0} has already been used the maximum number of times by this customer")]
    UserLimitReached(String),
    #[error("Order subtotal {subtotal} is below the voucher minimum of {min_order}")]
    BelowMinimum { min_order: Decimal, subtotal: Decimal },
    #[error("Actor communication error: {0}")]
    ActorCommunicationError(String),
}

impl VoucherError {
    pub fn status_code(&self) -> u16 {
        match self {
            VoucherError::NotFound(_) => 404,
            VoucherError::AlreadyExists(_) => 409,
            VoucherError::UsageLimitReached(_) | VoucherError::UserLimitReached(_) => 429,
            VoucherError::ValidationError(_)
            | VoucherError::Rule(_)
            | VoucherError::Inactive(_)
            | VoucherError::NotYetValid { .. }
            | VoucherError::Expired(_)
            | VoucherError::WrongVendor(_)
            | VoucherError::BelowMinimum { .. } => 422,
            VoucherError::ActorCommunicationError(_) => 500,
        }
    }
}

impl DomainError for VoucherError {
    fn not_found(id: String) -> Self {
        VoucherError::NotFound(id)
    }
    fn already_exists(id: String) -> Self {
        VoucherError::AlreadyExists(id)
    }
    fn communication(reason: String) -> Self {
        VoucherError::ActorCommunicationError(reason)
    }
}
