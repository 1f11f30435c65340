use serde::Serialize;
use thiserror::Error;

use super::config::ConfigError;
use crate::cart_actor::CartError;
use crate::menu_actor::MenuError;
use crate::notification_actor::NotificationError;
use crate::order_actor::OrderError;
use crate::pickup_service::PickupError;
use crate::user_actor::UserError;
use crate::vendor_actor::VendorError;
use crate::voucher_actor::VoucherError;

/// Any failure a caller of the marketplace can see.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum MarketError {
    #[error(transparent)]
    User(#[from] UserError),
    #[error(transparent)]
    Vendor(#[from] VendorError),
    #[error(transparent)]
    Menu(#[from] MenuError),
    #[error(transparent)]
    Cart(#[from] CartError),
    #[error(transparent)]
    Voucher(#[from] VoucherError),
    #[error(transparent)]
    Order(#[from] OrderError),
    #[error(transparent)]
    Pickup(#[from] PickupError),
    #[error(transparent)]
    Notification(#[from] NotificationError),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("Shutdown failed: {0}")]
    Shutdown(String),
}

impl MarketError {
    /// HTTP status a thin web layer would answer with.
    pub fn status_code(&self) -> u16 {
        match self {
            MarketError::User(e) => e.status_code(),
            MarketError::Vendor(e) => e.status_code(),
            MarketError::Menu(e) => e.status_code(),
            MarketError::Cart(e) => e.status_code(),
            MarketError::Voucher(e) => e.status_code(),
            MarketError::Order(e) => e.status_code(),
            MarketError::Pickup(e) => e.status_code(),
            MarketError::Notification(e) => e.status_code(),
            MarketError::Config(_) | MarketError::Shutdown(_) => 500,
        }
    }

    pub fn into_response<T: Serialize>(self) -> ApiResponse<T> {
        ApiResponse {
            success: false,
            status: self.status_code(),
            message: self.to_string(),
            data: None,
        }
    }
}

/// Uniform envelope: `{ success, status, message, data }`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub success: bool,
    pub status: u16,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn ok(status: u16, message: impl Into<String>, data: T) -> Self {
        Self {
            success: true,
            status,
            message: message.into(),
            data: Some(data),
        }
    }

    pub fn from_result<E: Into<MarketError>>(
        result: Result<T, E>,
        status: u16,
        message: impl Into<String>,
    ) -> Self {
        match result {
            Ok(data) => Self::ok(status, message, data),
            Err(e) => e.into().into_response(),
        }
    }
}
