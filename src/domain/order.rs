use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::payment::Payment;
use crate::ordering::OrderStatus;

/// Immutable snapshot of a cart line taken at checkout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderItem {
    pub menu_item_id: String,
    pub name: String,
    pub unit_price: Decimal,
    pub quantity: u32,
    pub instructions: Option<String>,
    pub line_total: Decimal,
}

/// One timestamp per lifecycle step.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StatusTimestamps {
    pub placed_at: Option<DateTime<Utc>>,
    pub confirmed_at: Option<DateTime<Utc>>,
    pub preparing_at: Option<DateTime<Utc>>,
    pub ready_at: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
    pub cancelled_at: Option<DateTime<Utc>>,
}

impl StatusTimestamps {
    pub fn stamp(&mut self, status: OrderStatus, at: DateTime<Utc>) {
        let slot = match status {
            OrderStatus::Pending => &mut self.placed_at,
            OrderStatus::Confirmed => &mut self.confirmed_at,
            OrderStatus::Preparing => &mut self.preparing_at,
            OrderStatus::Ready => &mut self.ready_at,
            OrderStatus::Completed => &mut self.completed_at,
            OrderStatus::Cancelled => &mut self.cancelled_at,
        };
        *slot = Some(at);
    }
}

/// A placed order. Only its status, timestamps and payment change after creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub id: String,
    pub user_id: String,
    pub vendor_id: String,
    pub items: Vec<OrderItem>,
    pub subtotal: Decimal,
    pub service_fee: Decimal,
    pub discount: Decimal,
    pub total: Decimal,
    pub voucher_code: Option<String>,
    pub status: OrderStatus,
    pub timestamps: StatusTimestamps,
    pub payment: Payment,
    pub idempotency_key: Option<String>,
    pub cancellation_reason: Option<String>,
}

/// Params for creating an order; produced by [`crate::ordering::OrderBuilder`].
#[derive(Debug, Clone, PartialEq)]
pub struct OrderCreate {
    pub user_id: String,
    pub vendor_id: String,
    pub items: Vec<OrderItem>,
    pub subtotal: Decimal,
    pub service_fee: Decimal,
    pub discount: Decimal,
    pub total: Decimal,
    pub voucher_code: Option<String>,
    pub payment: Payment,
    pub idempotency_key: Option<String>,
    pub placed_at: DateTime<Utc>,
}

/// One line of a reorder: what to put back in the cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReorderLine {
    pub menu_item_id: String,
    pub quantity: u32,
    pub instructions: Option<String>,
}
