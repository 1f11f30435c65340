use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use thiserror::Error;

use super::pricing::Quote;
use crate::domain::{Cart, CartItem, OrderCreate, OrderItem, Payment, PaymentMethod};

#[derive(Debug, Clone, Error, PartialEq)]
pub enum BuildError {
    #[error("cart is empty")]
    EmptyCart,
    #[error("order is missing its {0}")]
    Missing(&'static str),
    #[error("cart holds items from vendor {cart} but the order targets vendor {order}")]
    VendorMismatch { cart: String, order: String },
    #[error("invalid quantity {quantity} for menu item {menu_item_id}")]
    InvalidQuantity { menu_item_id: String, quantity: u32 },
}

/// Assembles the params of a new order from a cart snapshot.
///
/// Every cart line is copied into an [`OrderItem`] so later menu edits never
/// touch placed orders.
#[derive(Debug, Clone, Default)]
pub struct OrderBuilder {
    user_id: Option<String>,
    cart_vendor_id: Option<String>,
    vendor_id: Option<String>,
    lines: Vec<CartItem>,
    voucher: Option<(String, Decimal)>,
    service_fee: Decimal,
    payment_method: Option<PaymentMethod>,
    idempotency_key: Option<String>,
    placed_at: Option<DateTime<Utc>>,
}

impl OrderBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_cart(cart: &Cart) -> Self {
        Self {
            user_id: Some(cart.user_id.clone()),
            cart_vendor_id: cart.vendor_id.clone(),
            lines: cart.items.clone(),
            ..Self::default()
        }
    }

    pub fn customer(mut self, user_id: impl Into<String>) -> Self {
        self.user_id = Some(user_id.into());
        self
    }

    pub fn vendor(mut self, vendor_id: impl Into<String>) -> Self {
        self.vendor_id = Some(vendor_id.into());
        self
    }

    pub fn line(mut self, line: CartItem) -> Self {
        self.lines.push(line);
        self
    }

    /// Voucher code and the discount it was redeemed for.
    pub fn voucher(mut self, code: impl Into<String>, discount: Decimal) -> Self {
        self.voucher = Some((code.into(), discount));
        self
    }

    pub fn service_fee(mut self, fee: Decimal) -> Self {
        self.service_fee = fee;
        self
    }

    pub fn payment(mut self, method: PaymentMethod) -> Self {
        self.payment_method = Some(method);
        self
    }

    pub fn idempotency_key(mut self, key: Option<String>) -> Self {
        self.idempotency_key = key;
        self
    }

    pub fn placed_at(mut self, at: DateTime<Utc>) -> Self {
        self.placed_at = Some(at);
        self
    }

    pub fn build(self) -> Result<OrderCreate, BuildError> {
        let user_id = self.user_id.ok_or(BuildError::Missing("customer"))?;
        let vendor_id = self
            .vendor_id
            .or_else(|| self.cart_vendor_id.clone())
            .ok_or(BuildError::Missing("vendor"))?;
        let method = self.payment_method.ok_or(BuildError::Missing("payment method"))?;
        let placed_at = self.placed_at.ok_or(BuildError::Missing("placement time"))?;

        if self.lines.is_empty() {
            return Err(BuildError::EmptyCart);
        }
        if let Some(cart_vendor) = self.cart_vendor_id.filter(|cart| cart != &vendor_id) {
            return Err(BuildError::VendorMismatch {
                cart: cart_vendor,
                order: vendor_id,
            });
        }

        let items = self
            .lines
            .into_iter()
            .map(|line| {
                if line.quantity == 0 {
                    return Err(BuildError::InvalidQuantity {
                        menu_item_id: line.menu_item_id,
                        quantity: line.quantity,
                    });
                }
                let line_total = line.line_total();
                Ok(OrderItem {
                    menu_item_id: line.menu_item_id,
                    name: line.name,
                    unit_price: line.unit_price,
                    quantity: line.quantity,
                    instructions: line.instructions,
                    line_total,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        let subtotal: Decimal = items.iter().map(|item| item.line_total).sum();
        let (voucher_code, discount) = match self.voucher {
            Some((code, discount)) => (Some(code), discount),
            None => (None, Decimal::ZERO),
        };
        let quote = Quote::compute(subtotal, self.service_fee, discount);

        Ok(OrderCreate {
            user_id,
            vendor_id,
            items,
            subtotal: quote.subtotal,
            service_fee: quote.service_fee,
            discount: quote.discount,
            total: quote.total,
            voucher_code,
            payment: Payment::at_checkout(method, quote.total),
            idempotency_key: self.idempotency_key,
            placed_at,
        })
    }
}
