use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Money breakdown shown at the cart and frozen on the order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Quote {
    pub subtotal: Decimal,
    pub service_fee: Decimal,
    pub discount: Decimal,
    pub total: Decimal,
}

impl Quote {
    /// `total = subtotal + service_fee - discount`. The discount is clamped
    /// to the subtotal so the fee is always charged in full.
    pub fn compute(subtotal: Decimal, service_fee: Decimal, discount: Decimal) -> Self {
        let discount = discount.max(Decimal::ZERO).min(subtotal.max(Decimal::ZERO));
        let total = (subtotal + service_fee - discount).max(Decimal::ZERO);
        Self {
            subtotal,
            service_fee,
            discount,
            total,
        }
    }
}
