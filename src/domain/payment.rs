use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    Cash,
    EWallet,
    Card,
}

impl PaymentMethod {
    /// Cash is settled at the counter; everything else is charged up front.
    pub fn settles_at_checkout(self) -> bool {
        !matches!(self, PaymentMethod::Cash)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    Pending,
    Paid,
    Refunded,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Payment {
    pub method: PaymentMethod,
    pub amount: Decimal,
    pub status: PaymentStatus,
}

impl Payment {
    pub fn at_checkout(method: PaymentMethod, amount: Decimal) -> Self {
        let status = if method.settles_at_checkout() {
            PaymentStatus::Paid
        } else {
            PaymentStatus::Pending
        };
        Self {
            method,
            amount,
            status,
        }
    }
}
