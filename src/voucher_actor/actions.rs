use rust_decimal::Decimal;

use crate::domain::RedemptionContext;

/// Custom actions for vouchers.
#[derive(Debug, Clone)]
pub enum VoucherAction {
    /// Check eligibility and compute the discount without consuming a use.
    Preview(RedemptionContext),
    /// Check eligibility, compute the discount and consume one use, atomically.
    Redeem(RedemptionContext),
    /// Give back one use previously consumed by the customer.
    Release { user_id: String },
    SetActive(bool),
}

/// Results from VoucherActions - variants match 1:1 with VoucherAction
#[derive(Debug, Clone, PartialEq)]
pub enum VoucherActionResult {
    Preview(Decimal),
    Redeem(Decimal),
    /// `false` when the customer had nothing to give back.
    Release(bool),
    SetActive(bool),
}
