use std::collections::HashMap;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::ordering::{DiscountRule, DiscountTerms};

/// A discount code with usage limits and a validity window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Voucher {
    pub id: String,
    /// Stored upper-cased; lookups are case-insensitive.
    pub code: String,
    /// `None` means the voucher is valid at every vendor.
    pub vendor_id: Option<String>,
    pub terms: DiscountTerms,
    pub usage_limit: Option<u32>,
    pub per_user_limit: Option<u32>,
    pub used_count: u32,
    pub redemptions: HashMap<String, u32>,
    pub valid_from: DateTime<Utc>,
    pub valid_until: DateTime<Utc>,
    pub is_active: bool,
}

impl Voucher {
    pub fn normalize_code(code: &str) -> String {
        code.trim().to_uppercase()
    }

    pub fn redemptions_by(&self, user_id: &str) -> u32 {
        self.redemptions.get(user_id).copied().unwrap_or(0)
    }
}

#[derive(Debug, Clone)]
pub struct VoucherCreate {
    pub code: String,
    pub vendor_id: Option<String>,
    pub rule: DiscountRule,
    pub min_order: Option<Decimal>,
    pub max_discount: Option<Decimal>,
    pub usage_limit: Option<u32>,
    pub per_user_limit: Option<u32>,
    pub valid_from: DateTime<Utc>,
    pub valid_until: DateTime<Utc>,
}

#[derive(Debug, Clone, Default)]
pub struct VoucherPatch {
    pub usage_limit: Option<Option<u32>>,
    pub per_user_limit: Option<Option<u32>>,
    pub valid_until: Option<DateTime<Utc>>,
}

/// Everything a voucher needs to know to decide whether it applies.
#[derive(Debug, Clone)]
pub struct RedemptionContext {
    pub user_id: String,
    pub vendor_id: String,
    pub subtotal: Decimal,
    pub at: DateTime<Utc>,
}
