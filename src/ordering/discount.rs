use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use thiserror::Error;

const HUNDRED: Decimal = Decimal::ONE_HUNDRED;

/// The two voucher shapes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DiscountRule {
    Fixed { amount: Decimal },
    Percentage { percent: Decimal },
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RuleError {
    #[error("fixed discount must be positive, got {0}")]
    NonPositiveAmount(Decimal),
    #[error("percentage must be within (0, 100], got {0}")]
    PercentOutOfRange(Decimal),
    #[error("{field} must not be negative, got {value}")]
    NegativeBound { field: &'static str, value: Decimal },
}

impl DiscountRule {
    pub fn validate(&self) -> Result<(), RuleError> {
        match *self {
            DiscountRule::Fixed { amount } if amount <= Decimal::ZERO => {
                Err(RuleError::NonPositiveAmount(amount))
            }
            DiscountRule::Percentage { percent } if percent <= Decimal::ZERO || percent > HUNDRED => {
                Err(RuleError::PercentOutOfRange(percent))
            }
            _ => Ok(()),
        }
    }

    /// Unclamped discount for a subtotal. Percentages round to cents.
    fn raw_amount(&self, subtotal: Decimal) -> Decimal {
        match *self {
            DiscountRule::Fixed { amount } => amount,
            DiscountRule::Percentage { percent } => (subtotal * percent / HUNDRED)
                .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero),
        }
    }
}

/// A rule together with the thresholds that bound it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiscountTerms {
    pub rule: DiscountRule,
    pub min_order: Option<Decimal>,
    pub max_discount: Option<Decimal>,
}

impl DiscountTerms {
    pub fn new(rule: DiscountRule) -> Self {
        Self {
            rule,
            min_order: None,
            max_discount: None,
        }
    }

    pub fn with_min_order(mut self, min_order: Decimal) -> Self {
        self.min_order = Some(min_order);
        self
    }

    pub fn with_max_discount(mut self, max_discount: Decimal) -> Self {
        self.max_discount = Some(max_discount);
        self
    }

    pub fn validate(&self) -> Result<(), RuleError> {
        self.rule.validate()?;
        for (field, bound) in [("min_order", self.min_order), ("max_discount", self.max_discount)] {
            if let Some(value) = bound.filter(|v| v.is_sign_negative()) {
                return Err(RuleError::NegativeBound { field, value });
            }
        }
        Ok(())
    }

    pub fn meets_minimum(&self, subtotal: Decimal) -> bool {
        self.min_order.map_or(true, |min| subtotal >= min)
    }

    /// Discount for `subtotal`: zero below the minimum order, never more
    /// than the subtotal, never more than the cap.
    pub fn discount_for(&self, subtotal: Decimal) -> Decimal {
        if subtotal <= Decimal::ZERO || !self.meets_minimum(subtotal) {
            return Decimal::ZERO;
        }

        let mut discount = self.rule.raw_amount(subtotal).max(Decimal::ZERO).min(subtotal);
        if let Some(cap) = self.max_discount {
            discount = discount.min(cap.max(Decimal::ZERO));
        }
        discount
    }
}
