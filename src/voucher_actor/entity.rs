use rust_decimal::Decimal;

use crate::actor_framework::Entity;
use crate::domain::{RedemptionContext, Voucher, VoucherCreate, VoucherPatch};
use crate::ordering::DiscountTerms;

use super::actions::{VoucherAction, VoucherActionResult};
use super::error::VoucherError;

impl Voucher {
    /// Every gate a voucher must pass before it discounts an order.
    pub fn check_eligibility(&self, ctx: &RedemptionContext) -> Result<(), VoucherError> {
        if !self.is_active {
            return Err(VoucherError::Inactive(self.code.clone()));
        }
        if ctx.at < self.valid_from {
            return Err(VoucherError::NotYetValid {
                code: self.code.clone(),
                valid_from: self.valid_from,
            });
        }
        if ctx.at > self.valid_until {
            return Err(VoucherError::Expired(self.code.clone()));
        }
        if self.vendor_id.as_ref().is_some_and(|v| *v != ctx.vendor_id) {
            return Err(VoucherError::WrongVendor(self.code.clone()));
        }
        if self.usage_limit.is_some_and(|limit| self.used_count >= limit) {
            return Err(VoucherError::UsageLimitReached(self.code.clone()));
        }
        if self
            .per_user_limit
            .is_some_and(|limit| self.redemptions_by(&ctx.user_id) >= limit)
        {
            return Err(VoucherError::UserLimitReached(self.code.clone()));
        }
        if let Some(min_order) = self.terms.min_order.filter(|min| ctx.subtotal < *min) {
            return Err(VoucherError::BelowMinimum {
                min_order,
                subtotal: ctx.subtotal,
            });
        }
        Ok(())
    }

    pub fn quote(&self, ctx: &RedemptionContext) -> Result<Decimal, VoucherError> {
        self.check_eligibility(ctx)?;
        Ok(self.terms.discount_for(ctx.subtotal))
    }
}

impl Entity for Voucher {
    type Id = String;
    type CreateParams = VoucherCreate;
    type Patch = VoucherPatch;
    type Action = VoucherAction;
    type ActionResult = VoucherActionResult;
    type Error = VoucherError;

    fn id(&self) -> &String {
        &self.id
    }

    fn from_create_params(id: String, params: VoucherCreate) -> Result<Self, VoucherError> {
        let code = Voucher::normalize_code(&params.code);
        if code.is_empty() {
            return Err(VoucherError::ValidationError("Code required".to_string()));
        }
        if params.valid_until < params.valid_from {
            return Err(VoucherError::ValidationError(
                "Validity window ends before it starts".to_string(),
            ));
        }
        let terms = DiscountTerms {
            rule: params.rule,
            min_order: params.min_order,
            max_discount: params.max_discount,
        };
        terms.validate()?;

        Ok(Self {
            id,
            code,
            vendor_id: params.vendor_id,
            terms,
            usage_limit: params.usage_limit,
            per_user_limit: params.per_user_limit,
            used_count: 0,
            redemptions: Default::default(),
            valid_from: params.valid_from,
            valid_until: params.valid_until,
            is_active: true,
        })
    }

    fn on_update(&mut self, patch: VoucherPatch) -> Result<(), VoucherError> {
        if let Some(limit) = patch.usage_limit {
            self.usage_limit = limit;
        }
        if let Some(limit) = patch.per_user_limit {
            self.per_user_limit = limit;
        }
        if let Some(valid_until) = patch.valid_until {
            if valid_until < self.valid_from {
                return Err(VoucherError::ValidationError(
                    "Validity window ends before it starts".to_string(),
                ));
            }
            self.valid_until = valid_until;
        }
        Ok(())
    }

    fn handle_action(&mut self, action: VoucherAction) -> Result<VoucherActionResult, VoucherError> {
        match action {
            VoucherAction::Preview(ctx) => Ok(VoucherActionResult::Preview(self.quote(&ctx)?)),
            VoucherAction::Redeem(ctx) => {
                let discount = self.quote(&ctx)?;
                self.used_count += 1;
                *self.redemptions.entry(ctx.user_id).or_insert(0) += 1;
                Ok(VoucherActionResult::Redeem(discount))
            }
            VoucherAction::Release { user_id } => match self.redemptions.get_mut(&user_id) {
                Some(count) if *count > 0 => {
                    *count -= 1;
                    self.used_count = self.used_count.saturating_sub(1);
                    Ok(VoucherActionResult::Release(true))
                }
                _ => Ok(VoucherActionResult::Release(false)),
            },
            VoucherAction::SetActive(active) => {
                let changed = self.is_active != active;
                self.is_active = active;
                Ok(VoucherActionResult::SetActive(changed))
            }
        }
    }

    fn unique_key(&self) -> Option<String> {
        Some(self.code.clone())
    }
}
