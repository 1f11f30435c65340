use rust_decimal::Decimal;
use tracing::{debug, info, instrument};

use crate::actor_framework::ResourceClient;
use crate::domain::{RedemptionContext, Voucher, VoucherCreate, VoucherPatch};
use crate::voucher_actor::{VoucherAction, VoucherActionResult, VoucherError};

#[derive(Clone)]
pub struct VoucherClient {
    inner: ResourceClient<Voucher>,
}

crate::impl_basic_client!(VoucherClient, Voucher, VoucherError, voucher);

fn unexpected(result: VoucherActionResult) -> VoucherError {
    VoucherError::ActorCommunicationError(format!("Unexpected result: {result:?}"))
}

impl VoucherClient {
    #[instrument(skip(self))]
    pub async fn create_voucher(&self, params: VoucherCreate) -> Result<String, VoucherError> {
        debug!("Sending request");
        self.inner.create(params).await.map_err(|e| e.into_domain())
    }

    #[instrument(skip(self))]
    pub async fn update_voucher(&self, id: String, patch: VoucherPatch) -> Result<Voucher, VoucherError> {
        debug!("Sending request");
        self.inner.update(id, patch).await.map_err(|e| e.into_domain())
    }

    /// Case-insensitive lookup by code.
    #[instrument(skip(self))]
    pub async fn find_by_code(&self, code: &str) -> Result<Voucher, VoucherError> {
        debug!("Sending request");
        let wanted = Voucher::normalize_code(code);
        self.inner
            .list()
            .await
            .map_err(|e| e.into_domain())?
            .into_iter()
            .find(|voucher| voucher.code == wanted)
            .ok_or(VoucherError::NotFound(wanted))
    }

    async fn act(&self, code: &str, action: VoucherAction) -> Result<VoucherActionResult, VoucherError> {
        let voucher = self.find_by_code(code).await?;
        self.inner
            .perform_action(voucher.id, action)
            .await
            .map_err(|e| e.into_domain())
    }

    /// Discount the voucher would give right now, without using it up.
    #[instrument(skip(self))]
    pub async fn preview(&self, code: &str, ctx: RedemptionContext) -> Result<Decimal, VoucherError> {
        match self.act(code, VoucherAction::Preview(ctx)).await? {
            VoucherActionResult::Preview(discount) => Ok(discount),
            other => Err(unexpected(other)),
        }
    }

    /// Consume one use and return the discount, or fail without consuming.
    #[instrument(skip(self))]
    pub async fn redeem(&self, code: &str, ctx: RedemptionContext) -> Result<Decimal, VoucherError> {
        match self.act(code, VoucherAction::Redeem(ctx)).await? {
            VoucherActionResult::Redeem(discount) => {
                info!(%discount, "Voucher redeemed");
                Ok(discount)
            }
            other => Err(unexpected(other)),
        }
    }

    #[instrument(skip(self))]
    pub async fn release(&self, code: &str, user_id: String) -> Result<bool, VoucherError> {
        match self.act(code, VoucherAction::Release { user_id }).await? {
            VoucherActionResult::Release(released) => Ok(released),
            other => Err(unexpected(other)),
        }
    }

    #[instrument(skip(self))]
    pub async fn set_active(&self, code: &str, is_active: bool) -> Result<bool, VoucherError> {
        match self.act(code, VoucherAction::SetActive(is_active)).await? {
            VoucherActionResult::SetActive(changed) => Ok(changed),
            other => Err(unexpected(other)),
        }
    }
}
