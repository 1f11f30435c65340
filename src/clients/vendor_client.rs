use tracing::{debug, instrument};

use crate::actor_framework::ResourceClient;
use crate::domain::{OperatingHours, Vendor, VendorCreate, VendorPatch};
use crate::vendor_actor::{VendorAction, VendorError};

#[derive(Clone)]
pub struct VendorClient {
    inner: ResourceClient<Vendor>,
}

crate::impl_basic_client!(VendorClient, Vendor, VendorError, vendor);

impl VendorClient {
    #[instrument(skip(self))]
    pub async fn create_vendor(&self, params: VendorCreate) -> Result<String, VendorError> {
        debug!("Sending request");
        self.inner.create(params).await.map_err(|e| e.into_domain())
    }

    #[instrument(skip(self))]
    pub async fn update_vendor(&self, id: String, patch: VendorPatch) -> Result<Vendor, VendorError> {
        debug!("Sending request");
        self.inner.update(id, patch).await.map_err(|e| e.into_domain())
    }

    #[instrument(skip(self))]
    pub async fn set_open(&self, id: String, is_open: bool) -> Result<Vendor, VendorError> {
        debug!("Sending request");
        self.inner
            .perform_action(id, VendorAction::SetOpen(is_open))
            .await
            .map_err(|e| e.into_domain())
    }

    #[instrument(skip(self, hours), fields(windows = hours.len()))]
    pub async fn replace_hours(&self, id: String, hours: Vec<OperatingHours>) -> Result<Vendor, VendorError> {
        debug!("Sending request");
        self.inner
            .perform_action(id, VendorAction::ReplaceHours(hours))
            .await
            .map_err(|e| e.into_domain())
    }
}
