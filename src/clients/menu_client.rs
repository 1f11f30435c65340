use tracing::{debug, instrument, warn};

use crate::actor_framework::ResourceClient;
use crate::domain::{MenuItem, MenuItemCreate, MenuItemPatch};
use crate::menu_actor::{MenuAction, MenuError};
use crate::vendor_actor::VendorError;

use super::VendorClient;

#[derive(Clone)]
pub struct MenuClient {
    inner: ResourceClient<MenuItem>,
    vendors: VendorClient,
}

crate::impl_client_methods!(MenuClient, MenuItem, MenuError, menu_item);

impl MenuClient {
    pub fn new(inner: ResourceClient<MenuItem>, vendors: VendorClient) -> Self {
        Self { inner, vendors }
    }

    /// Adds an item to an existing vendor's menu.
    #[instrument(skip(self))]
    pub async fn create_menu_item(&self, params: MenuItemCreate) -> Result<String, MenuError> {
        debug!("Sending request");
        match self.vendors.fetch_vendor(params.vendor_id.clone()).await {
            Ok(_) => {}
            Err(VendorError::NotFound(vendor_id)) => {
                warn!(%vendor_id, "Menu item for unknown vendor");
                return Err(MenuError::ValidationError(format!("Unknown vendor {vendor_id}")));
            }
            Err(e) => return Err(MenuError::ActorCommunicationError(e.to_string())),
        }
        self.inner.create(params).await.map_err(|e| e.into_domain())
    }

    #[instrument(skip(self))]
    pub async fn update_menu_item(&self, id: String, patch: MenuItemPatch) -> Result<MenuItem, MenuError> {
        debug!("Sending request");
        self.inner.update(id, patch).await.map_err(|e| e.into_domain())
    }

    /// Returns whether the flag actually changed.
    #[instrument(skip(self))]
    pub async fn set_availability(&self, id: String, is_available: bool) -> Result<bool, MenuError> {
        debug!("Sending request");
        self.inner
            .perform_action(id, MenuAction::SetAvailability(is_available))
            .await
            .map_err(|e| e.into_domain())
    }

    #[instrument(skip(self))]
    pub async fn list_for_vendor(&self, vendor_id: String, available_only: bool) -> Result<Vec<MenuItem>, MenuError> {
        debug!("Sending request");
        let items = self.inner.list().await.map_err(|e| e.into_domain())?;
        Ok(items
            .into_iter()
            .filter(|item| item.vendor_id == vendor_id && (item.is_available || !available_only))
            .collect())
    }

    /// An item that exists, belongs to `vendor_id` and can be ordered right now.
    #[instrument(skip(self))]
    pub async fn orderable(&self, id: String, vendor_id: &str) -> Result<MenuItem, MenuError> {
        let item = self.fetch_menu_item(id).await?;
        if !item.is_available || item.vendor_id != vendor_id {
            return Err(MenuError::Unavailable(item.id));
        }
        Ok(item)
    }
}
