use crate::actor_framework::Entity;
use crate::domain::{OperatingHours, Vendor, VendorCreate, VendorPatch};

use super::actions::VendorAction;
use super::error::VendorError;

fn normalize_name(name: &str) -> Result<String, VendorError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(VendorError::ValidationError("Name required".to_string()));
    }
    Ok(name.to_string())
}

fn validate_hours(hours: &[OperatingHours]) -> Result<(), VendorError> {
    match hours.iter().find(|h| h.opens_at == h.closes_at) {
        Some(h) => Err(VendorError::ValidationError(format!(
            "Empty opening window on {}",
            h.weekday
        ))),
        None => Ok(()),
    }
}

impl Entity for Vendor {
    type Id = String;
    type CreateParams = VendorCreate;
    type Patch = VendorPatch;
    type Action = VendorAction;
    type ActionResult = Vendor;
    type Error = VendorError;

    fn id(&self) -> &String {
        &self.id
    }

    /// New vendors start closed until they flip the switch.
    fn from_create_params(id: String, params: VendorCreate) -> Result<Self, VendorError> {
        let name = normalize_name(&params.name)?;
        validate_hours(&params.hours)?;
        Ok(Self {
            id,
            owner_id: params.owner_id,
            name,
            is_open: false,
            hours: params.hours,
        })
    }

    fn on_update(&mut self, patch: VendorPatch) -> Result<(), VendorError> {
        if let Some(name) = patch.name {
            self.name = normalize_name(&name)?;
        }
        Ok(())
    }

    fn handle_action(&mut self, action: VendorAction) -> Result<Vendor, VendorError> {
        match action {
            VendorAction::SetOpen(open) => self.is_open = open,
            VendorAction::ReplaceHours(hours) => {
                validate_hours(&hours)?;
                self.hours = hours;
            }
        }
        Ok(self.clone())
    }

    /// One storefront per owner account.
    fn unique_key(&self) -> Option<String> {
        Some(self.owner_id.clone())
    }
}
