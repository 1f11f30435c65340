use rust_decimal::Decimal;

use crate::actor_framework::Entity;
use crate::domain::{MenuItem, MenuItemCreate, MenuItemPatch};

use super::actions::MenuAction;
use super::error::MenuError;

fn validate_price(price: Decimal) -> Result<(), MenuError> {
    if price <= Decimal::ZERO {
        return Err(MenuError::ValidationError(format!("Price must be positive, got {price}")));
    }
    Ok(())
}

impl Entity for MenuItem {
    type Id = String;
    type CreateParams = MenuItemCreate;
    type Patch = MenuItemPatch;
    type Action = MenuAction;
    type ActionResult = bool;
    type Error = MenuError;

    fn id(&self) -> &String {
        &self.id
    }

    /// Creates an available menu item.
    ///
    /// # Errors
    /// Blank names and non-positive prices are rejected.
    fn from_create_params(id: String, params: MenuItemCreate) -> Result<Self, MenuError> {
        if params.name.trim().is_empty() {
            return Err(MenuError::ValidationError("Name required".to_string()));
        }
        validate_price(params.price)?;
        Ok(Self {
            id,
            vendor_id: params.vendor_id,
            name: params.name.trim().to_string(),
            category: params.category,
            price: params.price,
            is_available: true,
        })
    }

    /// Updates name, category and/or price. Placed orders keep their snapshot.
    fn on_update(&mut self, patch: MenuItemPatch) -> Result<(), MenuError> {
        if let Some(name) = patch.name {
            if name.trim().is_empty() {
                return Err(MenuError::ValidationError("Name required".to_string()));
            }
            self.name = name;
        }
        if let Some(category) = patch.category {
            self.category = category;
        }
        if let Some(price) = patch.price {
            validate_price(price)?;
            self.price = price;
        }
        Ok(())
    }

    fn handle_action(&mut self, action: MenuAction) -> Result<bool, MenuError> {
        match action {
            MenuAction::SetAvailability(available) => {
                let changed = self.is_available != available;
                self.is_available = available;
                Ok(changed)
            }
        }
    }
}
