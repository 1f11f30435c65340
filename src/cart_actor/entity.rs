use crate::actor_framework::Entity;
use crate::domain::{Cart, CartCreate, CartItem};

use super::actions::CartAction;
use super::error::CartError;

fn check_quantity(quantity: u32, max: u32) -> Result<(), CartError> {
    if quantity == 0 || quantity > max {
        return Err(CartError::InvalidQuantity { quantity, max });
    }
    Ok(())
}

impl Cart {
    fn line_mut(&mut self, menu_item_id: &str) -> Result<&mut CartItem, CartError> {
        self.items
            .iter_mut()
            .find(|item| item.menu_item_id == menu_item_id)
            .ok_or_else(|| CartError::ItemNotInCart(menu_item_id.to_string()))
    }

    fn add(&mut self, vendor_id: String, item: CartItem, max: u32) -> Result<(), CartError> {
        match &self.vendor_id {
            Some(bound) if *bound != vendor_id => {
                return Err(CartError::VendorMismatch {
                    cart_vendor: bound.clone(),
                    item_vendor: vendor_id,
                });
            }
            _ => {}
        }
        check_quantity(item.quantity, max)?;

        match self.items.iter_mut().find(|line| line.menu_item_id == item.menu_item_id) {
            Some(line) => {
                let quantity = line.quantity.saturating_add(item.quantity);
                check_quantity(quantity, max)?;
                line.quantity = quantity;
                if item.instructions.is_some() {
                    line.instructions = item.instructions;
                }
            }
            None => self.items.push(item),
        }
        self.vendor_id = Some(vendor_id);
        Ok(())
    }

    fn remove(&mut self, menu_item_id: &str) -> Result<(), CartError> {
        let before = self.items.len();
        self.items.retain(|item| item.menu_item_id != menu_item_id);
        if self.items.len() == before {
            return Err(CartError::ItemNotInCart(menu_item_id.to_string()));
        }
        self.unbind_if_empty();
        Ok(())
    }

    fn unbind_if_empty(&mut self) {
        if self.items.is_empty() {
            self.vendor_id = None;
            self.voucher_code = None;
        }
    }
}

impl Entity for Cart {
    type Id = String;
    type CreateParams = CartCreate;
    type Patch = ();
    type Action = CartAction;
    type ActionResult = Cart;
    type Error = CartError;

    fn id(&self) -> &String {
        &self.id
    }

    fn from_create_params(id: String, params: CartCreate) -> Result<Self, CartError> {
        Ok(Self {
            id,
            user_id: params.user_id,
            vendor_id: None,
            items: Vec::new(),
            voucher_code: None,
        })
    }

    /// Carts are only changed through actions.
    fn on_update(&mut self, _patch: ()) -> Result<(), CartError> {
        Ok(())
    }

    fn handle_action(&mut self, action: CartAction) -> Result<Cart, CartError> {
        match action {
            CartAction::AddItem {
                vendor_id,
                item,
                max_quantity,
            } => self.add(vendor_id, item, max_quantity)?,
            CartAction::SetQuantity {
                menu_item_id,
                quantity: 0,
                ..
            } => self.remove(&menu_item_id)?,
            CartAction::SetQuantity {
                menu_item_id,
                quantity,
                max_quantity,
            } => {
                check_quantity(quantity, max_quantity)?;
                self.line_mut(&menu_item_id)?.quantity = quantity;
            }
            CartAction::SetInstructions {
                menu_item_id,
                instructions,
            } => {
                self.line_mut(&menu_item_id)?.instructions =
                    instructions.filter(|text| !text.trim().is_empty());
            }
            CartAction::RemoveItem { menu_item_id } => self.remove(&menu_item_id)?,
            CartAction::ApplyVoucher { code } => {
                if self.is_empty() {
                    return Err(CartError::Empty);
                }
                self.voucher_code = Some(code);
            }
            CartAction::RemoveVoucher => self.voucher_code = None,
            CartAction::Replace { vendor_id, items } => {
                self.items = items;
                self.vendor_id = Some(vendor_id);
                self.voucher_code = None;
                self.unbind_if_empty();
            }
            CartAction::Clear => {
                self.items.clear();
                self.unbind_if_empty();
            }
        }
        Ok(self.clone())
    }

    /// One cart per customer.
    fn unique_key(&self) -> Option<String> {
        Some(self.user_id.clone())
    }
}
