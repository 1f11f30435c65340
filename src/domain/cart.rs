use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A mutable cart line. Price and name are captured when the item is added.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartItem {
    pub menu_item_id: String,
    pub name: String,
    pub unit_price: Decimal,
    pub quantity: u32,
    pub instructions: Option<String>,
}

impl CartItem {
    pub fn line_total(&self) -> Decimal {
        self.unit_price * Decimal::from(self.quantity)
    }
}

/// A customer's cart. Bound to at most one vendor at a time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cart {
    pub id: String,
    pub user_id: String,
    pub vendor_id: Option<String>,
    pub items: Vec<CartItem>,
    pub voucher_code: Option<String>,
}

impl Cart {
    pub fn subtotal(&self) -> Decimal {
        self.items.iter().map(CartItem::line_total).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn item(&self, menu_item_id: &str) -> Option<&CartItem> {
        self.items.iter().find(|item| item.menu_item_id == menu_item_id)
    }
}

#[derive(Debug, Clone)]
pub struct CartCreate {
    pub user_id: String,
}
