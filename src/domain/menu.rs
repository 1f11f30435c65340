use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A dish or drink a vendor sells.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MenuItem {
    pub id: String,
    pub vendor_id: String,
    pub name: String,
    pub category: String,
    pub price: Decimal,
    pub is_available: bool,
}

#[derive(Debug, Clone)]
pub struct MenuItemCreate {
    pub vendor_id: String,
    pub name: String,
    pub category: String,
    pub price: Decimal,
}

#[derive(Debug, Clone, Default)]
pub struct MenuItemPatch {
    pub name: Option<String>,
    pub category: Option<String>,
    pub price: Option<Decimal>,
}
