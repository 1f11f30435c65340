use crate::domain::CartItem;

/// Cart edits. Every action answers with the cart as it stands afterwards.
#[derive(Debug, Clone)]
pub enum CartAction {
    /// Add a line, or bump the quantity of an existing line for the same item.
    AddItem {
        vendor_id: String,
        item: CartItem,
        max_quantity: u32,
    },
    /// A quantity of zero removes the line.
    SetQuantity {
        menu_item_id: String,
        quantity: u32,
        max_quantity: u32,
    },
    SetInstructions {
        menu_item_id: String,
        instructions: Option<String>,
    },
    RemoveItem {
        menu_item_id: String,
    },
    ApplyVoucher {
        code: String,
    },
    RemoveVoucher,
    /// Swap the whole content, used by reorder.
    Replace {
        vendor_id: String,
        items: Vec<CartItem>,
    },
    Clear,
}
