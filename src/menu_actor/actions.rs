/// Custom actions for menu items beyond plain edits.
#[derive(Debug, Clone)]
pub enum MenuAction {
    /// Mark an item sold out or back in stock. Returns whether anything changed.
    SetAvailability(bool),
}
