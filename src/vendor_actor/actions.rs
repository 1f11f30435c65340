use crate::domain::OperatingHours;

/// Operations a vendor performs on its own storefront.
#[derive(Debug, Clone)]
pub enum VendorAction {
    /// Manual open/closed switch, independent of published hours.
    SetOpen(bool),
    /// Replace the whole weekly schedule.
    ReplaceHours(Vec<OperatingHours>),
}
