use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::ordering::PickupStatus;

/// Collection-counter record, one per order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pickup {
    pub order_id: String,
    pub vendor_id: String,
    pub queue_number: u32,
    /// Local calendar day the number belongs to.
    pub queue_date: NaiveDate,
    pub status: PickupStatus,
    /// Set when the underlying order is cancelled; the pickup leaves the active queue.
    pub withdrawn: bool,
    pub assigned_at: DateTime<Utc>,
}

impl Pickup {
    pub fn is_active(&self) -> bool {
        !self.withdrawn && self.status != PickupStatus::Collected
    }
}
