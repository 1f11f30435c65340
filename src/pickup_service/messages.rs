use chrono::{DateTime, Utc};
use tokio::sync::oneshot;

use super::error::PickupError;
use crate::domain::Pickup;
use crate::ordering::OrderStatus;

pub type ServiceResult<T, E> = std::result::Result<T, E>;
pub type ServiceResponse<T, E> = oneshot::Sender<ServiceResult<T, E>>;

#[derive(Debug)]
pub enum PickupRequest {
    /// Hand the order the next number of its vendor's local day.
    /// Assigning twice returns the first pickup.
    Assign {
        order_id: String,
        vendor_id: String,
        at: DateTime<Utc>,
        respond_to: ServiceResponse<Pickup, PickupError>,
    },
    Get {
        order_id: String,
        respond_to: ServiceResponse<Option<Pickup>, PickupError>,
    },
    /// Mirror a new order status onto the pickup.
    Advance {
        order_id: String,
        status: OrderStatus,
        respond_to: ServiceResponse<Pickup, PickupError>,
    },
    ActiveQueue {
        vendor_id: String,
        respond_to: ServiceResponse<Vec<Pickup>, PickupError>,
    },
    Shutdown,
}
