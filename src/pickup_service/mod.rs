//! Collection-counter queue, one number per order per vendor per local day.

pub mod error;
pub mod messages;
pub mod service;

pub use error::*;
pub use messages::PickupRequest;
pub use service::PickupService;
