//! Typed handles over the actors. Every client is cheap to clone.

pub mod macros;

mod cart_client;
mod menu_client;
mod notification_client;
mod order_client;
mod pickup_client;
mod user_client;
mod vendor_client;
mod voucher_client;

pub use cart_client::*;
pub use menu_client::*;
pub use notification_client::*;
pub use order_client::*;
pub use pickup_client::*;
pub use user_client::*;
pub use vendor_client::*;
pub use voucher_client::*;
