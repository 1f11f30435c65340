pub mod cart;
pub mod menu;
pub mod notification;
pub mod order;
pub mod payment;
pub mod pickup;
pub mod user;
pub mod vendor;
pub mod voucher;

pub use cart::*;
pub use menu::*;
pub use notification::*;
pub use order::*;
pub use payment::*;
pub use pickup::*;
pub use user::*;
pub use vendor::*;
pub use voucher::*;
