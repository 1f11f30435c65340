//! In-app notifications for customers and vendors.

mod actions;
pub mod entity;
pub mod error;

pub use actions::*;
pub use error::*;
