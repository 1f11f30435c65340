//! Customer, vendor and admin accounts.

pub mod entity;
pub mod error;

pub use error::*;
