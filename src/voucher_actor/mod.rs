//! Voucher codes: eligibility, discount quotes and usage accounting.

mod actions;
pub mod entity;
pub mod error;

pub use actions::*;
pub use error::*;
