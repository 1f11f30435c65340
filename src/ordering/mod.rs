//! Pure ordering rules: lifecycle, discounts, pricing, checkout assembly and queue numbering.
//!
//! Nothing in here talks to an actor; the clients call into these functions.

pub mod builder;
pub mod discount;
pub mod pricing;
pub mod queue;
pub mod status;

pub use builder::*;
pub use discount::*;
pub use pricing::*;
pub use queue::*;
pub use status::*;
