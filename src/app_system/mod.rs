//! System orchestration, configuration, startup, and shutdown logic.

pub mod config;
pub mod error;
pub mod market_system;
pub mod tracing;

pub use config::*;
pub use error::*;
pub use market_system::*;
pub use self::tracing::*;
