use std::{env, fmt::Display, str::FromStr};

use chrono::{FixedOffset, Offset, Utc};
use rust_decimal::Decimal;
use thiserror::Error;
use tracing::{info, warn};

#[derive(Debug, Clone, Error, PartialEq)]
pub enum ConfigError {
    #[error("Invalid {key} value {value:?}: {reason}")]
    Invalid {
        key: &'static str,
        value: String,
        reason: String,
    },
    #[error("{key} out of range: {reason}")]
    OutOfRange { key: &'static str, reason: String },
}

/// Business knobs shared by the cart and checkout paths.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MarketSettings {
    /// Flat fee added to every order.
    pub service_fee: Decimal,
    /// Offset used for opening hours and queue days.
    pub utc_offset: FixedOffset,
    pub max_item_quantity: u32,
}

impl Default for MarketSettings {
    fn default() -> Self {
        Self {
            service_fee: Decimal::new(200, 2),
            utc_offset: Utc.fix(),
            max_item_quantity: 50,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub channel_buffer: usize,
    pub market: MarketSettings,
}

impl Config {
    pub fn load() -> Result<Self, ConfigError> {
        Self::from_source(|key| env::var(key).ok())
    }

    /// Build from any key lookup; missing keys fall back to their default.
    pub fn from_source(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let channel_buffer: usize = try_load(&lookup, "MARKET_CHANNEL_BUFFER", "100")?;
        if channel_buffer == 0 {
            return Err(ConfigError::OutOfRange {
                key: "MARKET_CHANNEL_BUFFER",
                reason: "must be at least 1".to_string(),
            });
        }

        let service_fee: Decimal = try_load(&lookup, "MARKET_SERVICE_FEE", "2.00")?;
        if service_fee.is_sign_negative() {
            return Err(ConfigError::OutOfRange {
                key: "MARKET_SERVICE_FEE",
                reason: "cannot be negative".to_string(),
            });
        }

        let offset_minutes: i32 = try_load(&lookup, "MARKET_UTC_OFFSET_MINUTES", "0")?;
        let utc_offset = offset_minutes
            .checked_mul(60)
            .and_then(FixedOffset::east_opt)
            .ok_or_else(|| ConfigError::OutOfRange {
                key: "MARKET_UTC_OFFSET_MINUTES",
                reason: format!("{offset_minutes} is not a valid offset"),
            })?;

        let max_item_quantity: u32 = try_load(&lookup, "MARKET_MAX_ITEM_QUANTITY", "50")?;
        if max_item_quantity == 0 {
            return Err(ConfigError::OutOfRange {
                key: "MARKET_MAX_ITEM_QUANTITY",
                reason: "must be at least 1".to_string(),
            });
        }

        Ok(Self {
            channel_buffer,
            market: MarketSettings {
                service_fee,
                utc_offset,
                max_item_quantity,
            },
        })
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            channel_buffer: 100,
            market: MarketSettings::default(),
        }
    }
}

fn try_load<T: FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &'static str,
    default: &str,
) -> Result<T, ConfigError>
where
    T::Err: Display,
{
    let value = lookup(key).unwrap_or_else(|| {
        info!("{key} not set, using default: {default}");
        default.to_string()
    });
    value.trim().parse().map_err(|e: T::Err| {
        warn!("Invalid {key} value: {e}");
        ConfigError::Invalid {
            key,
            value,
            reason: e.to_string(),
        }
    })
}
