//! Error types shared across the calculator

use thiserror::Error;

use crate::config::ConfigError;
use crate::date::YearMonth;
use crate::forecast::ForecastError;
use crate::history::{LookupError, TableError};
use crate::market::MarketError;

/// Result type for calculator operations
pub type Result<T> = std::result::Result<T, Error>;

/// Bad user input or bad request fields
///
/// These carry a message fit to show the end user as-is.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("Invalid month {month} for year {year}: month must be between 1 and 12")]
    InvalidMonth { year: i32, month: u32 },

    #[error("Malformed date '{0}': expected YYYY-MM")]
    MalformedDate(String),

    #[error("{what} must be a positive number, got {value}")]
    NonPositive { what: &'static str, value: f64 },

    #[error("BTC amount {amount} is outside the allowed range {min}..={max}")]
    BtcAmountOutOfRange { amount: f64, min: f64, max: f64 },

    #[error("Target date {target} is before the current date {current}")]
    TargetBeforeCurrent { current: YearMonth, target: YearMonth },

    #[error("Future comparison date {target} must be after the current month {current}")]
    TargetNotInFuture { current: YearMonth, target: YearMonth },

    #[error("Purchase date {purchase} is after the current month {current}")]
    PurchaseInFuture { current: YearMonth, purchase: YearMonth },

    #[error("Current price {price} exceeds the price ceiling {ceiling}")]
    PriceAboveCeiling { price: f64, ceiling: f64 },
}

/// Top-level error for the calculator API
#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Lookup(#[from] LookupError),

    #[error(transparent)]
    Table(#[from] TableError),

    #[error(transparent)]
    Forecast(#[from] ForecastError),

    #[error(transparent)]
    Market(#[from] MarketError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Check that a value is finite and strictly positive
pub(crate) fn ensure_positive(what: &'static str, value: f64) -> std::result::Result<f64, ValidationError> {
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(ValidationError::NonPositive { what, value })
    }
}
