//! Live price source with cache and static fallback
//!
//! The fetch is a single best-effort call. Any failure is recovered by
//! [`PriceQuote::resolve`] with the configured fallback price, so the
//! calculation path never sees an upstream error.

mod cache;
mod coingecko;

pub use cache::CachedPriceSource;
pub use coingecko::{parse_simple_price, CoinGeckoClient};

use log::{info, warn};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::error::ensure_positive;

/// CoinGecko public API (no key required)
pub const DEFAULT_API_BASE_URL: &str = "https://api.coingecko.com/api/v3";
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_CACHE_TTL_SECS: u64 = 3600;
/// Used when the live price cannot be fetched
pub const DEFAULT_FALLBACK_PRICE: f64 = 112_000.0;

/// Live price errors
#[derive(Error, Debug)]
pub enum MarketError {
    /// Timeout, transport failure, non-success status or malformed body
    #[error("Live price unavailable: {0}")]
    UpstreamUnavailable(String),

    #[error("Failed to build HTTP client: {0}")]
    Client(#[from] reqwest::Error),
}

/// Anything that can report the current BTC/USD price
pub trait PriceSource: Send + Sync {
    fn current_price(&self) -> Result<f64, MarketError>;
}

/// A fixed price, for offline runs and tests
#[derive(Debug, Clone, Copy)]
pub struct FixedPrice(pub f64);

impl PriceSource for FixedPrice {
    fn current_price(&self) -> Result<f64, MarketError> {
        Ok(self.0)
    }
}

/// Live price source settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MarketConfig {
    pub base_url: String,
    pub timeout_secs: u64,
    pub cache_ttl_secs: u64,
    pub fallback_price: f64,
}

impl Default for MarketConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_BASE_URL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            cache_ttl_secs: DEFAULT_CACHE_TTL_SECS,
            fallback_price: DEFAULT_FALLBACK_PRICE,
        }
    }
}

/// Current price plus where it came from
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PriceQuote {
    pub price: f64,
    /// False when the fallback price was substituted
    pub live: bool,
    /// Non-blocking notice for the user when the fallback was used
    pub notice: Option<String>,
}

impl PriceQuote {
    /// Fetch from `source`, substituting `fallback` on any failure
    pub fn resolve(source: &dyn PriceSource, fallback: f64) -> Self {
        let fetched = source.current_price().and_then(|price| {
            ensure_positive("Live price", price)
                .map_err(|err| MarketError::UpstreamUnavailable(err.to_string()))
        });
        match fetched {
            Ok(price) => {
                info!("Live BTC price: ${:.2}", price);
                Self {
                    price,
                    live: true,
                    notice: None,
                }
            }
            Err(err) => {
                warn!("{}; using fallback price ${:.2}", err, fallback);
                Self {
                    price: fallback,
                    live: false,
                    notice: Some(format!("{}. Using fallback price ${:.0}.", err, fallback)),
                }
            }
        }
    }

    /// The fallback price without attempting a fetch
    pub fn offline(fallback: f64) -> Self {
        Self {
            price: fallback,
            live: false,
            notice: Some(format!("Offline mode: using fallback price ${:.0}.", fallback)),
        }
    }
}
