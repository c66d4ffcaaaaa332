//! Bitcoin investment calculator - historical and projected BTC position value
//!
//! This library provides:
//! - Historical monthly price lookup over a bundled table
//! - Future price projection (calibrated exponential or multi-anchor log interpolation, capped)
//! - Best-effort live price fetch with cache and static fallback
//! - Investment valuation and chart series for a presentation layer

pub mod calculator;
pub mod chart;
pub mod config;
pub mod date;
pub mod error;
pub mod forecast;
pub mod history;
pub mod investment;
pub mod market;

// Re-export commonly used types
pub use calculator::{Calculator, DatedPrice, PriceSourceKind};
pub use config::DashboardConfig;
pub use date::YearMonth;
pub use error::{Error, Result, ValidationError};
pub use forecast::{ForecastConfig, ProjectionEngine, ProjectionMethod, ProjectionRequest, ProjectionResult, Strategy};
pub use history::{GapPolicy, PriceTable};
pub use investment::{Amount, Comparison, InvestmentQuery, InvestmentSummary};
pub use market::{CachedPriceSource, CoinGeckoClient, PriceQuote, PriceSource};
