//! Dashboard configuration
//!
//! Defaults live in code. A JSON file may override any subset of keys, and
//! `BTC_*` environment variables override individual values on top of that.
//! Everything is validated once at startup.

use std::fs;
use std::path::{Path, PathBuf};

use clap::ValueEnum;
use log::info;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::chart::ChartConfig;
use crate::date::YearMonth;
use crate::forecast::{ForecastConfig, ForecastError, Strategy};
use crate::history::{GapPolicy, PriceTable, TableError};
use crate::investment::InputLimits;
use crate::market::MarketConfig;

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid value '{value}' for environment variable {key}")]
    InvalidEnv { key: String, value: String },

    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: &'static str, message: String },

    #[error(transparent)]
    Forecast(#[from] ForecastError),
}

/// All static settings
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    pub forecast: ForecastConfig,
    pub market: MarketConfig,
    pub limits: InputLimits,
    pub chart: ChartConfig,
    pub gap_policy: GapPolicy,
    /// CSV override for the bundled historical table
    pub history_csv: Option<PathBuf>,
}

impl DashboardConfig {
    /// Read a JSON config file; missing keys keep their defaults
    pub fn from_json_path(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = serde_json::from_str(&text)?;
        info!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Apply `BTC_*` overrides from the process environment
    pub fn apply_env(&mut self) -> Result<(), ConfigError> {
        self.apply_vars(|key| std::env::var(key).ok())
    }

    /// Apply overrides from any key lookup
    pub fn apply_vars<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(v) = lookup("BTC_STRATEGY") {
            self.forecast.strategy =
                Strategy::from_str(&v, true).map_err(|_| invalid_env("BTC_STRATEGY", &v))?;
        }
        if let Some(v) = lookup("BTC_MAX_YEAR") {
            self.forecast.max_year = parse_env("BTC_MAX_YEAR", &v)?;
        }
        if let Some(v) = lookup("BTC_PRICE_CEILING") {
            self.forecast.ceiling = parse_env("BTC_PRICE_CEILING", &v)?;
        }
        if let Some(v) = lookup("BTC_EXTRAPOLATION_YEARS") {
            self.forecast.extrapolation_years = parse_env("BTC_EXTRAPOLATION_YEARS", &v)?;
        }
        if let Some(v) = lookup("BTC_FALLBACK_PRICE") {
            self.market.fallback_price = parse_env("BTC_FALLBACK_PRICE", &v)?;
        }
        if let Some(v) = lookup("BTC_API_BASE_URL") {
            self.market.base_url = v;
        }
        if let Some(v) = lookup("BTC_API_TIMEOUT_SECS") {
            self.market.timeout_secs = parse_env("BTC_API_TIMEOUT_SECS", &v)?;
        }
        if let Some(v) = lookup("BTC_CACHE_TTL_SECS") {
            self.market.cache_ttl_secs = parse_env("BTC_CACHE_TTL_SECS", &v)?;
        }
        if let Some(v) = lookup("BTC_GAP_POLICY") {
            self.gap_policy =
                GapPolicy::from_str(v.trim(), true).map_err(|_| invalid_env("BTC_GAP_POLICY", &v))?;
        }
        if let Some(v) = lookup("BTC_HISTORY_CSV") {
            self.history_csv = Some(PathBuf::from(v));
        }
        Ok(())
    }

    /// Check all settings
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.forecast.validate()?;

        if !(self.market.fallback_price.is_finite() && self.market.fallback_price > 0.0) {
            return Err(ConfigError::InvalidValue {
                key: "market.fallback_price",
                message: format!("must be positive, got {}", self.market.fallback_price),
            });
        }
        if self.market.fallback_price > self.forecast.ceiling {
            return Err(ConfigError::InvalidValue {
                key: "market.fallback_price",
                message: format!("exceeds the price ceiling {}", self.forecast.ceiling),
            });
        }
        if self.market.timeout_secs == 0 {
            return Err(ConfigError::InvalidValue {
                key: "market.timeout_secs",
                message: "must be at least one second".to_string(),
            });
        }

        let limits = &self.limits;
        if !(limits.min_btc > 0.0 && limits.min_btc <= limits.default_btc && limits.default_btc <= limits.max_btc) {
            return Err(ConfigError::InvalidValue {
                key: "limits",
                message: format!(
                    "expected 0 < min ({}) <= default ({}) <= max ({})",
                    limits.min_btc, limits.default_btc, limits.max_btc
                ),
            });
        }

        if self.chart.max_monthly_points == 0 || self.chart.quarterly_step_months == 0 {
            return Err(ConfigError::InvalidValue {
                key: "chart",
                message: "sampling limits must be positive".to_string(),
            });
        }

        Ok(())
    }

    /// The historical table: CSV override if configured, bundled data otherwise
    ///
    /// Points before January of `forecast.min_year` are dropped.
    pub fn load_table(&self) -> Result<PriceTable, TableError> {
        let table = match &self.history_csv {
            Some(path) => PriceTable::from_csv_path(path, self.gap_policy)?,
            None => PriceTable::bundled(self.gap_policy)?,
        };
        table.starting_from(YearMonth::january(self.forecast.min_year))
    }
}

fn invalid_env(key: &str, value: &str) -> ConfigError {
    ConfigError::InvalidEnv {
        key: key.to_string(),
        value: value.to_string(),
    }
}

fn parse_env<T: std::str::FromStr>(key: &str, value: &str) -> Result<T, ConfigError> {
    value.trim().parse().map_err(|_| invalid_env(key, value))
}
