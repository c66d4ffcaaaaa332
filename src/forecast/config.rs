//! Forecast configuration, strategy selection and errors

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::anchors::{Anchor, AnchorSet};
use crate::date::YearMonth;
use crate::error::ValidationError;

/// Expert-consensus price targets
pub const DEFAULT_ANCHORS: [Anchor; 3] = [
    Anchor::new(2030, 800_000.0),
    Anchor::new(2040, 2_500_000.0),
    Anchor::new(2050, 6_000_000.0),
];

/// Anchor the exponential model is calibrated against
pub const DEFAULT_CALIBRATION: Anchor = Anchor::new(2030, 800_000.0);

/// Per-coin ceiling: all global wealth (~$100-300T) spread over 21M coins
pub const MAX_THEORETICAL_PRICE: f64 = 22_000_000.0;

pub const DEFAULT_MIN_YEAR: i32 = 2010;
pub const DEFAULT_MAX_YEAR: i32 = 2050;

/// Years past the last anchor the terminal rate may be carried
pub const DEFAULT_EXTRAPOLATION_YEARS: u32 = 10;

/// Projection model
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum Strategy {
    /// Single growth rate calibrated to one anchor, handed to the anchor
    /// path past its horizon
    Exponential,
    /// Log interpolation between anchors
    #[default]
    AnchorInterpolation,
}

/// Forecast errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ForecastError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("Target {target} is beyond the maximum projectable year {max_year}")]
    OutOfRange { target: YearMonth, max_year: i32 },

    #[error("Invalid forecast configuration: {0}")]
    InvalidConfig(String),
}

/// Static forecast settings, validated once when the engine is built
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ForecastConfig {
    /// Model used by `ProjectionEngine::project`
    pub strategy: Strategy,

    /// Ordered price anchors for interpolation
    pub anchors: Vec<Anchor>,

    /// Calibration point for the exponential model
    pub calibration: Anchor,

    /// Last year the exponential model is used; defaults to the calibration year
    pub exponential_horizon_year: Option<i32>,

    /// How far past the last anchor the terminal rate is carried before
    /// prices are held flat
    pub extrapolation_years: u32,

    /// Hard per-coin price ceiling
    pub ceiling: f64,

    /// Earliest supported year for historical data
    pub min_year: i32,

    /// Latest projectable year
    pub max_year: i32,
}

impl Default for ForecastConfig {
    fn default() -> Self {
        Self {
            strategy: Strategy::default(),
            anchors: DEFAULT_ANCHORS.to_vec(),
            calibration: DEFAULT_CALIBRATION,
            exponential_horizon_year: None,
            extrapolation_years: DEFAULT_EXTRAPOLATION_YEARS,
            ceiling: MAX_THEORETICAL_PRICE,
            min_year: DEFAULT_MIN_YEAR,
            max_year: DEFAULT_MAX_YEAR,
        }
    }
}

impl ForecastConfig {
    /// Check every setting, returning the validated anchor set
    pub fn validate(&self) -> Result<AnchorSet, ForecastError> {
        let anchors = AnchorSet::new(self.anchors.clone())?;

        if !(self.ceiling.is_finite() && self.ceiling > 0.0) {
            return Err(ForecastError::InvalidConfig(format!(
                "price ceiling must be positive, got {}",
                self.ceiling
            )));
        }
        if anchors.last().price > self.ceiling {
            return Err(ForecastError::InvalidConfig(format!(
                "anchor price {} at {} exceeds the ceiling {}",
                anchors.last().price,
                anchors.last().year,
                self.ceiling
            )));
        }
        if !(self.calibration.price.is_finite() && self.calibration.price > 0.0) {
            return Err(ForecastError::InvalidConfig(format!(
                "calibration price must be positive, got {}",
                self.calibration.price
            )));
        }
        if self.max_year < self.min_year {
            return Err(ForecastError::InvalidConfig(format!(
                "max year {} is before min year {}",
                self.max_year, self.min_year
            )));
        }

        Ok(anchors)
    }

    /// Last year the exponential model applies
    pub fn exponential_horizon(&self) -> i32 {
        self.exponential_horizon_year.unwrap_or(self.calibration.year)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = ForecastConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.exponential_horizon(), 2030);
        assert_eq!(config.strategy, Strategy::AnchorInterpolation);
    }

    #[test]
    fn test_rejects_non_positive_ceiling() {
        for ceiling in [0.0, -1.0, f64::NAN] {
            let config = ForecastConfig {
                ceiling,
                ..Default::default()
            };
            assert!(
                matches!(config.validate(), Err(ForecastError::InvalidConfig(_))),
                "ceiling {} should be rejected",
                ceiling
            );
        }
    }

    #[test]
    fn test_rejects_anchor_above_ceiling() {
        let config = ForecastConfig {
            ceiling: 5_000_000.0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_inverted_year_range() {
        let config = ForecastConfig {
            min_year: 2050,
            max_year: 2040,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_deserialize_partial_json_uses_defaults() {
        let config: ForecastConfig =
            serde_json::from_str(r#"{"strategy": "exponential", "max_year": 2060}"#).unwrap();
        assert_eq!(config.strategy, Strategy::Exponential);
        assert_eq!(config.max_year, 2060);
        assert_eq!(config.anchors, DEFAULT_ANCHORS.to_vec());
        assert_eq!(config.ceiling, MAX_THEORETICAL_PRICE);
    }
}
