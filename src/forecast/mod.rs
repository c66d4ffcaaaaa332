//! Future price projection: calibrated exponential and anchored log interpolation

mod anchors;
mod config;
mod engine;
mod exponential;

pub use anchors::{log_interpolate, Anchor, AnchorSet};
pub use config::{
    ForecastConfig, ForecastError, Strategy, DEFAULT_ANCHORS, DEFAULT_CALIBRATION,
    DEFAULT_EXTRAPOLATION_YEARS, DEFAULT_MAX_YEAR, DEFAULT_MIN_YEAR, MAX_THEORETICAL_PRICE,
};
pub use engine::{ModelSummary, ProjectionEngine, ProjectionMethod, ProjectionRequest, ProjectionResult};
pub use exponential::{calibrated_growth_rate, exponential_price};
