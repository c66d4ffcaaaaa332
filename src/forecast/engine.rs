//! Projection engine: one entry point over both forecast strategies

use std::fmt;

use log::debug;
use serde::{Deserialize, Serialize};

use super::anchors::{log_interpolate, Anchor, AnchorSet};
use super::config::{ForecastConfig, ForecastError, Strategy};
use super::exponential::{calibrated_growth_rate, exponential_price};
use crate::date::YearMonth;
use crate::error::{ensure_positive, ValidationError};

/// A single projection query
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProjectionRequest {
    /// Reference price at `current_date`
    pub current_price: f64,
    pub current_date: YearMonth,
    pub target_date: YearMonth,
}

/// Which model produced a projected price
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProjectionMethod {
    /// Target equals the current date
    Identity,
    /// Calibrated single-rate exponential
    Exponential,
    /// Log interpolation toward or between anchors
    AnchorInterpolation,
    /// Terminal anchor rate carried past the last anchor
    AnchorExtrapolation,
    /// Held flat past the extrapolation horizon
    FlatBeyondHorizon,
}

/// Output of a projection
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProjectionResult {
    pub projected_price: f64,
    pub method: ProjectionMethod,
    /// The price ceiling bound the result
    pub capped: bool,
}

/// Projection engine over a validated forecast configuration
///
/// Pure: holds only static configuration, so one engine can serve any
/// number of callers.
#[derive(Debug, Clone)]
pub struct ProjectionEngine {
    config: ForecastConfig,
    anchors: AnchorSet,
}

impl ProjectionEngine {
    /// Validate the configuration and build the engine
    pub fn new(config: ForecastConfig) -> Result<Self, ForecastError> {
        let anchors = config.validate()?;
        debug!(
            "Projection engine: strategy={:?}, {} anchors, ceiling=${:.0}, max year {}",
            config.strategy,
            anchors.as_slice().len(),
            config.ceiling,
            config.max_year
        );
        Ok(Self { config, anchors })
    }

    pub fn config(&self) -> &ForecastConfig {
        &self.config
    }

    pub fn anchors(&self) -> &AnchorSet {
        &self.anchors
    }

    /// Project with the configured strategy
    pub fn project(&self, request: &ProjectionRequest) -> Result<ProjectionResult, ForecastError> {
        self.project_with(request, self.config.strategy)
    }

    /// Project with an explicit strategy
    pub fn project_with(
        &self,
        request: &ProjectionRequest,
        strategy: Strategy,
    ) -> Result<ProjectionResult, ForecastError> {
        self.validate_request(request)?;

        if request.target_date == request.current_date {
            return Ok(ProjectionResult {
                projected_price: request.current_price,
                method: ProjectionMethod::Identity,
                capped: false,
            });
        }

        let (raw, method) = match strategy {
            Strategy::Exponential if request.target_date <= self.exponential_limit() => (
                exponential_price(
                    request.current_price,
                    request.current_date,
                    request.target_date,
                    &self.config.calibration,
                ),
                ProjectionMethod::Exponential,
            ),
            Strategy::Exponential => {
                debug!(
                    "Target {} is past the exponential horizon {}, using anchor path",
                    request.target_date,
                    self.config.exponential_horizon()
                );
                self.anchor_path_price(request)
            }
            Strategy::AnchorInterpolation => self.anchor_path_price(request),
        };

        Ok(self.apply_ceiling(raw, method))
    }

    /// Growth-rate and anchor summary for display
    pub fn model_summary(&self, current_price: f64, current_date: YearMonth) -> ModelSummary {
        let calibration = self.config.calibration;
        let growth_rate = calibrated_growth_rate(current_price, current_date, &calibration);
        let years_to_calibration = current_date
            .years_until(&YearMonth::january(calibration.year))
            .max(0.0);

        ModelSummary {
            strategy: self.config.strategy,
            growth_rate,
            growth_rate_pct: growth_rate * 100.0,
            calibration,
            years_to_calibration,
            anchors: self.anchors.as_slice().to_vec(),
            ceiling: self.config.ceiling,
            max_year: self.config.max_year,
        }
    }

    fn validate_request(&self, request: &ProjectionRequest) -> Result<(), ForecastError> {
        ensure_positive("Current price", request.current_price)?;

        if request.current_price > self.config.ceiling {
            return Err(ValidationError::PriceAboveCeiling {
                price: request.current_price,
                ceiling: self.config.ceiling,
            }
            .into());
        }
        if request.target_date < request.current_date {
            return Err(ValidationError::TargetBeforeCurrent {
                current: request.current_date,
                target: request.target_date,
            }
            .into());
        }
        if request.target_date.year() > self.config.max_year {
            return Err(ForecastError::OutOfRange {
                target: request.target_date,
                max_year: self.config.max_year,
            });
        }
        Ok(())
    }

    fn exponential_limit(&self) -> YearMonth {
        YearMonth::january(self.config.exponential_horizon())
    }

    /// Price along the path now -> future anchors, with bounded extrapolation
    ///
    /// Anchors at or before the current date are skipped. An anchor priced
    /// below the running price is raised to it so the path never falls.
    fn anchor_path_price(&self, request: &ProjectionRequest) -> (f64, ProjectionMethod) {
        let now = request.current_date.fractional_year();
        let target = request.target_date.fractional_year();

        let mut path = vec![(now, request.current_price)];
        for anchor in self.anchors.iter().filter(|a| a.year as f64 > now) {
            let floor = path[path.len() - 1].1;
            path.push((anchor.year as f64, anchor.price.max(floor)));
        }

        for segment in path.windows(2) {
            let ((t0, p0), (t1, p1)) = (segment[0], segment[1]);
            if target <= t1 {
                return (
                    log_interpolate(t0, p0, t1, p1, target),
                    ProjectionMethod::AnchorInterpolation,
                );
            }
        }

        let (last_t, last_price) = path[path.len() - 1];
        let horizon = (self.anchors.last().year as f64 + self.config.extrapolation_years as f64).max(last_t);
        let rate = self.anchors.terminal_rate();

        if target <= horizon {
            (
                last_price * (rate * (target - last_t)).exp(),
                ProjectionMethod::AnchorExtrapolation,
            )
        } else {
            (
                last_price * (rate * (horizon - last_t)).exp(),
                ProjectionMethod::FlatBeyondHorizon,
            )
        }
    }

    fn apply_ceiling(&self, raw: f64, method: ProjectionMethod) -> ProjectionResult {
        let capped = raw > self.config.ceiling;
        if capped {
            debug!(
                "Projected ${:.0} exceeds ceiling ${:.0}, capping",
                raw, self.config.ceiling
            );
        }
        ProjectionResult {
            projected_price: raw.min(self.config.ceiling),
            method,
            capped,
        }
    }
}

/// Model parameters for display
#[derive(Debug, Clone, Serialize)]
pub struct ModelSummary {
    pub strategy: Strategy,
    /// Continuous annual rate to the calibration anchor
    pub growth_rate: f64,
    pub growth_rate_pct: f64,
    pub calibration: Anchor,
    pub years_to_calibration: f64,
    pub anchors: Vec<Anchor>,
    pub ceiling: f64,
    pub max_year: i32,
}

impl fmt::Display for ModelSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.strategy {
            Strategy::AnchorInterpolation => {
                writeln!(f, "Multi-anchor interpolation model")?;
                writeln!(f, "  Prices are interpolated in log space between anchor targets:")?;
            }
            Strategy::Exponential => {
                writeln!(f, "Calibrated exponential model")?;
                writeln!(
                    f,
                    "  {:.2}% annual growth to ${:.0} by {} ({:.2} years), anchor path afterwards:",
                    self.growth_rate_pct,
                    self.calibration.price,
                    self.calibration.year,
                    self.years_to_calibration
                )?;
            }
        }
        for anchor in &self.anchors {
            writeln!(f, "    {}: ${:.0}", anchor.year, anchor.price)?;
        }
        writeln!(f, "  Safety cap: ${:.0} per BTC", self.ceiling)?;
        write!(f, "  Projections available through {}", self.max_year)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::forecast::config::{DEFAULT_CALIBRATION, MAX_THEORETICAL_PRICE};
    use approx::assert_relative_eq;

    fn ym(year: i32, month: u32) -> YearMonth {
        YearMonth::new(year, month).unwrap()
    }

    fn engine() -> ProjectionEngine {
        ProjectionEngine::new(ForecastConfig::default()).unwrap()
    }

    fn request(price: f64, current: YearMonth, target: YearMonth) -> ProjectionRequest {
        ProjectionRequest {
            current_price: price,
            current_date: current,
            target_date: target,
        }
    }

    #[test]
    fn test_identity_at_zero_horizon() {
        let engine = engine();
        let now = ym(2025, 1);
        for strategy in [Strategy::Exponential, Strategy::AnchorInterpolation] {
            let result = engine.project_with(&request(112_000.0, now, now), strategy).unwrap();
            assert_eq!(result.projected_price, 112_000.0);
            assert_eq!(result.method, ProjectionMethod::Identity);
            assert!(!result.capped);
        }
    }

    #[test]
    fn test_exact_at_every_anchor() {
        let engine = engine();
        for anchor in engine.anchors().iter() {
            let req = request(112_000.0, ym(2025, 1), YearMonth::january(anchor.year));
            let result = engine.project_with(&req, Strategy::AnchorInterpolation).unwrap();
            assert_relative_eq!(result.projected_price, anchor.price, max_relative = 1e-12);
            assert!(!result.capped);
        }
    }

    #[test]
    fn test_both_strategies_agree_at_2030() {
        let engine = engine();
        let req = request(112_000.0, ym(2025, 1), ym(2030, 1));

        let a = engine.project_with(&req, Strategy::Exponential).unwrap();
        let b = engine.project_with(&req, Strategy::AnchorInterpolation).unwrap();

        assert_eq!(a.method, ProjectionMethod::Exponential);
        assert_eq!(b.method, ProjectionMethod::AnchorInterpolation);
        assert_relative_eq!(a.projected_price, 800_000.0, max_relative = 1e-9);
        assert_relative_eq!(b.projected_price, 800_000.0, max_relative = 1e-9);
    }

    #[test]
    fn test_2050_hits_last_anchor_uncapped() {
        let engine = engine();
        let result = engine
            .project(&request(112_000.0, ym(2025, 1), ym(2050, 1)))
            .unwrap();
        assert_relative_eq!(result.projected_price, 6_000_000.0, max_relative = 1e-9);
        assert!(!result.capped);
    }

    #[test]
    fn test_exponential_horizon_prevents_blow_up() {
        let engine = engine();
        let req = request(112_000.0, ym(2025, 10), ym(2050, 1));

        let unbounded = exponential_price(112_000.0, ym(2025, 10), ym(2050, 1), &DEFAULT_CALIBRATION);
        assert!(unbounded > 5.0e9);

        let result = engine.project_with(&req, Strategy::Exponential).unwrap();
        assert_eq!(result.method, ProjectionMethod::AnchorInterpolation);
        assert_relative_eq!(result.projected_price, 6_000_000.0, max_relative = 1e-9);
        assert!(result.projected_price <= MAX_THEORETICAL_PRICE);
    }

    #[test]
    fn test_anchor_path_is_monotonic() {
        let engine = engine();
        let now = ym(2025, 1);
        let mut previous = 112_000.0;

        for offset in 0..=now.months_until(&ym(2050, 12)) {
            let target = now.add_months(offset);
            let result = engine.project(&request(112_000.0, now, target)).unwrap();
            assert!(
                result.projected_price >= previous,
                "Price fell at {}: {} < {}",
                target,
                result.projected_price,
                previous
            );
            previous = result.projected_price;
        }
    }

    #[test]
    fn test_ceiling_applies_and_flags() {
        let config = ForecastConfig {
            max_year: 2100,
            extrapolation_years: 50,
            ..Default::default()
        };
        let engine = ProjectionEngine::new(config).unwrap();
        let now = ym(2025, 1);

        let mut saw_capped = false;
        for year in 2026..=2100 {
            let target = YearMonth::january(year);
            let result = engine.project(&request(112_000.0, now, target)).unwrap();
            assert!(result.projected_price <= MAX_THEORETICAL_PRICE);

            let raw = 6_000_000.0 * (engine.anchors().terminal_rate() * (year - 2050) as f64).exp();
            let should_cap = year > 2050 && raw > MAX_THEORETICAL_PRICE;
            assert_eq!(result.capped, should_cap, "capped flag wrong for {}", year);
            saw_capped |= result.capped;
        }
        assert!(saw_capped);
    }

    #[test]
    fn test_extrapolation_goes_flat_past_horizon() {
        let config = ForecastConfig {
            max_year: 2080,
            extrapolation_years: 5,
            ..Default::default()
        };
        let engine = ProjectionEngine::new(config).unwrap();
        let now = ym(2025, 1);

        let at_2053 = engine.project(&request(112_000.0, now, ym(2053, 1))).unwrap();
        assert_eq!(at_2053.method, ProjectionMethod::AnchorExtrapolation);
        assert!(at_2053.projected_price > 6_000_000.0);

        let at_2055 = engine.project(&request(112_000.0, now, ym(2055, 1))).unwrap();
        let at_2070 = engine.project(&request(112_000.0, now, ym(2070, 1))).unwrap();
        assert_eq!(at_2070.method, ProjectionMethod::FlatBeyondHorizon);
        assert_relative_eq!(at_2070.projected_price, at_2055.projected_price, max_relative = 1e-12);
    }

    #[test]
    fn test_rejects_target_before_current() {
        let result = engine().project(&request(112_000.0, ym(2025, 6), ym(2025, 5)));
        assert!(matches!(
            result,
            Err(ForecastError::Validation(ValidationError::TargetBeforeCurrent { .. }))
        ));
    }

    #[test]
    fn test_rejects_bad_prices() {
        let engine = engine();
        for price in [0.0, -5.0, f64::INFINITY] {
            let result = engine.project(&request(price, ym(2025, 1), ym(2030, 1)));
            assert!(matches!(result, Err(ForecastError::Validation(_))), "{} accepted", price);
        }
        let above = engine.project(&request(30_000_000.0, ym(2025, 1), ym(2030, 1)));
        assert!(matches!(
            above,
            Err(ForecastError::Validation(ValidationError::PriceAboveCeiling { .. }))
        ));
    }

    #[test]
    fn test_rejects_target_past_max_year() {
        let result = engine().project(&request(112_000.0, ym(2025, 1), ym(2051, 1)));
        assert!(matches!(result, Err(ForecastError::OutOfRange { max_year: 2050, .. })));
    }

    #[test]
    fn test_malformed_config_rejected_at_construction() {
        let config = ForecastConfig {
            anchors: vec![Anchor::new(2030, 800_000.0)],
            ..Default::default()
        };
        assert!(ProjectionEngine::new(config).is_err());
    }

    #[test]
    fn test_current_price_above_first_anchor_never_falls() {
        let engine = engine();
        let now = ym(2025, 1);
        let high = 1_000_000.0;

        let at_2030 = engine.project(&request(high, now, ym(2030, 1))).unwrap();
        assert_eq!(at_2030.projected_price, high);

        let at_2035 = engine.project(&request(high, now, ym(2035, 1))).unwrap();
        assert!(at_2035.projected_price >= high);
    }

    #[test]
    fn test_anchors_behind_current_date_are_skipped() {
        let engine = engine();
        // In 2035 only the 2040 and 2050 anchors are ahead
        let result = engine
            .project(&request(1_500_000.0, ym(2035, 1), ym(2040, 1)))
            .unwrap();
        assert_relative_eq!(result.projected_price, 2_500_000.0, max_relative = 1e-12);
    }

    #[test]
    fn test_model_summary_describes_anchors() {
        let summary = engine().model_summary(112_000.0, ym(2025, 1));
        assert_relative_eq!(summary.years_to_calibration, 5.0);
        assert!((summary.growth_rate_pct - 39.32).abs() < 0.01);

        let text = summary.to_string();
        assert!(text.contains("Multi-anchor interpolation model"));
        assert!(text.contains("2040: $2500000"));
        assert!(text.contains("Safety cap: $22000000"));
    }
}
