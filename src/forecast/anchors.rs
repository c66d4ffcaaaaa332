//! Price anchors and log-space interpolation between them

use serde::{Deserialize, Serialize};

use super::config::ForecastError;

/// A target price at January of a given year
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Anchor {
    pub year: i32,
    pub price: f64,
}

impl Anchor {
    pub const fn new(year: i32, price: f64) -> Self {
        Self { year, price }
    }
}

/// Validated anchor list: at least two entries, strictly increasing in
/// both year and price
#[derive(Debug, Clone, PartialEq)]
pub struct AnchorSet {
    anchors: Vec<Anchor>,
}

impl AnchorSet {
    pub fn new(anchors: Vec<Anchor>) -> Result<Self, ForecastError> {
        if anchors.len() < 2 {
            return Err(ForecastError::InvalidConfig(format!(
                "at least two anchors are required, got {}",
                anchors.len()
            )));
        }

        for anchor in &anchors {
            if !(anchor.price.is_finite() && anchor.price > 0.0) {
                return Err(ForecastError::InvalidConfig(format!(
                    "anchor price for {} must be positive, got {}",
                    anchor.year, anchor.price
                )));
            }
        }

        for pair in anchors.windows(2) {
            let (prev, next) = (pair[0], pair[1]);
            if next.year <= prev.year {
                return Err(ForecastError::InvalidConfig(format!(
                    "anchor years must be strictly increasing ({} then {})",
                    prev.year, next.year
                )));
            }
            if next.price <= prev.price {
                return Err(ForecastError::InvalidConfig(format!(
                    "anchor prices must be strictly increasing ({} at {} then {} at {})",
                    prev.price, prev.year, next.price, next.year
                )));
            }
        }

        Ok(Self { anchors })
    }

    pub fn as_slice(&self) -> &[Anchor] {
        &self.anchors
    }

    pub fn iter(&self) -> impl Iterator<Item = &Anchor> {
        self.anchors.iter()
    }

    pub fn last(&self) -> Anchor {
        self.anchors[self.anchors.len() - 1]
    }

    /// Continuous annual growth rate implied by the last two anchors
    pub fn terminal_rate(&self) -> f64 {
        let n = self.anchors.len();
        let (prev, last) = (self.anchors[n - 2], self.anchors[n - 1]);
        (last.price / prev.price).ln() / (last.year - prev.year) as f64
    }
}

/// Interpolate linearly in log-price between `(t0, p0)` and `(t1, p1)`
///
/// `ln P = ln P0 + (ln P1 - ln P0) * (t - t0) / (t1 - t0)`. Endpoints are
/// returned exactly.
pub fn log_interpolate(t0: f64, p0: f64, t1: f64, p1: f64, t: f64) -> f64 {
    if t <= t0 || t1 <= t0 {
        return p0;
    }
    if t >= t1 {
        return p1;
    }
    let fraction = (t - t0) / (t1 - t0);
    (p0.ln() + (p1.ln() - p0.ln()) * fraction).exp()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn default_anchors() -> Vec<Anchor> {
        vec![
            Anchor::new(2030, 800_000.0),
            Anchor::new(2040, 2_500_000.0),
            Anchor::new(2050, 6_000_000.0),
        ]
    }

    #[test]
    fn test_valid_set() {
        let set = AnchorSet::new(default_anchors()).unwrap();
        assert_eq!(set.as_slice().len(), 3);
        assert_eq!(set.as_slice()[0].year, 2030);
        assert_eq!(set.last().price, 6_000_000.0);
    }

    #[test]
    fn test_rejects_single_anchor() {
        let result = AnchorSet::new(vec![Anchor::new(2030, 800_000.0)]);
        assert!(matches!(result, Err(ForecastError::InvalidConfig(_))));
    }

    #[test]
    fn test_rejects_non_increasing_years() {
        let result = AnchorSet::new(vec![
            Anchor::new(2040, 800_000.0),
            Anchor::new(2040, 2_500_000.0),
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_rejects_non_increasing_prices() {
        let result = AnchorSet::new(vec![
            Anchor::new(2030, 800_000.0),
            Anchor::new(2040, 700_000.0),
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_rejects_non_positive_price() {
        let result = AnchorSet::new(vec![Anchor::new(2030, 0.0), Anchor::new(2040, 1.0)]);
        assert!(result.is_err());
    }

    #[test]
    fn test_terminal_rate() {
        let set = AnchorSet::new(default_anchors()).unwrap();
        let expected = (6_000_000.0_f64 / 2_500_000.0).ln() / 10.0;
        assert_relative_eq!(set.terminal_rate(), expected, max_relative = 1e-12);
    }

    #[test]
    fn test_log_interpolate_midpoint_is_geometric_mean() {
        let mid = log_interpolate(2030.0, 800_000.0, 2040.0, 2_500_000.0, 2035.0);
        let geometric_mean = (800_000.0_f64 * 2_500_000.0).sqrt();
        assert_relative_eq!(mid, geometric_mean, max_relative = 1e-12);
    }

    #[test]
    fn test_log_interpolate_endpoints_exact() {
        assert_eq!(log_interpolate(2030.0, 800_000.0, 2040.0, 2_500_000.0, 2030.0), 800_000.0);
        assert_eq!(log_interpolate(2030.0, 800_000.0, 2040.0, 2_500_000.0, 2040.0), 2_500_000.0);
    }

    #[test]
    fn test_log_interpolation_growth_diminishes_geometrically() {
        // Constant ratio per year within a segment
        let y1 = log_interpolate(2030.0, 800_000.0, 2040.0, 2_500_000.0, 2031.0);
        let y2 = log_interpolate(2030.0, 800_000.0, 2040.0, 2_500_000.0, 2032.0);
        assert_relative_eq!(y1 / 800_000.0, y2 / y1, max_relative = 1e-9);
    }
}
