//! Price history series for charting
//!
//! Ranges up to `max_monthly_points` months are sampled monthly, longer
//! ranges every `quarterly_step_months`.

use serde::{Deserialize, Serialize};

use crate::date::YearMonth;

pub const MAX_MONTHLY_POINTS: u32 = 120;
pub const QUARTERLY_SAMPLE_MONTHS: u32 = 3;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChartConfig {
    pub max_monthly_points: u32,
    pub quarterly_step_months: u32,
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            max_monthly_points: MAX_MONTHLY_POINTS,
            quarterly_step_months: QUARTERLY_SAMPLE_MONTHS,
        }
    }
}

impl ChartConfig {
    /// Months between samples for an inclusive range of `total_months`
    pub fn step_for(&self, total_months: i64) -> u32 {
        if total_months <= self.max_monthly_points as i64 {
            1
        } else {
            self.quarterly_step_months.max(1)
        }
    }

    /// Sample dates from `start` to `end` inclusive of `start`
    ///
    /// `end` is included only when it falls on a step.
    pub fn sample_dates(&self, start: YearMonth, end: YearMonth) -> Vec<YearMonth> {
        if end < start {
            return Vec::new();
        }
        let total_months = start.months_until(&end) + 1;
        let step = self.step_for(total_months) as i64;

        (0..total_months)
            .step_by(step as usize)
            .map(|offset| start.add_months(offset))
            .collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ChartPoint {
    pub date: YearMonth,
    pub price: f64,
    pub portfolio_value: f64,
    pub projected: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartSeries {
    pub points: Vec<ChartPoint>,
    pub step_months: u32,
    pub has_projections: bool,
}

impl ChartSeries {
    pub fn new(points: Vec<ChartPoint>, step_months: u32) -> Self {
        let has_projections = points.iter().any(|p| p.projected);
        Self {
            points,
            step_months,
            has_projections,
        }
    }

    pub fn stats(&self) -> ChartStats {
        if self.points.is_empty() {
            return ChartStats::default();
        }

        let n = self.points.len() as f64;
        let prices = self.points.iter().map(|p| p.price);
        let values = self.points.iter().map(|p| p.portfolio_value);

        ChartStats {
            min_price: prices.clone().fold(f64::INFINITY, f64::min),
            max_price: prices.clone().fold(f64::NEG_INFINITY, f64::max),
            avg_price: prices.sum::<f64>() / n,
            min_portfolio: values.clone().fold(f64::INFINITY, f64::min),
            max_portfolio: values.clone().fold(f64::NEG_INFINITY, f64::max),
            avg_portfolio: values.sum::<f64>() / n,
            num_points: self.points.len(),
        }
    }
}

/// Summary statistics over a series
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct ChartStats {
    pub min_price: f64,
    pub max_price: f64,
    pub avg_price: f64,
    pub min_portfolio: f64,
    pub max_portfolio: f64,
    pub avg_portfolio: f64,
    pub num_points: usize,
}
