//! Single-rate exponential model calibrated to one anchor
//!
//! `price = current * e^(r * years)` with `r` chosen so the curve passes
//! through the calibration anchor. Unbounded on its own: the engine only
//! uses it up to its horizon.

use super::anchors::Anchor;
use crate::date::YearMonth;

/// Annual continuous growth rate that reaches `calibration` from the current point
///
/// `r = ln(anchor_price / current_price) / years_to_anchor`, measured to
/// January of the anchor year. A window of one year is used once the anchor
/// is no longer in the future.
pub fn calibrated_growth_rate(current_price: f64, current_date: YearMonth, calibration: &Anchor) -> f64 {
    let mut years_to_anchor = current_date.years_until(&YearMonth::january(calibration.year));
    if years_to_anchor <= 0.0 {
        years_to_anchor = 1.0;
    }
    (calibration.price / current_price).ln() / years_to_anchor
}

/// Unbounded exponential projection, no horizon and no ceiling
pub fn exponential_price(
    current_price: f64,
    current_date: YearMonth,
    target_date: YearMonth,
    calibration: &Anchor,
) -> f64 {
    let rate = calibrated_growth_rate(current_price, current_date, calibration);
    current_price * (rate * current_date.years_until(&target_date)).exp()
}
