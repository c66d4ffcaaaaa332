//! Month-granularity calendar dates used by the price table and projections

use chrono::{Datelike, Local, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ValidationError;

const MONTH_ABBREVIATIONS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// A calendar month (year, month 1-12)
///
/// Ordering is chronological. Prices are monthly averages so nothing finer
/// than a month is ever needed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "(i32, u32)", into = "(i32, u32)")]
pub struct YearMonth {
    year: i32,
    month: u32,
}

impl YearMonth {
    /// Create a year/month, rejecting months outside 1..=12
    pub fn new(year: i32, month: u32) -> Result<Self, ValidationError> {
        if !(1..=12).contains(&month) {
            return Err(ValidationError::InvalidMonth { year, month });
        }
        Ok(Self { year, month })
    }

    /// The current calendar month in local time
    pub fn current() -> Self {
        Self::from(Local::now().date_naive())
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    /// Absolute month index: `year * 12 + (month - 1)`
    pub fn month_index(&self) -> i64 {
        self.year as i64 * 12 + (self.month as i64 - 1)
    }

    /// Inverse of [`month_index`](Self::month_index)
    pub fn from_month_index(index: i64) -> Self {
        Self {
            year: index.div_euclid(12) as i32,
            month: index.rem_euclid(12) as u32 + 1,
        }
    }

    /// Signed number of months from `self` to `other`
    pub fn months_until(&self, other: &YearMonth) -> i64 {
        other.month_index() - self.month_index()
    }

    /// Fractional year position, e.g. 2025-07 -> 2025.5
    pub fn fractional_year(&self) -> f64 {
        self.year as f64 + (self.month as f64 - 1.0) / 12.0
    }

    /// Fractional years from `self` to `other` (negative if `other` is earlier)
    pub fn years_until(&self, other: &YearMonth) -> f64 {
        self.months_until(other) as f64 / 12.0
    }

    /// Move forward (or back, for negative values) by a number of months
    pub fn add_months(&self, months: i64) -> Self {
        Self::from_month_index(self.month_index() + months)
    }

    /// January of the given year
    pub fn january(year: i32) -> Self {
        Self { year, month: 1 }
    }

    /// Short label such as "Jun 2015"
    pub fn label(&self) -> String {
        format!("{} {}", MONTH_ABBREVIATIONS[(self.month - 1) as usize], self.year)
    }
}

impl From<NaiveDate> for YearMonth {
    fn from(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }
}

impl TryFrom<(i32, u32)> for YearMonth {
    type Error = ValidationError;

    fn try_from((year, month): (i32, u32)) -> Result<Self, Self::Error> {
        Self::new(year, month)
    }
}

impl From<YearMonth> for (i32, u32) {
    fn from(ym: YearMonth) -> Self {
        (ym.year, ym.month)
    }
}

impl fmt::Display for YearMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

/// Parses `YYYY-MM`
impl FromStr for YearMonth {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let malformed = || ValidationError::MalformedDate(s.to_string());
        let (year, month) = s.trim().split_once('-').ok_or_else(malformed)?;
        let year: i32 = year.parse().map_err(|_| malformed())?;
        let month: u32 = month.parse().map_err(|_| malformed())?;
        Self::new(year, month)
    }
}
