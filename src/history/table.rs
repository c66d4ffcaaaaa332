//! Monthly price table with an explicit gap policy

use std::collections::BTreeMap;

use clap::ValueEnum;
use log::debug;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::bundled::BUNDLED_PRICES;
use crate::date::YearMonth;
use crate::error::ValidationError;

/// How a lookup resolves a month that has no recorded price
///
/// One policy applies to every lookup on a table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum GapPolicy {
    /// Use the nearest earlier recorded month (approximate monthly average)
    #[default]
    #[value(alias = "nearest_earlier")]
    NearestEarlier,
    /// Only recorded months resolve; gaps are `NotFound`
    Exact,
}

/// A recorded monthly average price in USD
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    pub date: YearMonth,
    pub price: f64,
}

/// Lookup failures
#[derive(Error, Debug, Clone, PartialEq)]
pub enum LookupError {
    /// Date outside the first..=last recorded months
    #[error("No price data for {date}: supported range is {first} to {last}")]
    OutOfRange {
        date: YearMonth,
        first: YearMonth,
        last: YearMonth,
    },

    /// Gap inside the supported range under `GapPolicy::Exact`
    #[error("No recorded price for {0}")]
    NotFound(YearMonth),
}

/// Errors building a price table
#[derive(Error, Debug)]
pub enum TableError {
    #[error("Price table has no entries")]
    Empty,

    #[error("Duplicate price entry for {0}")]
    Duplicate(YearMonth),

    #[error("Invalid price {price} for {date}: prices must be positive")]
    InvalidPrice { date: YearMonth, price: f64 },

    #[error(transparent)]
    Invalid(#[from] ValidationError),

    #[error("Failed to read price table: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse price table CSV: {0}")]
    Csv(#[from] csv::Error),
}

/// Immutable (year, month) -> price mapping
#[derive(Debug, Clone)]
pub struct PriceTable {
    prices: BTreeMap<YearMonth, f64>,
    first: YearMonth,
    last: YearMonth,
    policy: GapPolicy,
}

impl PriceTable {
    /// Build a table, rejecting duplicates and non-positive prices
    pub fn new<I>(points: I, policy: GapPolicy) -> Result<Self, TableError>
    where
        I: IntoIterator<Item = PricePoint>,
    {
        let mut prices = BTreeMap::new();
        for point in points {
            if !(point.price.is_finite() && point.price > 0.0) {
                return Err(TableError::InvalidPrice {
                    date: point.date,
                    price: point.price,
                });
            }
            if prices.insert(point.date, point.price).is_some() {
                return Err(TableError::Duplicate(point.date));
            }
        }

        let first = *prices.keys().next().ok_or(TableError::Empty)?;
        let last = *prices.keys().next_back().ok_or(TableError::Empty)?;

        Ok(Self {
            prices,
            first,
            last,
            policy,
        })
    }

    /// Table over the bundled historical data
    pub fn bundled(policy: GapPolicy) -> Result<Self, TableError> {
        let points = BUNDLED_PRICES
            .iter()
            .map(|&(year, month, price)| -> Result<PricePoint, TableError> {
                Ok(PricePoint {
                    date: YearMonth::new(year, month)?,
                    price,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Self::new(points, policy)
    }

    /// Drop points before `earliest` so earlier dates are `OutOfRange`
    pub fn starting_from(self, earliest: YearMonth) -> Result<Self, TableError> {
        if self.first >= earliest {
            return Ok(self);
        }
        let kept: Vec<PricePoint> = self.points().filter(|p| p.date >= earliest).collect();
        debug!(
            "Dropping {} price points before {}",
            self.len() - kept.len(),
            earliest
        );
        Self::new(kept, self.policy)
    }

    /// First and last recorded months
    pub fn range(&self) -> (YearMonth, YearMonth) {
        (self.first, self.last)
    }

    /// Whether a date falls inside the supported range
    pub fn covers(&self, date: YearMonth) -> bool {
        date >= self.first && date <= self.last
    }

    pub fn len(&self) -> usize {
        self.prices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.prices.is_empty()
    }

    /// Recorded points in chronological order
    pub fn points(&self) -> impl Iterator<Item = PricePoint> + '_ {
        self.prices
            .iter()
            .map(|(&date, &price)| PricePoint { date, price })
    }

    /// Price for a month, resolved by the table's gap policy
    pub fn lookup(&self, date: YearMonth) -> Result<f64, LookupError> {
        self.lookup_point(date).map(|point| point.price)
    }

    /// The recorded point a lookup resolves to
    ///
    /// `point.date != date` means the price is an approximation taken from
    /// an earlier month.
    pub fn lookup_point(&self, date: YearMonth) -> Result<PricePoint, LookupError> {
        if !self.covers(date) {
            return Err(LookupError::OutOfRange {
                date,
                first: self.first,
                last: self.last,
            });
        }

        if let Some(&price) = self.prices.get(&date) {
            return Ok(PricePoint { date, price });
        }

        match self.policy {
            GapPolicy::Exact => Err(LookupError::NotFound(date)),
            GapPolicy::NearestEarlier => {
                let (&recorded, &price) = self
                    .prices
                    .range(..date)
                    .next_back()
                    .ok_or(LookupError::NotFound(date))?;
                debug!("No recorded price for {}, using {} (${:.2})", date, recorded, price);
                Ok(PricePoint {
                    date: recorded,
                    price,
                })
            }
        }
    }
}
