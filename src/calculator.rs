//! Calculator: routes dates to history, live quote or projection
//!
//! Holds the loaded price table and projection engine so many queries can
//! be answered without reloading anything. "Today" and the current price are
//! passed in explicitly; nothing here fetches or reads the clock.

use log::{debug, warn};
use rayon::prelude::*;
use serde::Serialize;

use crate::chart::{ChartConfig, ChartPoint, ChartSeries};
use crate::config::DashboardConfig;
use crate::date::YearMonth;
use crate::error::{ensure_positive, Result, ValidationError};
use crate::forecast::{ForecastConfig, ProjectionEngine, ProjectionRequest, ProjectionResult};
use crate::history::{GapPolicy, LookupError, PricePoint, PriceTable};
use crate::investment::{Comparison, InputLimits, InvestmentQuery, InvestmentSummary, Position};
use crate::market::PriceQuote;

/// Where a resolved price came from
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PriceSourceKind {
    /// Recorded table price; `recorded` differs from the date for gap fills
    Historical { recorded: YearMonth },
    /// Current month, live fetch
    Live,
    /// Current month, fallback constant
    Fallback,
    /// Future month
    Projected(ProjectionResult),
}

/// Price for one month
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DatedPrice {
    pub date: YearMonth,
    pub price: f64,
    pub source: PriceSourceKind,
}

impl DatedPrice {
    pub fn is_projected(&self) -> bool {
        matches!(self.source, PriceSourceKind::Projected(_))
    }
}

/// Pre-loaded calculator
///
/// # Example
/// ```ignore
/// let calc = Calculator::with_defaults()?;
/// let quote = PriceQuote::resolve(&source, DEFAULT_FALLBACK_PRICE);
/// let summary = calc.evaluate(&query, YearMonth::current(), &quote)?;
/// ```
#[derive(Debug, Clone)]
pub struct Calculator {
    table: PriceTable,
    engine: ProjectionEngine,
    limits: InputLimits,
    chart: ChartConfig,
}

impl Calculator {
    pub fn new(table: PriceTable, engine: ProjectionEngine) -> Self {
        Self {
            table,
            engine,
            limits: InputLimits::default(),
            chart: ChartConfig::default(),
        }
    }

    /// Bundled price table and default forecast configuration
    pub fn with_defaults() -> Result<Self> {
        Ok(Self::new(
            PriceTable::bundled(GapPolicy::default())?,
            ProjectionEngine::new(ForecastConfig::default())?,
        ))
    }

    /// Build from a full configuration, validating it first
    pub fn from_config(config: &DashboardConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            table: config.load_table()?,
            engine: ProjectionEngine::new(config.forecast.clone())?,
            limits: config.limits.clone(),
            chart: config.chart.clone(),
        })
    }

    pub fn table(&self) -> &PriceTable {
        &self.table
    }

    pub fn engine(&self) -> &ProjectionEngine {
        &self.engine
    }

    pub fn limits(&self) -> &InputLimits {
        &self.limits
    }

    /// Recorded price for a past month
    pub fn historical_price(&self, date: YearMonth) -> std::result::Result<PricePoint, LookupError> {
        self.table.lookup_point(date)
    }

    /// Price for any month: table for the past, quote for `today`, engine for the future
    pub fn price_for_date(&self, date: YearMonth, today: YearMonth, quote: &PriceQuote) -> Result<DatedPrice> {
        if date == today {
            let source = if quote.live {
                PriceSourceKind::Live
            } else {
                PriceSourceKind::Fallback
            };
            return Ok(DatedPrice {
                date,
                price: quote.price,
                source,
            });
        }

        if date < today {
            let point = self.table.lookup_point(date)?;
            return Ok(DatedPrice {
                date,
                price: point.price,
                source: PriceSourceKind::Historical {
                    recorded: point.date,
                },
            });
        }

        let result = self.engine.project(&ProjectionRequest {
            current_price: quote.price,
            current_date: today,
            target_date: date,
        })?;
        debug!(
            "Projected {} at ${:.2} via {:?}",
            date, result.projected_price, result.method
        );
        Ok(DatedPrice {
            date,
            price: result.projected_price,
            source: PriceSourceKind::Projected(result),
        })
    }

    /// Value an investment against today or a future month
    pub fn evaluate(&self, query: &InvestmentQuery, today: YearMonth, quote: &PriceQuote) -> Result<InvestmentSummary> {
        self.limits.check(query.amount)?;
        self.check_quote(quote)?;

        if query.purchase_date > today {
            return Err(ValidationError::PurchaseInFuture {
                current: today,
                purchase: query.purchase_date,
            }
            .into());
        }

        let purchase = self.price_for_date(query.purchase_date, today, quote)?;
        let position = Position::open(query.amount, purchase.price)?;

        let comparison_date = match query.comparison {
            Comparison::Today => today,
            Comparison::Future(target) if target > today => target,
            Comparison::Future(target) => {
                return Err(ValidationError::TargetNotInFuture {
                    current: today,
                    target,
                }
                .into());
            }
        };
        let comparison = self.price_for_date(comparison_date, today, quote)?;

        let purchase_price_date = match purchase.source {
            PriceSourceKind::Historical { recorded } => recorded,
            _ => purchase.date,
        };
        let projection = match comparison.source {
            PriceSourceKind::Projected(result) => Some(result),
            _ => None,
        };
        let uses_quote = purchase.date == today || comparison_date == today || projection.is_some();

        Ok(InvestmentSummary {
            amount: query.amount,
            position,
            purchase_date: query.purchase_date,
            purchase_price_date,
            comparison_date,
            valuation: position.value_at(comparison.price),
            is_projection: projection.is_some(),
            projection,
            price_notice: if uses_quote { quote.notice.clone() } else { None },
        })
    }

    /// Price and portfolio value series between two months
    ///
    /// Past months the table cannot price (after its last recorded month)
    /// are left out of the series.
    pub fn series(
        &self,
        start: YearMonth,
        end: YearMonth,
        btc_amount: f64,
        today: YearMonth,
        quote: &PriceQuote,
    ) -> Result<ChartSeries> {
        self.check_quote(quote)?;
        let dates = self.chart.sample_dates(start, end);
        let step = self.chart.step_for(start.months_until(&end) + 1);

        let resolved: Vec<Option<DatedPrice>> = dates
            .par_iter()
            .map(|&date| match self.price_for_date(date, today, quote) {
                Ok(price) => Ok(Some(price)),
                Err(crate::Error::Lookup(LookupError::OutOfRange { .. })) if date < today => Ok(None),
                Err(err) => Err(err),
            })
            .collect::<Result<_>>()?;

        let skipped = resolved.iter().filter(|p| p.is_none()).count();
        if skipped > 0 {
            warn!("{} of {} chart months have no recorded price", skipped, dates.len());
        }

        let points = resolved
            .into_iter()
            .flatten()
            .map(|dated| ChartPoint {
                date: dated.date,
                price: dated.price,
                portfolio_value: dated.price * btc_amount,
                projected: dated.is_projected(),
            })
            .collect();

        Ok(ChartSeries::new(points, step))
    }

    /// The current price must be positive and within the projection ceiling
    fn check_quote(&self, quote: &PriceQuote) -> Result<()> {
        let price = ensure_positive("Current price", quote.price)?;
        let ceiling = self.engine.config().ceiling;
        if price > ceiling {
            return Err(ValidationError::PriceAboveCeiling { price, ceiling }.into());
        }
        Ok(())
    }
}
