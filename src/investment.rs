//! Investment valuation: amount entry, purchase value and profit/loss

use serde::{Deserialize, Serialize};

use crate::date::YearMonth;
use crate::error::{ensure_positive, ValidationError};
use crate::forecast::ProjectionResult;

pub const MIN_BTC_AMOUNT: f64 = 0.0001;
pub const MAX_BTC_AMOUNT: f64 = 1_000_000.0;
pub const DEFAULT_BTC_AMOUNT: f64 = 1.0;

/// How the user entered the investment
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", content = "value", rename_all = "snake_case")]
pub enum Amount {
    /// Quantity of BTC held
    Btc(f64),
    /// USD spent at the purchase date
    Usd(f64),
}

/// What the purchase is valued against
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Comparison {
    Today,
    Future(YearMonth),
}

/// A valuation query from the presentation layer
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct InvestmentQuery {
    pub amount: Amount,
    pub purchase_date: YearMonth,
    pub comparison: Comparison,
}

/// Accepted input ranges
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InputLimits {
    pub min_btc: f64,
    pub max_btc: f64,
    pub default_btc: f64,
}

impl Default for InputLimits {
    fn default() -> Self {
        Self {
            min_btc: MIN_BTC_AMOUNT,
            max_btc: MAX_BTC_AMOUNT,
            default_btc: DEFAULT_BTC_AMOUNT,
        }
    }
}

impl InputLimits {
    pub fn check(&self, amount: Amount) -> Result<(), ValidationError> {
        match amount {
            Amount::Btc(btc) => {
                if !(btc.is_finite() && btc >= self.min_btc && btc <= self.max_btc) {
                    return Err(ValidationError::BtcAmountOutOfRange {
                        amount: btc,
                        min: self.min_btc,
                        max: self.max_btc,
                    });
                }
            }
            Amount::Usd(usd) => {
                ensure_positive("USD investment", usd)?;
            }
        }
        Ok(())
    }
}

/// BTC held and what it cost
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Position {
    pub btc_amount: f64,
    pub purchase_price: f64,
    pub purchase_value: f64,
}

impl Position {
    pub fn open(amount: Amount, purchase_price: f64) -> Result<Self, ValidationError> {
        ensure_positive("Purchase price", purchase_price)?;

        let (btc_amount, purchase_value) = match amount {
            Amount::Btc(btc) => (btc, btc * purchase_price),
            Amount::Usd(usd) => (usd / purchase_price, usd),
        };

        Ok(Self {
            btc_amount,
            purchase_price,
            purchase_value,
        })
    }

    pub fn value_at(&self, price: f64) -> Valuation {
        let current_value = self.btc_amount * price;
        let profit_loss = current_value - self.purchase_value;
        Valuation {
            price,
            current_value,
            profit_loss,
            profit_loss_pct: profit_loss / self.purchase_value * 100.0,
        }
    }
}

/// Position value at a comparison price
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Valuation {
    pub price: f64,
    pub current_value: f64,
    pub profit_loss: f64,
    pub profit_loss_pct: f64,
}

/// Full result handed back to the presentation layer
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InvestmentSummary {
    pub amount: Amount,
    pub position: Position,
    pub purchase_date: YearMonth,
    /// Month whose recorded price was used for the purchase
    pub purchase_price_date: YearMonth,
    pub comparison_date: YearMonth,
    pub valuation: Valuation,
    pub is_projection: bool,
    pub projection: Option<ProjectionResult>,
    /// Set when the live price could not be fetched
    pub price_notice: Option<String>,
}
