//! Time-to-live cache around a price source

use std::sync::Mutex;
use std::time::{Duration, Instant};

use log::debug;

use super::{MarketError, PriceSource};

/// Reuses the last successful price for `ttl`
///
/// Failures are not cached; the next call tries the inner source again.
#[derive(Debug)]
pub struct CachedPriceSource<S> {
    inner: S,
    ttl: Duration,
    cached: Mutex<Option<(Instant, f64)>>,
}

impl<S: PriceSource> CachedPriceSource<S> {
    pub fn new(inner: S, ttl: Duration) -> Self {
        Self {
            inner,
            ttl,
            cached: Mutex::new(None),
        }
    }

    /// Drop the cached price
    pub fn invalidate(&self) {
        *self.cached.lock().unwrap_or_else(|e| e.into_inner()) = None;
    }
}

impl<S: PriceSource> PriceSource for CachedPriceSource<S> {
    fn current_price(&self) -> Result<f64, MarketError> {
        let mut cached = self.cached.lock().unwrap_or_else(|e| e.into_inner());

        if let Some((fetched_at, price)) = *cached {
            if fetched_at.elapsed() < self.ttl {
                debug!("Using cached price ${:.2}", price);
                return Ok(price);
            }
        }

        let price = self.inner.current_price()?;
        *cached = Some((Instant::now(), price));
        Ok(price)
    }
}
