//! CoinGecko simple-price client

use std::time::Duration;

use log::debug;
use serde::Deserialize;

use super::{MarketConfig, MarketError, PriceSource};

#[derive(Debug, Deserialize)]
struct SimplePriceResponse {
    bitcoin: UsdPrice,
}

#[derive(Debug, Deserialize)]
struct UsdPrice {
    usd: f64,
}

/// Parse a `/simple/price?ids=bitcoin&vs_currencies=usd` body
pub fn parse_simple_price(body: &str) -> Result<f64, MarketError> {
    let response: SimplePriceResponse = serde_json::from_str(body)
        .map_err(|e| MarketError::UpstreamUnavailable(format!("malformed price response: {}", e)))?;

    let price = response.bitcoin.usd;
    if !(price.is_finite() && price > 0.0) {
        return Err(MarketError::UpstreamUnavailable(format!(
            "price service returned invalid price {}",
            price
        )));
    }
    Ok(price)
}

/// Blocking client for the current BTC price
#[derive(Debug, Clone)]
pub struct CoinGeckoClient {
    http: reqwest::blocking::Client,
    base_url: String,
    timeout: Duration,
}

impl CoinGeckoClient {
    pub fn new(config: &MarketConfig) -> Result<Self, MarketError> {
        let timeout = Duration::from_secs(config.timeout_secs);
        let http = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("btc_calculator/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            timeout,
        })
    }

    fn simple_price_url(&self) -> String {
        format!("{}/simple/price?ids=bitcoin&vs_currencies=usd", self.base_url)
    }
}

impl PriceSource for CoinGeckoClient {
    fn current_price(&self) -> Result<f64, MarketError> {
        let url = self.simple_price_url();
        debug!("GET {}", url);

        let response = self.http.get(&url).send().map_err(|e| {
            if e.is_timeout() {
                MarketError::UpstreamUnavailable(format!("request timed out after {:?}", self.timeout))
            } else {
                MarketError::UpstreamUnavailable(format!("network error: {}", e))
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(MarketError::UpstreamUnavailable(format!(
                "price service returned HTTP {}",
                status
            )));
        }

        let body = response
            .text()
            .map_err(|e| MarketError::UpstreamUnavailable(format!("failed to read response: {}", e)))?;
        parse_simple_price(&body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_valid_body() {
        let price = parse_simple_price(r#"{"bitcoin":{"usd":112345.67}}"#).unwrap();
        assert_eq!(price, 112_345.67);
    }

    #[test]
    fn test_parse_missing_field() {
        let result = parse_simple_price(r#"{"ethereum":{"usd":3000}}"#);
        assert!(matches!(result, Err(MarketError::UpstreamUnavailable(_))));
    }

    #[test]
    fn test_parse_rejects_zero_price() {
        assert!(parse_simple_price(r#"{"bitcoin":{"usd":0}}"#).is_err());
    }

    #[test]
    fn test_url_trims_trailing_slash() {
        let config = MarketConfig {
            base_url: "https://example.test/api/v3/".to_string(),
            ..Default::default()
        };
        let client = CoinGeckoClient::new(&config).unwrap();
        assert_eq!(
            client.simple_price_url(),
            "https://example.test/api/v3/simple/price?ids=bitcoin&vs_currencies=usd"
        );
    }

    #[test]
    fn test_unreachable_host_is_upstream_unavailable() {
        let config = MarketConfig {
            base_url: "http://127.0.0.1:9".to_string(),
            timeout_secs: 1,
            ..Default::default()
        };
        let client = CoinGeckoClient::new(&config).unwrap();
        assert!(matches!(
            client.current_price(),
            Err(MarketError::UpstreamUnavailable(_))
        ));
    }
}
