//! Alpha Vantage daily-series provider.
//!
//! Fetches `TIME_SERIES_DAILY` (compact output, ~100 most recent days) for a
//! symbol. Alpha Vantage reports failures inside HTTP 200 responses, so every
//! body is inspected for `"Error Message"` (bad symbol/key) and
//! `"Information"` / `"Note"` (usage limit) before it is treated as data.

use super::provider::PriceSource;
use super::rate_limit::RateLimiter;
use crate::config::ProviderConfig;
use crate::domain::{normalize_symbol, PriceRecord};
use crate::error::IngestError;
use chrono::NaiveDate;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, instrument};

pub const DEFAULT_BASE_URL: &str = "https://www.alphavantage.co/query";

/// Successful `TIME_SERIES_DAILY` payload.
#[derive(Debug, Clone, Deserialize)]
pub struct RawDailySeries {
    #[serde(rename = "Meta Data")]
    pub meta: SeriesMeta,
    /// Keyed by `YYYY-MM-DD`.
    #[serde(rename = "Time Series (Daily)")]
    pub series: BTreeMap<String, RawDailyBar>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SeriesMeta {
    #[serde(rename = "2. Symbol")]
    pub symbol: String,
    #[serde(rename = "3. Last Refreshed", default)]
    pub last_refreshed: Option<String>,
}

/// One day as the provider sends it: every number is a JSON string.
#[derive(Debug, Clone, Deserialize)]
pub struct RawDailyBar {
    #[serde(rename = "1. open")]
    pub open: String,
    #[serde(rename = "2. high")]
    pub high: String,
    #[serde(rename = "3. low")]
    pub low: String,
    #[serde(rename = "4. close")]
    pub close: String,
    #[serde(rename = "5. volume")]
    pub volume: String,
}

/// Inspect a response body for provider-reported failures, then decode it.
pub fn decode_response(body: &str) -> Result<RawDailySeries, IngestError> {
    let value: serde_json::Value = serde_json::from_str(body)
        .map_err(|e| IngestError::Parse(format!("response is not JSON: {e}")))?;

    if let Some(msg) = value.get("Error Message") {
        return Err(IngestError::Provider(format!(
            "Alpha Vantage error: {}",
            text_of(msg)
        )));
    }
    for key in ["Information", "Note"] {
        if let Some(msg) = value.get(key) {
            return Err(IngestError::Provider(format!(
                "API limit reached: {}",
                text_of(msg)
            )));
        }
    }

    serde_json::from_value(value)
        .map_err(|e| IngestError::Parse(format!("unexpected response format: {e}")))
}

fn text_of(value: &serde_json::Value) -> String {
    match value.as_str() {
        Some(s) => s.to_string(),
        None => value.to_string(),
    }
}

/// Convert a raw series into price records sorted ascending by date.
///
/// The symbol comes from the response metadata, not the request, and is
/// stored in its [`normalize_symbol`] form.
pub fn parse_daily_series(raw: &RawDailySeries) -> Result<Vec<PriceRecord>, IngestError> {
    let symbol = normalize_symbol(&raw.meta.symbol);
    let mut records = Vec::with_capacity(raw.series.len());

    for (day, bar) in &raw.series {
        let date = NaiveDate::parse_from_str(day.trim(), "%Y-%m-%d")
            .map_err(|e| IngestError::Parse(format!("invalid date '{day}': {e}")))?;

        records.push(PriceRecord {
            symbol: symbol.clone(),
            date,
            open: parse_price(day, "open", &bar.open)?,
            high: parse_price(day, "high", &bar.high)?,
            low: parse_price(day, "low", &bar.low)?,
            close: parse_price(day, "close", &bar.close)?,
            volume: bar.volume.trim().parse::<u64>().map_err(|e| {
                IngestError::Parse(format!("{day} volume: '{}' is not a count ({e})", bar.volume))
            })?,
        });
    }

    records.sort_by_key(|r| r.date);
    Ok(records)
}

fn parse_price(day: &str, field: &str, raw: &str) -> Result<f64, IngestError> {
    raw.trim()
        .parse::<f64>()
        .map_err(|e| IngestError::Parse(format!("{day} {field}: '{raw}' is not a number ({e})")))
}

/// Blocking Alpha Vantage client.
///
/// Every request first acquires the shared [`RateLimiter`]. Requests are not
/// retried: provider errors surface to the caller.
pub struct AlphaVantageClient {
    client: reqwest::blocking::Client,
    api_key: String,
    base_url: String,
    limiter: Arc<RateLimiter>,
}

impl AlphaVantageClient {
    pub fn new(api_key: impl Into<String>, limiter: Arc<RateLimiter>) -> Result<Self, IngestError> {
        Self::build(api_key.into(), DEFAULT_BASE_URL.to_string(), Duration::from_secs(30), limiter)
    }

    /// Build from the `[provider]` config section. The limiter is passed in so
    /// several clients can share one budget.
    pub fn from_config(
        config: &ProviderConfig,
        api_key: &str,
        limiter: Arc<RateLimiter>,
    ) -> Result<Self, IngestError> {
        Self::build(
            api_key.to_string(),
            config.base_url.clone(),
            Duration::from_secs(config.timeout_secs),
            limiter,
        )
    }

    fn build(
        api_key: String,
        base_url: String,
        timeout: Duration,
        limiter: Arc<RateLimiter>,
    ) -> Result<Self, IngestError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| IngestError::Provider(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            api_key,
            base_url,
            limiter,
        })
    }

    /// Point the client at a different endpoint (e.g. a local stub).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn limiter(&self) -> &RateLimiter {
        &self.limiter
    }

    #[instrument(skip(self), name = "alpha_vantage::fetch_daily_series")]
    fn request(&self, symbol: &str) -> Result<RawDailySeries, IngestError> {
        let waited = self.limiter.acquire();
        debug!(waited_ms = waited.as_millis() as u64, "requesting daily series");

        // `without_url` keeps the api key out of error messages.
        let resp = self
            .client
            .get(&self.base_url)
            .query(&[
                ("function", "TIME_SERIES_DAILY"),
                ("symbol", symbol),
                ("apikey", self.api_key.as_str()),
                ("outputsize", "compact"),
            ])
            .send()
            .map_err(|e| {
                IngestError::Provider(format!("request for {symbol} failed: {}", e.without_url()))
            })?;

        let status = resp.status();
        if !status.is_success() {
            return Err(IngestError::Provider(format!("HTTP {status} for {symbol}")));
        }

        let body = resp.text().map_err(|e| {
            IngestError::Parse(format!(
                "failed to read response for {symbol}: {}",
                e.without_url()
            ))
        })?;

        decode_response(&body)
    }
}

impl PriceSource for AlphaVantageClient {
    fn name(&self) -> &str {
        "alpha_vantage"
    }

    fn fetch_daily_series(&self, symbol: &str) -> Result<RawDailySeries, IngestError> {
        self.request(symbol)
    }
}
