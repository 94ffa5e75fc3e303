//! Shared fixtures for integration tests.

#![allow(dead_code)]

use chrono::NaiveDate;
use tickerlab_core::data::decode_response;
use tickerlab_core::{IngestError, PriceRecord, PriceSource, RawDailySeries};

pub fn base_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 1, 2).unwrap()
}

/// Deterministic close series: a slow sine wave on an upward drift.
pub fn wave_closes(n: usize) -> Vec<f64> {
    (0..n)
        .map(|i| 100.0 + (i as f64 * 0.25).sin() * 8.0 + i as f64 * 0.05)
        .collect()
}

pub fn make_records(symbol: &str, closes: &[f64]) -> Vec<PriceRecord> {
    closes
        .iter()
        .enumerate()
        .map(|(i, &close)| PriceRecord {
            symbol: symbol.to_string(),
            date: base_date() + chrono::Duration::days(i as i64),
            open: close - 0.5,
            high: close + 1.0,
            low: close - 1.0,
            close,
            volume: 1_000 + i as u64,
        })
        .collect()
}

/// A `TIME_SERIES_DAILY` body with `closes.len()` days, newest first as the
/// provider sends it.
pub fn daily_series_json(symbol: &str, closes: &[f64]) -> String {
    let days: Vec<String> = make_records(symbol, closes)
        .iter()
        .rev()
        .map(|r| {
            format!(
                r#""{}": {{"1. open": "{:.4}", "2. high": "{:.4}", "3. low": "{:.4}", "4. close": "{:.4}", "5. volume": "{}"}}"#,
                r.date.format("%Y-%m-%d"),
                r.open,
                r.high,
                r.low,
                r.close,
                r.volume
            )
        })
        .collect();

    format!(
        r#"{{
    "Meta Data": {{
        "1. Information": "Daily Prices (open, high, low, close) and Volumes",
        "2. Symbol": "{symbol}",
        "3. Last Refreshed": "2024-06-28",
        "4. Output Size": "Compact",
        "5. Time Zone": "US/Eastern"
    }},
    "Time Series (Daily)": {{
        {}
    }}
}}"#,
        days.join(",\n        ")
    )
}

/// A source that answers every fetch with a fixed response body.
pub struct CannedSource {
    pub body: String,
}

impl CannedSource {
    pub fn series(symbol: &str, closes: &[f64]) -> Self {
        Self {
            body: daily_series_json(symbol, closes),
        }
    }

    pub fn body(body: &str) -> Self {
        Self {
            body: body.to_string(),
        }
    }
}

impl PriceSource for CannedSource {
    fn name(&self) -> &str {
        "canned"
    }

    fn fetch_daily_series(&self, _symbol: &str) -> Result<RawDailySeries, IngestError> {
        decode_response(&self.body)
    }
}
