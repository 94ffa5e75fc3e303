//! PriceRecord — one trading day of OHLCV for one symbol.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Longest ticker symbol the stores accept.
pub const MAX_SYMBOL_LEN: usize = 10;

/// Canonical storage spelling of a ticker: trimmed, upper case.
pub fn normalize_symbol(symbol: &str) -> String {
    symbol.trim().to_uppercase()
}

/// Daily OHLCV for a single symbol. Natural key: (symbol, date).
///
/// Immutable once stored; never deleted by the pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceRecord {
    pub symbol: String,
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: u64,
}

/// Why a single price record was rejected before reaching the store.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("symbol must be 1 to 10 characters, got '{0}'")]
    Symbol(String),

    #[error("{field} must be a positive number, got {value}")]
    NonPositivePrice { field: &'static str, value: f64 },

    #[error("volume must be positive")]
    ZeroVolume,
}

impl PriceRecord {
    /// Check field constraints: symbol length, strictly positive finite
    /// prices, non-zero volume. Reports the first violation found.
    pub fn validate(&self) -> Result<(), ValidationError> {
        let len = self.symbol.chars().count();
        if len == 0 || len > MAX_SYMBOL_LEN {
            return Err(ValidationError::Symbol(self.symbol.clone()));
        }

        for (field, value) in [
            ("open", self.open),
            ("high", self.high),
            ("low", self.low),
            ("close", self.close),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(ValidationError::NonPositivePrice { field, value });
            }
        }

        if self.volume == 0 {
            return Err(ValidationError::ZeroVolume);
        }

        Ok(())
    }
}
