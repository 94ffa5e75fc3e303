//! Structured error types for the pipeline.
//!
//! These are designed to be displayable in both CLI output and logs. The split
//! between client-correctable conditions (`NotFound`, `InsufficientData`) and
//! system faults (`Provider`, `Parse`, `Persistence`) is exposed through
//! [`IngestError::is_client_correctable`].

use chrono::NaiveDate;
use thiserror::Error;

/// Errors raised by the client, the engine, the reconciler and the read paths.
#[derive(Debug, Error)]
pub enum IngestError {
    /// The provider reported an explicit error or a usage limit, or the
    /// request itself failed. Never retried automatically.
    #[error("provider error: {0}")]
    Provider(String),

    #[error("parse error: {0}")]
    Parse(String),

    #[error("no {what} found for symbol '{symbol}'")]
    NotFound { what: &'static str, symbol: String },

    #[error(
        "insufficient data for '{symbol}': need at least {required} days of data, got {found}"
    )]
    InsufficientData {
        symbol: String,
        required: usize,
        found: usize,
    },

    #[error("persistence error: {0}")]
    Persistence(String),
}

impl IngestError {
    pub(crate) fn no_prices(symbol: &str) -> Self {
        Self::NotFound {
            what: "price data",
            symbol: symbol.to_string(),
        }
    }

    pub(crate) fn no_indicators(symbol: &str) -> Self {
        Self::NotFound {
            what: "indicators",
            symbol: symbol.to_string(),
        }
    }

    /// True for conditions the caller can fix (ingest more history, pick
    /// another symbol) as opposed to provider or storage faults.
    pub fn is_client_correctable(&self) -> bool {
        matches!(self, Self::NotFound { .. } | Self::InsufficientData { .. })
    }
}

/// Errors from a storage adapter.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("row already exists for {symbol} on {date}")]
    Duplicate { symbol: String, date: NaiveDate },

    #[error("no row for {symbol} on {date}")]
    Missing { symbol: String, date: NaiveDate },

    #[error("storage backend error: {0}")]
    Backend(String),
}

impl From<StoreError> for IngestError {
    fn from(e: StoreError) -> Self {
        IngestError::Persistence(e.to_string())
    }
}

/// Failure of the combined fetch-then-derive operation, tagged by the stage
/// that failed so the caller knows which side effects may have happened.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Nothing was derived; some price rows may have been stored.
    #[error("price ingestion failed: {0}")]
    PriceStage(IngestError),

    /// Price ingestion completed; indicator rows may be partially written.
    #[error("indicator calculation failed: {0}")]
    IndicatorStage(IngestError),
}

impl PipelineError {
    pub fn stage(&self) -> &'static str {
        match self {
            Self::PriceStage(_) => "prices",
            Self::IndicatorStage(_) => "indicators",
        }
    }

    pub fn inner(&self) -> &IngestError {
        match self {
            Self::PriceStage(e) | Self::IndicatorStage(e) => e,
        }
    }
}
