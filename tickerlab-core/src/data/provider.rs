//! Price source trait.
//!
//! The `PriceSource` trait abstracts over the daily-series provider so the
//! orchestrator can be driven by canned payloads in tests. The store layer sits
//! below the orchestrator; sources never see it.

use super::alpha_vantage::{parse_daily_series, RawDailySeries};
use crate::domain::PriceRecord;
use crate::error::IngestError;

/// A provider of raw daily OHLCV series.
pub trait PriceSource: Send + Sync {
    /// Human-readable name of this source.
    fn name(&self) -> &str;

    /// Fetch the raw daily series for a symbol. Fails with
    /// `IngestError::Provider` on error or usage-limit payloads.
    fn fetch_daily_series(&self, symbol: &str) -> Result<RawDailySeries, IngestError>;

    /// Normalize a raw series into records sorted ascending by date.
    fn parse_daily_series(&self, raw: &RawDailySeries) -> Result<Vec<PriceRecord>, IngestError> {
        parse_daily_series(raw)
    }
}
