//! Ingestion orchestrator: provider to price store, price store to indicators.
//!
//! Price ingestion is best-effort per record: one bad or duplicate day never
//! aborts the batch. Indicator ingestion is all-or-nothing up to the first
//! store failure.
//!
//! Symbols are passed through [`normalize_symbol`] on the way in, so `"ibm"`
//! and `"IBM"` address the same stored series.

use crate::data::PriceSource;
use crate::domain::{normalize_symbol, PriceRecord, ValidationError};
use crate::engine::IndicatorEngine;
use crate::error::{IngestError, PipelineError, StoreError};
use crate::reconcile::save_indicators;
use crate::store::{IndicatorStore, PriceStore};
use chrono::NaiveDate;
use serde::Serialize;
use tracing::{info, warn};

/// Outcome of a price ingestion run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PriceIngestSummary {
    pub symbol: String,
    pub saved: usize,
    pub skipped: usize,
    pub total: usize,
}

/// Outcome of an indicator run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IndicatorIngestSummary {
    pub symbol: String,
    /// Rows produced by the engine, including warm-up rows.
    pub calculated: usize,
    /// Rows inserted or updated.
    pub saved: usize,
    pub latest_date: Option<NaiveDate>,
}

/// Outcome of [`full_ingest`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FullIngestSummary {
    pub symbol: String,
    pub prices: PriceIngestSummary,
    pub indicators: IndicatorIngestSummary,
}

/// Why a single record was not stored.
#[derive(Debug, thiserror::Error)]
enum RecordError {
    #[error("invalid record: {0}")]
    Invalid(#[from] ValidationError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

fn store_record<S>(store: &mut S, record: &PriceRecord) -> Result<(), RecordError>
where
    S: PriceStore + ?Sized,
{
    record.validate()?;
    store.insert_price(record)?;
    Ok(())
}

/// Fetch the daily series for `symbol` and store every valid, new record.
///
/// Fails only when the fetch or the payload as a whole fails; per-record
/// failures are logged and counted in `skipped`.
pub fn ingest_prices<S>(
    source: &dyn PriceSource,
    store: &mut S,
    symbol: &str,
) -> Result<PriceIngestSummary, IngestError>
where
    S: PriceStore + ?Sized,
{
    let symbol = normalize_symbol(symbol);
    let symbol = symbol.as_str();
    let raw = source.fetch_daily_series(symbol)?;
    let records = source.parse_daily_series(&raw)?;

    let mut summary = PriceIngestSummary {
        symbol: symbol.to_string(),
        saved: 0,
        skipped: 0,
        total: records.len(),
    };

    for record in &records {
        match store_record(store, record) {
            Ok(()) => summary.saved += 1,
            Err(e) => {
                warn!(symbol = %record.symbol, date = %record.date, error = %e, "skipping price record");
                summary.skipped += 1;
            }
        }
    }

    info!(
        symbol,
        source = source.name(),
        saved = summary.saved,
        skipped = summary.skipped,
        total = summary.total,
        "price ingestion complete"
    );
    Ok(summary)
}

/// Compute indicators from stored prices and reconcile them into the store.
pub fn ingest_indicators<S>(
    engine: &IndicatorEngine,
    store: &mut S,
    symbol: &str,
) -> Result<IndicatorIngestSummary, IngestError>
where
    S: PriceStore + IndicatorStore + ?Sized,
{
    let symbol = normalize_symbol(symbol);
    let symbol = symbol.as_str();
    let rows = engine.calculate(store, symbol)?;
    let reconciled = save_indicators(store, &rows)?;
    let latest_date = store.latest_indicator(symbol)?.map(|row| row.date);

    info!(
        symbol,
        calculated = rows.len(),
        saved = reconciled.written(),
        latest = ?latest_date,
        "indicator calculation complete"
    );
    Ok(IndicatorIngestSummary {
        symbol: symbol.to_string(),
        calculated: rows.len(),
        saved: reconciled.written(),
        latest_date,
    })
}

/// Price ingestion followed by indicator calculation.
///
/// Indicators only run once prices succeeded. The error variant tells which
/// stage failed.
pub fn full_ingest<S>(
    source: &dyn PriceSource,
    engine: &IndicatorEngine,
    store: &mut S,
    symbol: &str,
) -> Result<FullIngestSummary, PipelineError>
where
    S: PriceStore + IndicatorStore + ?Sized,
{
    let prices = ingest_prices(source, store, symbol).map_err(PipelineError::PriceStage)?;
    let indicators =
        ingest_indicators(engine, store, symbol).map_err(PipelineError::IndicatorStage)?;

    Ok(FullIngestSummary {
        symbol: prices.symbol.clone(),
        prices,
        indicators,
    })
}
