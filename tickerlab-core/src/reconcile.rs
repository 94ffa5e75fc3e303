//! Indicator reconciliation: write computed rows so that each (symbol, date)
//! ends up with exactly one stored row holding the latest values.

use crate::domain::IndicatorRow;
use crate::error::StoreError;
use crate::store::IndicatorStore;
use serde::Serialize;
use tracing::debug;

/// What a reconciliation pass did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ReconcileSummary {
    pub inserted: usize,
    pub updated: usize,
    /// Rows with neither SMA-20 nor RSI-14 defined; never written.
    pub skipped: usize,
}

impl ReconcileSummary {
    /// Rows inserted or updated.
    pub fn written(&self) -> usize {
        self.inserted + self.updated
    }
}

/// Upsert `rows` into `store`.
///
/// Rows without a headline indicator are skipped. An existing row for the
/// same key has every indicator field overwritten, `None` included; a
/// missing one is inserted. Running the same rows twice leaves the store in
/// the same state as running them once.
pub fn save_indicators<S>(store: &mut S, rows: &[IndicatorRow]) -> Result<ReconcileSummary, StoreError>
where
    S: IndicatorStore + ?Sized,
{
    let mut summary = ReconcileSummary::default();

    for row in rows {
        if !row.has_headline() {
            summary.skipped += 1;
            continue;
        }
        if store.find_indicator(&row.symbol, row.date)?.is_some() {
            store.update_indicator(row)?;
            summary.updated += 1;
        } else {
            store.insert_indicator(row)?;
            summary.inserted += 1;
        }
    }

    debug!(
        inserted = summary.inserted,
        updated = summary.updated,
        skipped = summary.skipped,
        "reconciled indicator rows"
    );
    Ok(summary)
}
