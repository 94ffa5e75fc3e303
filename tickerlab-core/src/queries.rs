//! Read paths over stored prices and indicators. Symbols are normalized the
//! same way ingestion stores them.

use crate::domain::{normalize_symbol, IndicatorRow, PriceRecord};
use crate::error::IngestError;
use crate::store::{IndicatorQuery, IndicatorStore, PriceStore};

/// Most recent indicator row for `symbol`.
pub fn latest_indicators<S>(store: &S, symbol: &str) -> Result<IndicatorRow, IngestError>
where
    S: IndicatorStore + ?Sized,
{
    let symbol = normalize_symbol(symbol);
    store
        .latest_indicator(&symbol)?
        .ok_or_else(|| IngestError::no_indicators(&symbol))
}

/// Indicator rows within the query bounds, newest first.
///
/// An empty result is `NotFound` so callers can tell "nothing stored" from a
/// storage failure.
pub fn indicators_in_range<S>(
    store: &S,
    symbol: &str,
    query: &IndicatorQuery,
) -> Result<Vec<IndicatorRow>, IngestError>
where
    S: IndicatorStore + ?Sized,
{
    let symbol = normalize_symbol(symbol);
    let rows = store.indicators_in_range(&symbol, query)?;
    if rows.is_empty() {
        return Err(IngestError::no_indicators(&symbol));
    }
    Ok(rows)
}

/// One page of stored prices ordered by symbol then date.
pub fn list_prices<S>(
    store: &S,
    symbol: Option<&str>,
    skip: usize,
    limit: usize,
) -> Result<Vec<PriceRecord>, IngestError>
where
    S: PriceStore + ?Sized,
{
    let symbol = symbol.map(normalize_symbol);
    Ok(store.list_prices(symbol.as_deref(), skip, limit)?)
}
