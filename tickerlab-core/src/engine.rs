//! Indicator engine: price history in, aligned indicator rows out.
//!
//! The engine reads the most recent `lookback_days` price records for a
//! symbol (ascending), runs every indicator over the close series once (MACD
//! and Bollinger fill all of their columns from a single pass), and
//! stamps the results onto one row per input date. Rows are never dropped;
//! undefined values stay `None` and the reconciler decides what to persist.

use crate::domain::{IndicatorColumn, IndicatorRow, PriceRecord};
use crate::error::IngestError;
use crate::indicators::{Bollinger, Ema, Indicator, Macd, MacdLine, Rsi, Sma};
use crate::store::PriceStore;
use tracing::debug;

/// Fewest records the engine accepts: the window of SMA-20 / BB-20.
pub const MIN_HISTORY: usize = 20;

/// Default number of records read per calculation (enough for SMA-200).
pub const DEFAULT_LOOKBACK_DAYS: usize = 200;

const BB_PERIOD: usize = 20;
const BB_MULTIPLIER: f64 = 2.0;

/// The indicator producing a given stored column.
pub fn indicator_for(column: IndicatorColumn) -> Box<dyn Indicator> {
    match column {
        IndicatorColumn::Sma20 => Box::new(Sma::new(20)),
        IndicatorColumn::Sma50 => Box::new(Sma::new(50)),
        IndicatorColumn::Sma200 => Box::new(Sma::new(200)),
        IndicatorColumn::Ema12 => Box::new(Ema::new(12)),
        IndicatorColumn::Ema26 => Box::new(Ema::new(26)),
        IndicatorColumn::Rsi14 => Box::new(Rsi::new(14)),
        IndicatorColumn::Macd => Box::new(Macd::standard(MacdLine::Line)),
        IndicatorColumn::MacdSignal => Box::new(Macd::standard(MacdLine::Signal)),
        IndicatorColumn::MacdHistogram => Box::new(Macd::standard(MacdLine::Histogram)),
        IndicatorColumn::BbUpper => Box::new(Bollinger::upper(BB_PERIOD, BB_MULTIPLIER)),
        IndicatorColumn::BbMiddle => Box::new(Bollinger::middle(BB_PERIOD, BB_MULTIPLIER)),
        IndicatorColumn::BbLower => Box::new(Bollinger::lower(BB_PERIOD, BB_MULTIPLIER)),
        IndicatorColumn::BbWidth => Box::new(Bollinger::width(BB_PERIOD, BB_MULTIPLIER)),
    }
}

/// Compute the full indicator set over ascending `prices`.
///
/// Output has one row per record, in the same order, stamped with `symbol`.
pub fn compute_rows(symbol: &str, prices: &[PriceRecord]) -> Vec<IndicatorRow> {
    let closes: Vec<f64> = prices.iter().map(|p| p.close).collect();

    let mut rows: Vec<IndicatorRow> = prices
        .iter()
        .map(|p| IndicatorRow::empty(symbol, p.date))
        .collect();

    let macd = Macd::standard(MacdLine::Line).compute_all(&closes);
    let bands = Bollinger::middle(BB_PERIOD, BB_MULTIPLIER).compute_all(&closes);

    for column in IndicatorColumn::ALL {
        let single;
        let series: &[f64] = match column {
            IndicatorColumn::Macd => &macd.line,
            IndicatorColumn::MacdSignal => &macd.signal,
            IndicatorColumn::MacdHistogram => &macd.histogram,
            IndicatorColumn::BbUpper => &bands.upper,
            IndicatorColumn::BbMiddle => &bands.middle,
            IndicatorColumn::BbLower => &bands.lower,
            IndicatorColumn::BbWidth => &bands.width,
            other => {
                single = indicator_for(other).compute(&closes);
                &single
            }
        };
        debug_assert_eq!(series.len(), rows.len());
        for (row, &value) in rows.iter_mut().zip(series) {
            row.set(column, Some(value));
        }
    }

    rows
}

/// Reads price history from a store and computes indicator rows.
#[derive(Debug, Clone)]
pub struct IndicatorEngine {
    lookback_days: usize,
}

impl Default for IndicatorEngine {
    fn default() -> Self {
        Self::new(DEFAULT_LOOKBACK_DAYS)
    }
}

impl IndicatorEngine {
    pub fn new(lookback_days: usize) -> Self {
        assert!(
            lookback_days >= MIN_HISTORY,
            "lookback must cover at least {MIN_HISTORY} days"
        );
        Self { lookback_days }
    }

    pub fn lookback_days(&self) -> usize {
        self.lookback_days
    }

    /// Load up to `lookback_days` most recent records and compute rows.
    ///
    /// Fails with `NotFound` when the symbol has no prices and with
    /// `InsufficientData` below [`MIN_HISTORY`] records.
    pub fn calculate<S>(&self, store: &S, symbol: &str) -> Result<Vec<IndicatorRow>, IngestError>
    where
        S: PriceStore + ?Sized,
    {
        let prices = store.recent_prices(symbol, self.lookback_days)?;
        self.calculate_from(symbol, &prices)
    }

    /// Same checks as [`calculate`](Self::calculate) over an in-hand series.
    pub fn calculate_from(
        &self,
        symbol: &str,
        prices: &[PriceRecord],
    ) -> Result<Vec<IndicatorRow>, IngestError> {
        if prices.is_empty() {
            return Err(IngestError::no_prices(symbol));
        }
        if prices.len() < MIN_HISTORY {
            return Err(IngestError::InsufficientData {
                symbol: symbol.to_string(),
                required: MIN_HISTORY,
                found: prices.len(),
            });
        }

        debug!(symbol, records = prices.len(), "computing indicators");
        Ok(compute_rows(symbol, prices))
    }
}
