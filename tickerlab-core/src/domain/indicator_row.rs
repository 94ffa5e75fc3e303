//! IndicatorRow — the derived indicator set for one symbol on one day.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One stored indicator column. The order of [`IndicatorColumn::ALL`] is the
/// storage column order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IndicatorColumn {
    Sma20,
    Sma50,
    Sma200,
    Ema12,
    Ema26,
    Rsi14,
    Macd,
    MacdSignal,
    MacdHistogram,
    BbUpper,
    BbMiddle,
    BbLower,
    BbWidth,
}

impl IndicatorColumn {
    pub const ALL: [IndicatorColumn; 13] = [
        IndicatorColumn::Sma20,
        IndicatorColumn::Sma50,
        IndicatorColumn::Sma200,
        IndicatorColumn::Ema12,
        IndicatorColumn::Ema26,
        IndicatorColumn::Rsi14,
        IndicatorColumn::Macd,
        IndicatorColumn::MacdSignal,
        IndicatorColumn::MacdHistogram,
        IndicatorColumn::BbUpper,
        IndicatorColumn::BbMiddle,
        IndicatorColumn::BbLower,
        IndicatorColumn::BbWidth,
    ];

    /// Column name as stored and serialized.
    pub fn name(self) -> &'static str {
        match self {
            Self::Sma20 => "sma_20",
            Self::Sma50 => "sma_50",
            Self::Sma200 => "sma_200",
            Self::Ema12 => "ema_12",
            Self::Ema26 => "ema_26",
            Self::Rsi14 => "rsi_14",
            Self::Macd => "macd",
            Self::MacdSignal => "macd_signal",
            Self::MacdHistogram => "macd_histogram",
            Self::BbUpper => "bb_upper",
            Self::BbMiddle => "bb_middle",
            Self::BbLower => "bb_lower",
            Self::BbWidth => "bb_width",
        }
    }
}

/// Indicator values for (symbol, date). Every indicator is `None` until the
/// series has enough history for it. Unique key: (symbol, date).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndicatorRow {
    pub symbol: String,
    pub date: NaiveDate,

    // Moving averages
    pub sma_20: Option<f64>,
    pub sma_50: Option<f64>,
    pub sma_200: Option<f64>,
    pub ema_12: Option<f64>,
    pub ema_26: Option<f64>,

    // Momentum
    pub rsi_14: Option<f64>,

    // MACD
    pub macd: Option<f64>,
    pub macd_signal: Option<f64>,
    pub macd_histogram: Option<f64>,

    // Volatility
    pub bb_upper: Option<f64>,
    pub bb_middle: Option<f64>,
    pub bb_lower: Option<f64>,
    pub bb_width: Option<f64>,
}

impl IndicatorRow {
    /// A row with every indicator undefined.
    pub fn empty(symbol: impl Into<String>, date: NaiveDate) -> Self {
        Self {
            symbol: symbol.into(),
            date,
            sma_20: None,
            sma_50: None,
            sma_200: None,
            ema_12: None,
            ema_26: None,
            rsi_14: None,
            macd: None,
            macd_signal: None,
            macd_histogram: None,
            bb_upper: None,
            bb_middle: None,
            bb_lower: None,
            bb_width: None,
        }
    }

    pub fn get(&self, column: IndicatorColumn) -> Option<f64> {
        match column {
            IndicatorColumn::Sma20 => self.sma_20,
            IndicatorColumn::Sma50 => self.sma_50,
            IndicatorColumn::Sma200 => self.sma_200,
            IndicatorColumn::Ema12 => self.ema_12,
            IndicatorColumn::Ema26 => self.ema_26,
            IndicatorColumn::Rsi14 => self.rsi_14,
            IndicatorColumn::Macd => self.macd,
            IndicatorColumn::MacdSignal => self.macd_signal,
            IndicatorColumn::MacdHistogram => self.macd_histogram,
            IndicatorColumn::BbUpper => self.bb_upper,
            IndicatorColumn::BbMiddle => self.bb_middle,
            IndicatorColumn::BbLower => self.bb_lower,
            IndicatorColumn::BbWidth => self.bb_width,
        }
    }

    /// Set a column. Non-finite values are stored as `None`.
    pub fn set(&mut self, column: IndicatorColumn, value: Option<f64>) {
        let value = value.filter(|v| v.is_finite());
        let slot = match column {
            IndicatorColumn::Sma20 => &mut self.sma_20,
            IndicatorColumn::Sma50 => &mut self.sma_50,
            IndicatorColumn::Sma200 => &mut self.sma_200,
            IndicatorColumn::Ema12 => &mut self.ema_12,
            IndicatorColumn::Ema26 => &mut self.ema_26,
            IndicatorColumn::Rsi14 => &mut self.rsi_14,
            IndicatorColumn::Macd => &mut self.macd,
            IndicatorColumn::MacdSignal => &mut self.macd_signal,
            IndicatorColumn::MacdHistogram => &mut self.macd_histogram,
            IndicatorColumn::BbUpper => &mut self.bb_upper,
            IndicatorColumn::BbMiddle => &mut self.bb_middle,
            IndicatorColumn::BbLower => &mut self.bb_lower,
            IndicatorColumn::BbWidth => &mut self.bb_width,
        };
        *slot = value;
    }

    /// All indicator values in storage column order.
    pub fn values(&self) -> [Option<f64>; 13] {
        IndicatorColumn::ALL.map(|c| self.get(c))
    }

    /// Overwrite every indicator field with `other`'s, keeping the key.
    pub fn overwrite_values(&mut self, other: &IndicatorRow) {
        for column in IndicatorColumn::ALL {
            self.set(column, other.get(column));
        }
    }

    /// Whether either headline indicator (SMA-20, RSI-14) is defined. Rows
    /// without either carry nothing worth persisting.
    pub fn has_headline(&self) -> bool {
        self.sma_20.is_some() || self.rsi_14.is_some()
    }
}
