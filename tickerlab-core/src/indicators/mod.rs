//! Indicator trait and concrete implementations.
//!
//! Indicators are pure functions: ascending close series in, numeric series of
//! the same length out. Warm-up positions hold `f64::NAN`; the engine turns
//! those into `None` when it assembles rows.
//!
//! Multi-series indicators (MACD, Bollinger) are exposed as separate instances
//! per output line, keeping the single-series trait unchanged. Each also has
//! a `compute_all` that yields every output from one pass.

pub mod bollinger;
pub mod ema;
pub mod macd;
pub mod rsi;
pub mod sma;

pub use bollinger::{Bollinger, BollingerBand, BollingerSeries};
pub use ema::{ema_of_series, Ema};
pub use macd::{Macd, MacdLine, MacdSeries};
pub use rsi::Rsi;
pub use sma::Sma;

/// Trait for indicators.
///
/// # Look-ahead contamination guard
/// No value at index t may depend on closes at t+1 or later. Every indicator
/// must give identical values on a truncated series.
pub trait Indicator: Send + Sync {
    /// Column-style name (e.g. "sma_20", "macd_signal").
    fn name(&self) -> &str;

    /// Number of leading positions that are always NaN.
    fn lookback(&self) -> usize;

    /// Compute over the full close series; output has the same length.
    fn compute(&self, closes: &[f64]) -> Vec<f64>;
}

/// Build ascending daily price records from close prices for testing.
///
/// open = previous close (or close on the first day), high/low = ±1 around
/// the open/close range, volume = 1000.
#[cfg(test)]
pub fn make_prices(closes: &[f64]) -> Vec<crate::domain::PriceRecord> {
    use crate::domain::PriceRecord;
    let base_date = chrono::NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();
    closes
        .iter()
        .enumerate()
        .map(|(i, &close)| {
            let open = if i == 0 { close } else { closes[i - 1] };
            PriceRecord {
                symbol: "TEST".to_string(),
                date: base_date + chrono::Duration::days(i as i64),
                open,
                high: open.max(close) + 1.0,
                low: (open.min(close) - 1.0).max(0.01),
                close,
                volume: 1000,
            }
        })
        .collect()
}

/// Assert two f64 values are approximately equal (within epsilon).
#[cfg(test)]
pub fn assert_approx(actual: f64, expected: f64, epsilon: f64) {
    assert!(
        (actual - expected).abs() < epsilon,
        "assert_approx failed: actual={actual}, expected={expected}, diff={}, epsilon={epsilon}",
        (actual - expected).abs()
    );
}

/// Default epsilon for indicator tests.
#[cfg(test)]
pub const DEFAULT_EPSILON: f64 = 1e-10;
