//! Moving Average Convergence Divergence (MACD).
//!
//! Three outputs (separate Indicator instances):
//! - Line: EMA(fast) - EMA(slow), defined once both EMAs are
//! - Signal: EMA(signal) of the defined part of the line
//! - Histogram: line - signal
//!
//! Lookback: slow - 1 for the line, slow + signal - 2 for signal/histogram.

use super::ema::ema_of_series;
use super::Indicator;

/// Which output of MACD to compute.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MacdLine {
    Line,
    Signal,
    Histogram,
}

#[derive(Debug, Clone)]
pub struct Macd {
    fast: usize,
    slow: usize,
    signal: usize,
    line: MacdLine,
    name: String,
}

impl Macd {
    pub fn new(fast: usize, slow: usize, signal: usize, line: MacdLine) -> Self {
        assert!(fast >= 1 && signal >= 1, "MACD periods must be >= 1");
        assert!(fast < slow, "MACD fast period must be shorter than slow period");
        let name = match line {
            MacdLine::Line => "macd".to_string(),
            MacdLine::Signal => "macd_signal".to_string(),
            MacdLine::Histogram => "macd_histogram".to_string(),
        };
        Self {
            fast,
            slow,
            signal,
            line,
            name,
        }
    }

    /// The standard (12, 26, 9) configuration.
    pub fn standard(line: MacdLine) -> Self {
        Self::new(12, 26, 9, line)
    }

    fn macd_line(&self, closes: &[f64]) -> Vec<f64> {
        let fast = ema_of_series(closes, self.fast);
        let slow = ema_of_series(closes, self.slow);
        fast.iter().zip(&slow).map(|(f, s)| f - s).collect()
    }

    fn signal_line(&self, line: &[f64]) -> Vec<f64> {
        let mut result = vec![f64::NAN; line.len()];
        if let Some(start) = line.iter().position(|v| !v.is_nan()) {
            let ema = ema_of_series(&line[start..], self.signal);
            result[start..].copy_from_slice(&ema);
        }
        result
    }
}

/// Line, signal and histogram from one pair of EMAs.
#[derive(Debug, Clone, PartialEq)]
pub struct MacdSeries {
    pub line: Vec<f64>,
    pub signal: Vec<f64>,
    pub histogram: Vec<f64>,
}

impl Macd {
    /// All three outputs; [`Indicator::compute`] keeps only `self.line`.
    pub fn compute_all(&self, closes: &[f64]) -> MacdSeries {
        let line = self.macd_line(closes);
        let signal = self.signal_line(&line);
        let histogram = line.iter().zip(&signal).map(|(l, s)| l - s).collect();
        MacdSeries {
            line,
            signal,
            histogram,
        }
    }
}

impl Indicator for Macd {
    fn name(&self) -> &str {
        &self.name
    }

    fn lookback(&self) -> usize {
        match self.line {
            MacdLine::Line => self.slow - 1,
            MacdLine::Signal | MacdLine::Histogram => self.slow + self.signal - 2,
        }
    }

    fn compute(&self, closes: &[f64]) -> Vec<f64> {
        match self.line {
            MacdLine::Line => self.macd_line(closes),
            MacdLine::Signal => self.signal_line(&self.macd_line(closes)),
            MacdLine::Histogram => self.compute_all(closes).histogram,
        }
    }
}
