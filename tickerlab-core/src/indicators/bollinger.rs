//! Bollinger Bands — moving average ± standard deviation multiplier.
//!
//! Four outputs (separate Indicator instances):
//! - Middle: SMA(close, period)
//! - Upper: middle + mult * stddev(close, period)
//! - Lower: middle - mult * stddev(close, period)
//! - Width: (upper - lower) / middle * 100
//!
//! Uses population stddev (divide by N), matching TA-Lib's BBANDS.
//! Lookback: period - 1.

use super::Indicator;

/// Which output of the Bollinger Bands to compute.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BollingerBand {
    Upper,
    Middle,
    Lower,
    Width,
}

#[derive(Debug, Clone)]
pub struct Bollinger {
    period: usize,
    multiplier: f64,
    band: BollingerBand,
    name: String,
}

impl Bollinger {
    pub fn new(period: usize, multiplier: f64, band: BollingerBand) -> Self {
        assert!(period >= 1, "Bollinger period must be >= 1");
        let label = match band {
            BollingerBand::Upper => "upper",
            BollingerBand::Middle => "middle",
            BollingerBand::Lower => "lower",
            BollingerBand::Width => "width",
        };
        Self {
            period,
            multiplier,
            band,
            name: format!("bb_{label}_{period}_{multiplier}"),
        }
    }

    pub fn upper(period: usize, multiplier: f64) -> Self {
        Self::new(period, multiplier, BollingerBand::Upper)
    }

    pub fn middle(period: usize, multiplier: f64) -> Self {
        Self::new(period, multiplier, BollingerBand::Middle)
    }

    pub fn lower(period: usize, multiplier: f64) -> Self {
        Self::new(period, multiplier, BollingerBand::Lower)
    }

    pub fn width(period: usize, multiplier: f64) -> Self {
        Self::new(period, multiplier, BollingerBand::Width)
    }
}

/// Every band from one pass over the windows.
#[derive(Debug, Clone, PartialEq)]
pub struct BollingerSeries {
    pub upper: Vec<f64>,
    pub middle: Vec<f64>,
    pub lower: Vec<f64>,
    pub width: Vec<f64>,
}

impl BollingerSeries {
    fn nan(n: usize) -> Self {
        Self {
            upper: vec![f64::NAN; n],
            middle: vec![f64::NAN; n],
            lower: vec![f64::NAN; n],
            width: vec![f64::NAN; n],
        }
    }

    pub fn into_band(self, band: BollingerBand) -> Vec<f64> {
        match band {
            BollingerBand::Upper => self.upper,
            BollingerBand::Middle => self.middle,
            BollingerBand::Lower => self.lower,
            BollingerBand::Width => self.width,
        }
    }
}

impl Bollinger {
    /// All four bands; [`Indicator::compute`] keeps only `self.band`.
    pub fn compute_all(&self, closes: &[f64]) -> BollingerSeries {
        let mut out = BollingerSeries::nan(closes.len());

        if closes.len() < self.period {
            return out;
        }

        for (i, window) in closes.windows(self.period).enumerate() {
            if window.iter().any(|c| c.is_nan()) {
                continue;
            }

            let mean = window.iter().sum::<f64>() / self.period as f64;
            let variance = window
                .iter()
                .map(|c| {
                    let diff = c - mean;
                    diff * diff
                })
                .sum::<f64>()
                / self.period as f64;
            let offset = self.multiplier * variance.sqrt();

            let t = i + self.period - 1;
            out.middle[t] = mean;
            out.upper[t] = mean + offset;
            out.lower[t] = mean - offset;
            out.width[t] = if mean == 0.0 {
                f64::NAN
            } else {
                (2.0 * offset) / mean * 100.0
            };
        }

        out
    }
}

impl Indicator for Bollinger {
    fn name(&self) -> &str {
        &self.name
    }

    fn lookback(&self) -> usize {
        self.period - 1
    }

    fn compute(&self, closes: &[f64]) -> Vec<f64> {
        self.compute_all(closes).into_band(self.band)
    }
}
