//! Relative Strength Index (RSI).
//!
//! Wilder smoothing of average gains and average losses over close-to-close
//! changes. RSI = 100 * avg_gain / (avg_gain + avg_loss), which equals
//! 100 - 100 / (1 + RS) wherever RS is defined.
//! Lookback: period (first value once `period` changes exist).
//! Edge cases: no movement → 0 (as TA-Lib); avg_loss == 0 → 100.

use super::Indicator;

#[derive(Debug, Clone)]
pub struct Rsi {
    period: usize,
    name: String,
}

impl Rsi {
    pub fn new(period: usize) -> Self {
        assert!(period >= 1, "RSI period must be >= 1");
        Self {
            period,
            name: format!("rsi_{period}"),
        }
    }
}

impl Indicator for Rsi {
    fn name(&self) -> &str {
        &self.name
    }

    fn lookback(&self) -> usize {
        self.period
    }

    fn compute(&self, closes: &[f64]) -> Vec<f64> {
        let n = closes.len();
        let period = self.period;
        let mut result = vec![f64::NAN; n];

        if n < period + 1 {
            return result;
        }

        // changes[k] is the move from close k to close k+1
        let changes: Vec<f64> = closes.windows(2).map(|w| w[1] - w[0]).collect();

        let seed = &changes[..period];
        if seed.iter().any(|c| c.is_nan()) {
            return result;
        }
        let mut avg_gain = seed.iter().filter(|c| **c > 0.0).sum::<f64>() / period as f64;
        let mut avg_loss = -seed.iter().filter(|c| **c < 0.0).sum::<f64>() / period as f64;
        result[period] = rsi_value(avg_gain, avg_loss);

        let p = period as f64;
        for (k, &change) in changes.iter().enumerate().skip(period) {
            if change.is_nan() {
                break;
            }
            let gain = change.max(0.0);
            let loss = (-change).max(0.0);
            avg_gain = (avg_gain * (p - 1.0) + gain) / p;
            avg_loss = (avg_loss * (p - 1.0) + loss) / p;
            result[k + 1] = rsi_value(avg_gain, avg_loss);
        }

        result
    }
}

fn rsi_value(avg_gain: f64, avg_loss: f64) -> f64 {
    let total = avg_gain + avg_loss;
    if total == 0.0 {
        0.0
    } else {
        100.0 * avg_gain / total
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::assert_approx;

    #[test]
    fn rsi_all_gains() {
        let result = Rsi::new(3).compute(&[100.0, 101.0, 102.0, 103.0, 104.0, 105.0]);
        assert_approx(result[3], 100.0, 1e-6);
        assert_approx(result[5], 100.0, 1e-6);
    }

    #[test]
    fn rsi_all_losses() {
        let result = Rsi::new(3).compute(&[105.0, 104.0, 103.0, 102.0, 101.0, 100.0]);
        assert_approx(result[3], 0.0, 1e-6);
    }

    #[test]
    fn rsi_flat_is_zero() {
        let result = Rsi::new(3).compute(&[100.0; 6]);
        assert_approx(result[3], 0.0, 1e-9);
        assert_approx(result[5], 0.0, 1e-9);
    }

    #[test]
    fn rsi_flat_after_movement_keeps_smoothed_value() {
        // one gain in the seed, then flat: avg_loss stays 0 so RSI stays 100
        let result = Rsi::new(3).compute(&[100.0, 101.0, 101.0, 101.0, 101.0]);
        assert_approx(result[3], 100.0, 1e-9);
        assert_approx(result[4], 100.0, 1e-9);
    }

    #[test]
    fn rsi_mixed_known_value() {
        // Changes: +0.34, -0.25, -0.48, +0.72
        // Seed (period 3): avg_gain = 0.34/3, avg_loss = 0.73/3
        // RSI[3] = 100 - 100/(1 + 0.34/0.73)
        // Then: avg_gain = (0.34/3*2 + 0.72)/3, avg_loss = (0.73/3*2)/3
        let closes = [44.0, 44.34, 44.09, 43.61, 44.33];
        let result = Rsi::new(3).compute(&closes);

        assert!(result[..3].iter().all(|v| v.is_nan()));
        assert_approx(result[3], 100.0 - 100.0 / (1.0 + 0.34 / 0.73), 1e-9);

        let g = (0.34 / 3.0 * 2.0 + 0.72) / 3.0;
        let l = (0.73 / 3.0 * 2.0) / 3.0;
        assert_approx(result[4], 100.0 - 100.0 / (1.0 + g / l), 1e-9);
    }

    #[test]
    fn rsi_14_first_defined_at_14() {
        let closes: Vec<f64> = (0..30).map(|i| 100.0 + ((i * 7) % 5) as f64).collect();
        let result = Rsi::new(14).compute(&closes);
        assert!(result[..14].iter().all(|v| v.is_nan()));
        assert!(result[14..].iter().all(|v| !v.is_nan()));
    }

    #[test]
    fn rsi_bounds() {
        let closes = [100.0, 105.0, 98.0, 110.0, 95.0, 115.0, 90.0, 120.0];
        let result = Rsi::new(3).compute(&closes);
        for (i, &v) in result.iter().enumerate() {
            if !v.is_nan() {
                assert!((0.0..=100.0).contains(&v), "RSI out of bounds at {i}: {v}");
            }
        }
    }

    #[test]
    fn rsi_nan_in_seed() {
        let result = Rsi::new(3).compute(&[100.0, 101.0, f64::NAN, 103.0, 104.0]);
        assert!(result.iter().all(|v| v.is_nan()));
    }

    #[test]
    fn rsi_too_few_values() {
        let result = Rsi::new(14).compute(&[1.0; 14]);
        assert!(result.iter().all(|v| v.is_nan()));
    }
}
