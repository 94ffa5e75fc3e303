//! Property tests for indicator invariants.
//!
//! Uses proptest to verify, over arbitrary positive close series:
//! 1. Output length equals input length, one row per record
//! 2. RSI stays within [0, 100]
//! 3. MACD histogram = line − signal wherever the signal is defined
//! 4. Bollinger width = (upper − lower) / middle × 100, and lower ≤ middle ≤ upper
//! 5. Appending days never changes earlier rows

mod common;

use proptest::prelude::*;
use tickerlab_core::compute_rows;

// ── Strategies (proptest) ────────────────────────────────────────────

fn arb_closes(min_len: usize, max_len: usize) -> impl Strategy<Value = Vec<f64>> {
    prop::collection::vec(1.0..1000.0_f64, min_len..max_len)
        .prop_map(|v| v.into_iter().map(|c| (c * 100.0).round() / 100.0).collect())
}

/// Random walk that stays positive, closer to real price action than
/// independent draws.
fn arb_walk(min_len: usize, max_len: usize) -> impl Strategy<Value = Vec<f64>> {
    (
        50.0..200.0_f64,
        prop::collection::vec(-0.05..0.05_f64, min_len..max_len),
    )
        .prop_map(|(start, steps)| {
            let mut price = start;
            steps
                .into_iter()
                .map(|s| {
                    price = (price * (1.0 + s)).max(0.5);
                    price
                })
                .collect()
        })
}

fn close_enough(a: f64, b: f64) -> bool {
    (a - b).abs() <= 1e-9 * (1.0 + a.abs().max(b.abs()))
}

proptest! {
    #[test]
    fn one_row_per_record(closes in arb_closes(0, 260)) {
        let records = common::make_records("TEST", &closes);
        let rows = compute_rows("TEST", &records);
        prop_assert_eq!(rows.len(), records.len());
        for (row, rec) in rows.iter().zip(&records) {
            prop_assert_eq!(row.date, rec.date);
        }
    }

    #[test]
    fn rsi_bounded(closes in arb_closes(15, 120)) {
        let rows = compute_rows("TEST", &common::make_records("TEST", &closes));
        for row in &rows {
            if let Some(rsi) = row.rsi_14 {
                prop_assert!((0.0..=100.0).contains(&rsi), "rsi {} out of range", rsi);
            }
        }
        prop_assert!(rows[14].rsi_14.is_some());
    }

    #[test]
    fn macd_histogram_identity(closes in arb_walk(34, 150)) {
        let rows = compute_rows("TEST", &common::make_records("TEST", &closes));
        for row in &rows {
            match (row.macd, row.macd_signal, row.macd_histogram) {
                (Some(line), Some(signal), Some(hist)) => {
                    prop_assert!(close_enough(hist, line - signal));
                }
                (_, None, hist) => prop_assert!(hist.is_none()),
                other => prop_assert!(false, "inconsistent macd triple {:?}", other),
            }
        }
    }

    #[test]
    fn bollinger_width_identity(closes in arb_walk(20, 150)) {
        let rows = compute_rows("TEST", &common::make_records("TEST", &closes));
        for row in rows.iter().skip(19) {
            let (upper, middle, lower, width) = (
                row.bb_upper.unwrap(),
                row.bb_middle.unwrap(),
                row.bb_lower.unwrap(),
                row.bb_width.unwrap(),
            );
            prop_assert!(lower <= middle + 1e-9 && middle <= upper + 1e-9);
            prop_assert!(close_enough(width, (upper - lower) / middle * 100.0));
        }
    }

    #[test]
    fn appending_days_keeps_history(closes in arb_walk(40, 120), cut in 20usize..40) {
        let records = common::make_records("TEST", &closes);
        let full = compute_rows("TEST", &records);
        let prefix = compute_rows("TEST", &records[..cut]);
        for (a, b) in full.iter().zip(&prefix) {
            for (x, y) in a.values().iter().zip(b.values().iter()) {
                match (x, y) {
                    (Some(x), Some(y)) => prop_assert!(close_enough(*x, *y)),
                    (None, None) => {}
                    _ => prop_assert!(false, "definedness changed on {}", a.date),
                }
            }
        }
    }
}
