//! Look-ahead contamination tests for every stored indicator column.
//!
//! No indicator value on day t may depend on a close after day t.
//!
//! Method: compute on a truncated series (days 0..120) and the full series
//! (days 0..240). Days 0..120 must be identical between both runs.

mod common;

use tickerlab_core::engine::{compute_rows, indicator_for};
use tickerlab_core::indicators::Indicator;
use tickerlab_core::IndicatorColumn;

fn assert_no_lookahead(indicator: &dyn Indicator, closes: &[f64], truncated_len: usize) {
    let full = indicator.compute(closes);
    let truncated = indicator.compute(&closes[..truncated_len]);

    assert_eq!(truncated.len(), truncated_len, "{}: length", indicator.name());

    for i in 0..truncated_len {
        let (a, b) = (full[i], truncated[i]);
        if a.is_nan() && b.is_nan() {
            continue;
        }
        assert!(
            (a - b).abs() < 1e-9,
            "{}: day {i} differs ({a} full vs {b} truncated)",
            indicator.name()
        );
    }
}

#[test]
fn no_lookahead_any_indicator() {
    let closes = common::wave_closes(240);
    for column in IndicatorColumn::ALL {
        assert_no_lookahead(indicator_for(column).as_ref(), &closes, 120);
    }
}

#[test]
fn no_lookahead_in_assembled_rows() {
    let records = common::make_records("TEST", &common::wave_closes(240));
    let full = compute_rows("TEST", &records);
    let truncated = compute_rows("TEST", &records[..150]);

    for (a, b) in full.iter().zip(&truncated) {
        assert_eq!(a.date, b.date);
        for column in IndicatorColumn::ALL {
            match (a.get(column), b.get(column)) {
                (None, None) => {}
                (Some(x), Some(y)) => assert!(
                    (x - y).abs() < 1e-9,
                    "{} on {} differs",
                    column.name(),
                    a.date
                ),
                other => panic!("{} on {}: {other:?}", column.name(), a.date),
            }
        }
    }
}

#[test]
fn warmup_matches_declared_lookback() {
    let closes = common::wave_closes(240);
    for column in IndicatorColumn::ALL {
        let ind = indicator_for(column);
        let series = ind.compute(&closes);
        let first = series.iter().position(|v| !v.is_nan());
        assert_eq!(first, Some(ind.lookback()), "{}", ind.name());
    }
}
