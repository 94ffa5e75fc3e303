//! The same storage contract, run against every adapter.

mod common;

use chrono::NaiveDate;
use tickerlab_core::{
    save_indicators, IndicatorQuery, IndicatorRow, IndicatorStore, MemoryStore, PriceStore,
    SqliteStore, StoreError,
};

trait Store: PriceStore + IndicatorStore {}
impl<T: PriceStore + IndicatorStore> Store for T {}

fn day(offset: i64) -> NaiveDate {
    common::base_date() + chrono::Duration::days(offset)
}

fn prices_are_unique_and_ordered(store: &mut dyn Store) {
    let records = common::make_records("MSFT", &[10.0, 11.0, 12.0, 13.0]);
    // out of order on purpose
    for i in [2, 0, 3, 1] {
        store.insert_price(&records[i]).unwrap();
    }
    for r in common::make_records("AAPL", &[50.0, 51.0]) {
        store.insert_price(&r).unwrap();
    }

    let dup = store.insert_price(&records[0]).unwrap_err();
    assert!(matches!(dup, StoreError::Duplicate { .. }), "{dup:?}");

    assert_eq!(store.count_prices("MSFT").unwrap(), 4);
    assert_eq!(store.recent_prices("MSFT", 100).unwrap(), records);
    assert_eq!(store.recent_prices("MSFT", 2).unwrap(), records[2..].to_vec());
    assert!(store.recent_prices("NONE", 10).unwrap().is_empty());

    let all = store.list_prices(None, 0, 100).unwrap();
    let keys: Vec<(&str, NaiveDate)> = all.iter().map(|r| (r.symbol.as_str(), r.date)).collect();
    assert_eq!(
        keys,
        vec![
            ("AAPL", day(0)),
            ("AAPL", day(1)),
            ("MSFT", day(0)),
            ("MSFT", day(1)),
            ("MSFT", day(2)),
            ("MSFT", day(3)),
        ]
    );
    let page = store.list_prices(Some("MSFT"), 1, 2).unwrap();
    assert_eq!(page, records[1..3].to_vec());
}

fn indicators_upsert_and_query(store: &mut dyn Store) {
    let rows: Vec<IndicatorRow> = (0..6)
        .map(|i| {
            let mut row = IndicatorRow::empty("MSFT", day(i));
            row.rsi_14 = Some(40.0 + i as f64);
            row.macd = (i % 2 == 0).then_some(0.25);
            row
        })
        .collect();

    let first = save_indicators(store, &rows).unwrap();
    assert_eq!((first.inserted, first.updated), (6, 0));

    let mut changed = rows.clone();
    changed[5].macd = None;
    changed[5].sma_20 = Some(99.5);
    let second = save_indicators(store, &changed).unwrap();
    assert_eq!((second.inserted, second.updated), (0, 6));
    assert_eq!(store.count_indicators("MSFT").unwrap(), 6);

    let latest = store.latest_indicator("MSFT").unwrap().unwrap();
    assert_eq!(latest, changed[5]);

    let window = store
        .indicators_in_range(
            "MSFT",
            &IndicatorQuery {
                start: Some(day(1)),
                end: Some(day(4)),
                limit: 3,
            },
        )
        .unwrap();
    let dates: Vec<NaiveDate> = window.iter().map(|r| r.date).collect();
    assert_eq!(dates, vec![day(4), day(3), day(2)]);

    let inverted = IndicatorQuery {
        start: Some(day(4)),
        end: Some(day(1)),
        ..Default::default()
    };
    assert!(store.indicators_in_range("MSFT", &inverted).unwrap().is_empty());
    assert!(store.latest_indicator("AAPL").unwrap().is_none());
}

fn insert_and_update_preconditions(store: &mut dyn Store) {
    let row = IndicatorRow::empty("IBM", day(0));
    assert!(matches!(
        store.update_indicator(&row),
        Err(StoreError::Missing { .. })
    ));
    store.insert_indicator(&row).unwrap();
    assert!(matches!(
        store.insert_indicator(&row),
        Err(StoreError::Duplicate { .. })
    ));
    assert_eq!(store.find_indicator("IBM", day(0)).unwrap(), Some(row));
}

fn run_contract(make: impl Fn() -> Box<dyn Store>) {
    prices_are_unique_and_ordered(make().as_mut());
    indicators_upsert_and_query(make().as_mut());
    insert_and_update_preconditions(make().as_mut());
}

#[test]
fn memory_store_contract() {
    run_contract(|| Box::new(MemoryStore::new()));
}

#[test]
fn sqlite_in_memory_contract() {
    run_contract(|| Box::new(SqliteStore::open_in_memory().unwrap()));
}

#[test]
fn sqlite_file_contract() {
    let dir = tempfile::tempdir().unwrap();
    let counter = std::cell::Cell::new(0);
    run_contract(|| {
        counter.set(counter.get() + 1);
        let path = dir.path().join(format!("contract_{}.db", counter.get()));
        Box::new(SqliteStore::open(path).unwrap())
    });
}

#[test]
fn sqlite_file_persists_across_opens() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("tickerlab.db");
    let records = common::make_records("MSFT", &[10.0, 11.0]);
    {
        let mut store = SqliteStore::open(&path).unwrap();
        for r in &records {
            store.insert_price(r).unwrap();
        }
    }
    let mut store = SqliteStore::open(&path).unwrap();
    assert_eq!(store.recent_prices("MSFT", 10).unwrap(), records);
    assert!(matches!(
        store.insert_price(&records[1]),
        Err(StoreError::Duplicate { .. })
    ));
}
