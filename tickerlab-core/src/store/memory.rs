//! In-memory store backed by ordered maps.

use super::{IndicatorQuery, IndicatorStore, PriceStore};
use crate::domain::{IndicatorRow, PriceRecord};
use crate::error::StoreError;
use chrono::NaiveDate;
use std::collections::btree_map::Entry;
use std::collections::BTreeMap;

type Key = (String, NaiveDate);

fn key(symbol: &str, date: NaiveDate) -> Key {
    (symbol.to_string(), date)
}

fn symbol_range(symbol: &str) -> std::ops::RangeInclusive<Key> {
    key(symbol, NaiveDate::MIN)..=key(symbol, NaiveDate::MAX)
}

/// Store holding everything in `BTreeMap`s keyed by (symbol, date), so every
/// per-symbol scan comes out date-ordered.
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    prices: BTreeMap<Key, PriceRecord>,
    indicators: BTreeMap<Key, IndicatorRow>,
    mutations: usize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Successful writes (inserts and updates) since creation.
    pub fn mutation_count(&self) -> usize {
        self.mutations
    }
}

impl PriceStore for MemoryStore {
    fn insert_price(&mut self, record: &PriceRecord) -> Result<(), StoreError> {
        match self.prices.entry(key(&record.symbol, record.date)) {
            Entry::Occupied(_) => Err(StoreError::Duplicate {
                symbol: record.symbol.clone(),
                date: record.date,
            }),
            Entry::Vacant(slot) => {
                slot.insert(record.clone());
                self.mutations += 1;
                Ok(())
            }
        }
    }

    fn recent_prices(&self, symbol: &str, limit: usize) -> Result<Vec<PriceRecord>, StoreError> {
        let mut recent: Vec<PriceRecord> = self
            .prices
            .range(symbol_range(symbol))
            .rev()
            .take(limit)
            .map(|(_, r)| r.clone())
            .collect();
        recent.reverse();
        Ok(recent)
    }

    fn list_prices(
        &self,
        symbol: Option<&str>,
        skip: usize,
        limit: usize,
    ) -> Result<Vec<PriceRecord>, StoreError> {
        let records: Vec<PriceRecord> = match symbol {
            Some(sym) => self
                .prices
                .range(symbol_range(sym))
                .skip(skip)
                .take(limit)
                .map(|(_, r)| r.clone())
                .collect(),
            None => self
                .prices
                .values()
                .skip(skip)
                .take(limit)
                .cloned()
                .collect(),
        };
        Ok(records)
    }

    fn count_prices(&self, symbol: &str) -> Result<usize, StoreError> {
        Ok(self.prices.range(symbol_range(symbol)).count())
    }
}

impl IndicatorStore for MemoryStore {
    fn find_indicator(
        &self,
        symbol: &str,
        date: NaiveDate,
    ) -> Result<Option<IndicatorRow>, StoreError> {
        Ok(self.indicators.get(&key(symbol, date)).cloned())
    }

    fn insert_indicator(&mut self, row: &IndicatorRow) -> Result<(), StoreError> {
        match self.indicators.entry(key(&row.symbol, row.date)) {
            Entry::Occupied(_) => Err(StoreError::Duplicate {
                symbol: row.symbol.clone(),
                date: row.date,
            }),
            Entry::Vacant(slot) => {
                slot.insert(row.clone());
                self.mutations += 1;
                Ok(())
            }
        }
    }

    fn update_indicator(&mut self, row: &IndicatorRow) -> Result<(), StoreError> {
        let stored = self
            .indicators
            .get_mut(&key(&row.symbol, row.date))
            .ok_or_else(|| StoreError::Missing {
                symbol: row.symbol.clone(),
                date: row.date,
            })?;
        stored.overwrite_values(row);
        self.mutations += 1;
        Ok(())
    }

    fn latest_indicator(&self, symbol: &str) -> Result<Option<IndicatorRow>, StoreError> {
        Ok(self
            .indicators
            .range(symbol_range(symbol))
            .next_back()
            .map(|(_, r)| r.clone()))
    }

    fn indicators_in_range(
        &self,
        symbol: &str,
        query: &IndicatorQuery,
    ) -> Result<Vec<IndicatorRow>, StoreError> {
        if query.is_empty_range() {
            return Ok(Vec::new());
        }
        let start = query.start.unwrap_or(NaiveDate::MIN);
        let end = query.end.unwrap_or(NaiveDate::MAX);
        Ok(self
            .indicators
            .range(key(symbol, start)..=key(symbol, end))
            .rev()
            .take(query.limit)
            .map(|(_, r)| r.clone())
            .collect())
    }

    fn count_indicators(&self, symbol: &str) -> Result<usize, StoreError> {
        Ok(self.indicators.range(symbol_range(symbol)).count())
    }
}
