//! Storage traits and adapters.
//!
//! The pipeline talks to storage only through [`PriceStore`] and
//! [`IndicatorStore`]. Both adapters enforce a unique (symbol, date) key on
//! prices and indicators:
//! - [`MemoryStore`]: ordered maps, for tests and dry runs
//! - [`SqliteStore`]: `rusqlite`, schema created on open

pub mod memory;
pub mod sqlite;

pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

use crate::domain::{IndicatorRow, PriceRecord};
use crate::error::StoreError;
use chrono::NaiveDate;

/// Default cap on rows returned by a range read.
pub const DEFAULT_QUERY_LIMIT: usize = 100;

/// Filter for [`IndicatorStore::indicators_in_range`]. Bounds are inclusive;
/// results are newest first, at most `limit` rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndicatorQuery {
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
    pub limit: usize,
}

impl Default for IndicatorQuery {
    fn default() -> Self {
        Self {
            start: None,
            end: None,
            limit: DEFAULT_QUERY_LIMIT,
        }
    }
}

impl IndicatorQuery {
    /// True when the bounds cannot match any date.
    pub fn is_empty_range(&self) -> bool {
        matches!((self.start, self.end), (Some(s), Some(e)) if s > e) || self.limit == 0
    }
}

/// Price persistence.
pub trait PriceStore {
    /// Insert one record. A second record for the same (symbol, date) fails
    /// with [`StoreError::Duplicate`] and leaves the stored one untouched.
    fn insert_price(&mut self, record: &PriceRecord) -> Result<(), StoreError>;

    /// The `limit` most recent records for `symbol`, ascending by date.
    fn recent_prices(&self, symbol: &str, limit: usize) -> Result<Vec<PriceRecord>, StoreError>;

    /// Stored records ordered by (symbol, date), optionally for one symbol,
    /// skipping `skip` and returning at most `limit`.
    fn list_prices(
        &self,
        symbol: Option<&str>,
        skip: usize,
        limit: usize,
    ) -> Result<Vec<PriceRecord>, StoreError>;

    fn count_prices(&self, symbol: &str) -> Result<usize, StoreError>;
}

/// Indicator persistence keyed by (symbol, date).
pub trait IndicatorStore {
    fn find_indicator(
        &self,
        symbol: &str,
        date: NaiveDate,
    ) -> Result<Option<IndicatorRow>, StoreError>;

    /// Insert a new row; [`StoreError::Duplicate`] if the key exists.
    fn insert_indicator(&mut self, row: &IndicatorRow) -> Result<(), StoreError>;

    /// Overwrite every indicator field of an existing row;
    /// [`StoreError::Missing`] if there is none.
    fn update_indicator(&mut self, row: &IndicatorRow) -> Result<(), StoreError>;

    /// Row with the greatest date for `symbol`.
    fn latest_indicator(&self, symbol: &str) -> Result<Option<IndicatorRow>, StoreError>;

    fn indicators_in_range(
        &self,
        symbol: &str,
        query: &IndicatorQuery,
    ) -> Result<Vec<IndicatorRow>, StoreError>;

    fn count_indicators(&self, symbol: &str) -> Result<usize, StoreError>;
}
