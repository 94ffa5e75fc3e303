//! SQLite store.
//!
//! Two tables, `stock_prices` and `technical_indicators`, each with a
//! UNIQUE (symbol, date) constraint. The schema is created on open with
//! `IF NOT EXISTS`, so opening an existing database is idempotent. Rows are
//! addressed only by that key.

use super::{IndicatorQuery, IndicatorStore, PriceStore};
use crate::domain::{IndicatorColumn, IndicatorRow, PriceRecord};
use crate::error::StoreError;
use chrono::NaiveDate;
use rusqlite::types::Type;
use rusqlite::{ffi, params, Connection, ErrorCode, OptionalExtension, Row, ToSql};
use std::path::Path;
use tracing::info;

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS stock_prices (
    symbol  TEXT    NOT NULL,
    date    TEXT    NOT NULL,
    open    REAL    NOT NULL,
    high    REAL    NOT NULL,
    low     REAL    NOT NULL,
    close   REAL    NOT NULL,
    volume  INTEGER NOT NULL,
    UNIQUE (symbol, date)
);
CREATE INDEX IF NOT EXISTS idx_stock_prices_date ON stock_prices (date);

CREATE TABLE IF NOT EXISTS technical_indicators (
    symbol         TEXT NOT NULL,
    date           TEXT NOT NULL,
    sma_20         REAL,
    sma_50         REAL,
    sma_200        REAL,
    ema_12         REAL,
    ema_26         REAL,
    rsi_14         REAL,
    macd           REAL,
    macd_signal    REAL,
    macd_histogram REAL,
    bb_upper       REAL,
    bb_middle      REAL,
    bb_lower       REAL,
    bb_width       REAL,
    UNIQUE (symbol, date)
);
CREATE INDEX IF NOT EXISTS idx_technical_indicators_date ON technical_indicators (date);
";

const PRICE_COLUMNS: &str = "symbol, date, open, high, low, close, volume";

impl From<rusqlite::Error> for StoreError {
    fn from(e: rusqlite::Error) -> Self {
        StoreError::Backend(e.to_string())
    }
}

/// Only UNIQUE failures are duplicates; NOT NULL and CHECK stay backend errors.
fn is_unique_violation(e: &rusqlite::Error) -> bool {
    matches!(
        e,
        rusqlite::Error::SqliteFailure(f, _)
            if f.code == ErrorCode::ConstraintViolation
                && f.extended_code == ffi::SQLITE_CONSTRAINT_UNIQUE
    )
}

fn to_sql_count(n: usize) -> i64 {
    i64::try_from(n).unwrap_or(i64::MAX)
}

fn indicator_columns() -> String {
    IndicatorColumn::ALL
        .iter()
        .map(|c| c.name())
        .collect::<Vec<_>>()
        .join(", ")
}

fn price_from_row(row: &Row<'_>) -> rusqlite::Result<PriceRecord> {
    let volume: i64 = row.get(6)?;
    Ok(PriceRecord {
        symbol: row.get(0)?,
        date: row.get(1)?,
        open: row.get(2)?,
        high: row.get(3)?,
        low: row.get(4)?,
        close: row.get(5)?,
        volume: u64::try_from(volume)
            .map_err(|e| rusqlite::Error::FromSqlConversionFailure(6, Type::Integer, Box::new(e)))?,
    })
}

fn indicator_from_row(row: &Row<'_>) -> rusqlite::Result<IndicatorRow> {
    let mut out = IndicatorRow::empty(row.get::<_, String>(0)?, row.get(1)?);
    for (i, column) in IndicatorColumn::ALL.into_iter().enumerate() {
        out.set(column, row.get::<_, Option<f64>>(i + 2)?);
    }
    Ok(out)
}

/// [`PriceStore`] and [`IndicatorStore`] over a single SQLite connection.
#[derive(Debug)]
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    /// Open (or create) a database file, enable WAL and create the schema.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref();
        let conn = Connection::open(path)?;
        conn.pragma_update(None, "journal_mode", "WAL")?;
        let store = Self::with_connection(conn)?;
        info!(path = %path.display(), "opened sqlite store");
        Ok(store)
    }

    /// A private in-memory database.
    pub fn open_in_memory() -> Result<Self, StoreError> {
        Self::with_connection(Connection::open_in_memory()?)
    }

    fn with_connection(conn: Connection) -> Result<Self, StoreError> {
        conn.execute_batch(SCHEMA)?;
        Ok(Self { conn })
    }
}

impl PriceStore for SqliteStore {
    fn insert_price(&mut self, record: &PriceRecord) -> Result<(), StoreError> {
        let volume = i64::try_from(record.volume)
            .map_err(|_| StoreError::Backend(format!("volume {} out of range", record.volume)))?;
        let result = self.conn.execute(
            &format!("INSERT INTO stock_prices ({PRICE_COLUMNS}) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)"),
            params![
                record.symbol,
                record.date,
                record.open,
                record.high,
                record.low,
                record.close,
                volume
            ],
        );
        match result {
            Ok(_) => Ok(()),
            Err(e) if is_unique_violation(&e) => Err(StoreError::Duplicate {
                symbol: record.symbol.clone(),
                date: record.date,
            }),
            Err(e) => Err(e.into()),
        }
    }

    fn recent_prices(&self, symbol: &str, limit: usize) -> Result<Vec<PriceRecord>, StoreError> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {PRICE_COLUMNS} FROM stock_prices WHERE symbol = ?1 ORDER BY date DESC LIMIT ?2"
        ))?;
        let mut records = stmt
            .query_map(params![symbol, to_sql_count(limit)], price_from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        records.reverse();
        Ok(records)
    }

    fn list_prices(
        &self,
        symbol: Option<&str>,
        skip: usize,
        limit: usize,
    ) -> Result<Vec<PriceRecord>, StoreError> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {PRICE_COLUMNS} FROM stock_prices
             WHERE (?1 IS NULL OR symbol = ?1)
             ORDER BY symbol, date
             LIMIT ?2 OFFSET ?3"
        ))?;
        let records = stmt
            .query_map(
                params![symbol, to_sql_count(limit), to_sql_count(skip)],
                price_from_row,
            )?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(records)
    }

    fn count_prices(&self, symbol: &str) -> Result<usize, StoreError> {
        let n: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM stock_prices WHERE symbol = ?1",
            params![symbol],
            |row| row.get(0),
        )?;
        Ok(n as usize)
    }
}

impl IndicatorStore for SqliteStore {
    fn find_indicator(
        &self,
        symbol: &str,
        date: NaiveDate,
    ) -> Result<Option<IndicatorRow>, StoreError> {
        let sql = format!(
            "SELECT symbol, date, {} FROM technical_indicators WHERE symbol = ?1 AND date = ?2",
            indicator_columns()
        );
        Ok(self
            .conn
            .query_row(&sql, params![symbol, date], indicator_from_row)
            .optional()?)
    }

    fn insert_indicator(&mut self, row: &IndicatorRow) -> Result<(), StoreError> {
        let placeholders = (1..=IndicatorColumn::ALL.len() + 2)
            .map(|i| format!("?{i}"))
            .collect::<Vec<_>>()
            .join(", ");
        let sql = format!(
            "INSERT INTO technical_indicators (symbol, date, {}) VALUES ({placeholders})",
            indicator_columns()
        );

        let values = row.values();
        let mut bound: Vec<&dyn ToSql> = vec![&row.symbol, &row.date];
        bound.extend(values.iter().map(|v| v as &dyn ToSql));

        match self.conn.execute(&sql, bound.as_slice()) {
            Ok(_) => Ok(()),
            Err(e) if is_unique_violation(&e) => Err(StoreError::Duplicate {
                symbol: row.symbol.clone(),
                date: row.date,
            }),
            Err(e) => Err(e.into()),
        }
    }

    fn update_indicator(&mut self, row: &IndicatorRow) -> Result<(), StoreError> {
        let assignments = IndicatorColumn::ALL
            .iter()
            .enumerate()
            .map(|(i, c)| format!("{} = ?{}", c.name(), i + 3))
            .collect::<Vec<_>>()
            .join(", ");
        let sql = format!(
            "UPDATE technical_indicators SET {assignments} WHERE symbol = ?1 AND date = ?2"
        );

        let values = row.values();
        let mut bound: Vec<&dyn ToSql> = vec![&row.symbol, &row.date];
        bound.extend(values.iter().map(|v| v as &dyn ToSql));

        let changed = self.conn.execute(&sql, bound.as_slice())?;
        if changed == 0 {
            return Err(StoreError::Missing {
                symbol: row.symbol.clone(),
                date: row.date,
            });
        }
        Ok(())
    }

    fn latest_indicator(&self, symbol: &str) -> Result<Option<IndicatorRow>, StoreError> {
        let sql = format!(
            "SELECT symbol, date, {} FROM technical_indicators
             WHERE symbol = ?1 ORDER BY date DESC LIMIT 1",
            indicator_columns()
        );
        Ok(self
            .conn
            .query_row(&sql, params![symbol], indicator_from_row)
            .optional()?)
    }

    fn indicators_in_range(
        &self,
        symbol: &str,
        query: &IndicatorQuery,
    ) -> Result<Vec<IndicatorRow>, StoreError> {
        if query.is_empty_range() {
            return Ok(Vec::new());
        }
        let sql = format!(
            "SELECT symbol, date, {} FROM technical_indicators
             WHERE symbol = ?1
               AND (?2 IS NULL OR date >= ?2)
               AND (?3 IS NULL OR date <= ?3)
             ORDER BY date DESC
             LIMIT ?4",
            indicator_columns()
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt
            .query_map(
                params![symbol, query.start, query.end, to_sql_count(query.limit)],
                indicator_from_row,
            )?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    fn count_indicators(&self, symbol: &str) -> Result<usize, StoreError> {
        let n: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM technical_indicators WHERE symbol = ?1",
            params![symbol],
            |row| row.get(0),
        )?;
        Ok(n as usize)
    }
}
