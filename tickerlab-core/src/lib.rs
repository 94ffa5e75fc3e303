//! TickerLab Core — daily price ingestion and indicator derivation.
//!
//! This crate contains the ingestion-and-derivation pipeline:
//! - Domain types (price records, indicator rows)
//! - Rate-limited Alpha Vantage client with payload validation
//! - Indicator engine (SMA, EMA, RSI, MACD, Bollinger Bands)
//! - Reconciler that upserts computed rows by (symbol, date)
//! - Storage traits with in-memory and SQLite adapters
//! - Orchestrator composing fetch → store and engine → reconcile

pub mod config;
pub mod data;
pub mod domain;
pub mod engine;
pub mod error;
pub mod indicators;
pub mod ingest;
pub mod queries;
pub mod reconcile;
pub mod store;

pub use config::{Config, ConfigError};
pub use data::{AlphaVantageClient, PriceSource, RateLimiter, RawDailySeries};
pub use domain::{normalize_symbol, IndicatorColumn, IndicatorRow, PriceRecord, ValidationError};
pub use engine::{compute_rows, IndicatorEngine, DEFAULT_LOOKBACK_DAYS, MIN_HISTORY};
pub use error::{IngestError, PipelineError, StoreError};
pub use ingest::{
    full_ingest, ingest_indicators, ingest_prices, FullIngestSummary, IndicatorIngestSummary,
    PriceIngestSummary,
};
pub use queries::{indicators_in_range, latest_indicators, list_prices};
pub use reconcile::{save_indicators, ReconcileSummary};
pub use store::{IndicatorQuery, IndicatorStore, MemoryStore, PriceStore, SqliteStore};
