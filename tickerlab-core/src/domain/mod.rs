//! Domain types for TickerLab

pub mod indicator_row;
pub mod price;

pub use indicator_row::{IndicatorColumn, IndicatorRow};
pub use price::{normalize_symbol, PriceRecord, ValidationError, MAX_SYMBOL_LEN};
