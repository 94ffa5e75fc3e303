//! Data acquisition: provider client, rate limiting, payload parsing

pub mod alpha_vantage;
pub mod provider;
pub mod rate_limit;

pub use alpha_vantage::{
    decode_response, parse_daily_series, AlphaVantageClient, RawDailyBar, RawDailySeries,
    SeriesMeta, DEFAULT_BASE_URL,
};
pub use provider::PriceSource;
pub use rate_limit::RateLimiter;
