//! TickerLab CLI — ingest daily prices and derive indicators.
//!
//! Commands:
//! - `ingest` — fetch the daily series for a symbol and store new records
//! - `indicators` — compute indicators from stored prices and upsert them
//! - `full` — `ingest` followed by `indicators`
//! - `latest` / `range` — read stored indicator rows
//! - `prices` — page through stored prices
//!
//! Results are printed to stdout as JSON; logs go to stderr.

use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use serde::Serialize;
use std::path::PathBuf;
use std::sync::Arc;
use tickerlab_core::store::DEFAULT_QUERY_LIMIT;
use tickerlab_core::{
    full_ingest, indicators_in_range, ingest_indicators, ingest_prices, latest_indicators,
    list_prices, normalize_symbol, AlphaVantageClient, Config, IndicatorEngine, IndicatorQuery,
    RateLimiter, SqliteStore, MIN_HISTORY,
};
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "tickerlab",
    about = "TickerLab CLI — daily price ingestion and technical indicators"
)]
struct Cli {
    /// Path to a TOML config file. Defaults plus environment otherwise.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// SQLite database path (overrides config and environment).
    #[arg(long, global = true)]
    database: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch the daily series for a symbol and store new price records.
    Ingest {
        symbol: String,
    },
    /// Compute indicators from stored prices and upsert them.
    Indicators {
        symbol: String,

        /// Most recent records to use. Defaults to `[indicators] lookback_days`.
        #[arg(long)]
        days: Option<usize>,
    },
    /// Ingest prices, then compute indicators.
    Full {
        symbol: String,

        #[arg(long)]
        days: Option<usize>,
    },
    /// Print the most recent indicator row for a symbol.
    Latest {
        symbol: String,
    },
    /// Print indicator rows within a date range, newest first.
    Range {
        symbol: String,

        /// Start date (YYYY-MM-DD), inclusive.
        #[arg(long)]
        start: Option<String>,

        /// End date (YYYY-MM-DD), inclusive.
        #[arg(long)]
        end: Option<String>,

        #[arg(long, default_value_t = DEFAULT_QUERY_LIMIT)]
        limit: usize,
    },
    /// Page through stored prices ordered by symbol and date.
    Prices {
        #[arg(long)]
        symbol: Option<String>,

        #[arg(long, default_value_t = 0)]
        skip: usize,

        #[arg(long, default_value_t = 100)]
        limit: usize,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let mut config = Config::load(cli.config.as_deref())?;
    if let Some(path) = cli.database {
        config.storage.database_path = path;
    }
    debug!(?config, "configuration loaded");

    let mut store = SqliteStore::open(&config.storage.database_path).with_context(|| {
        format!(
            "failed to open database {}",
            config.storage.database_path.display()
        )
    })?;

    match cli.command {
        Commands::Ingest { symbol } => {
            let client = build_client(&config)?;
            let symbol = normalize_symbol(&symbol);
            print_json(&ingest_prices(&client, &mut store, &symbol)?)
        }
        Commands::Indicators { symbol, days } => {
            let engine = build_engine(&config, days)?;
            let symbol = normalize_symbol(&symbol);
            print_json(&ingest_indicators(&engine, &mut store, &symbol)?)
        }
        Commands::Full { symbol, days } => {
            let engine = build_engine(&config, days)?;
            let client = build_client(&config)?;
            let symbol = normalize_symbol(&symbol);
            print_json(&full_ingest(&client, &engine, &mut store, &symbol)?)
        }
        Commands::Latest { symbol } => {
            print_json(&latest_indicators(&store, &normalize_symbol(&symbol))?)
        }
        Commands::Range {
            symbol,
            start,
            end,
            limit,
        } => {
            let query = IndicatorQuery {
                start: parse_date(start.as_deref())?,
                end: parse_date(end.as_deref())?,
                limit,
            };
            print_json(&indicators_in_range(
                &store,
                &normalize_symbol(&symbol),
                &query,
            )?)
        }
        Commands::Prices {
            symbol,
            skip,
            limit,
        } => {
            let symbol = symbol.as_deref().map(normalize_symbol);
            print_json(&list_prices(&store, symbol.as_deref(), skip, limit)?)
        }
    }
}

fn build_client(config: &Config) -> Result<AlphaVantageClient> {
    let api_key = config.api_key()?;
    let limiter = Arc::new(RateLimiter::per_minute(
        config.provider.rate_limit_per_minute,
    ));
    Ok(AlphaVantageClient::from_config(
        &config.provider,
        api_key,
        limiter,
    )?)
}

fn build_engine(config: &Config, days: Option<usize>) -> Result<IndicatorEngine> {
    let days = days.unwrap_or(config.indicators.lookback_days);
    if days < MIN_HISTORY {
        bail!("--days must be at least {MIN_HISTORY}, got {days}");
    }
    Ok(IndicatorEngine::new(days))
}

fn parse_date(value: Option<&str>) -> Result<Option<NaiveDate>> {
    value
        .map(|s| {
            NaiveDate::parse_from_str(s, "%Y-%m-%d")
                .with_context(|| format!("invalid date '{s}', expected YYYY-MM-DD"))
        })
        .transpose()
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
