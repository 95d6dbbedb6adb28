//! `quotefeed`: print current or historical Yahoo Finance quotes as JSON.
//!
//! ```bash
//! quotefeed latest --market USA --ticker AAPL --ticker MSFT
//! quotefeed history --market GBR --ticker VOD --start 2023-01-02 --end 2023-01-05
//! ```
//!
//! Settings come from `--config <file.json>` (or `QF_CONFIG_FILE`) and the
//! `QF_*` environment variables. Set `QF_LOG_FORMAT=json` for JSON logs and
//! `RUST_LOG` to change the log level.
mod args;
mod config;

use anyhow::Result;
use clap::Parser;
use futures::future::join_all;
use quotefeed_market_data::{
    DateRange, HistoricalQuotes, Market, QuoteDataSource, YahooFinanceDataSource,
};
use serde_json::{json, Value};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::args::{Args, Command, Target};

fn init_tracing() {
    let log_format = std::env::var("QF_LOG_FORMAT").unwrap_or_else(|_| "text".to_string());
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(filter);

    // Logs go to stderr so stdout stays valid JSON.
    if log_format.eq_ignore_ascii_case("json") {
        registry
            .with(
                fmt::layer()
                    .json()
                    .with_current_span(false)
                    .with_writer(std::io::stderr),
            )
            .init();
    } else {
        registry
            .with(
                fmt::layer()
                    .with_target(true)
                    .with_line_number(true)
                    .with_writer(std::io::stderr),
            )
            .init();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let config = config::from_env(args.config.as_deref())?;
    init_tracing();

    let source = YahooFinanceDataSource::new(&config)?;
    tracing::debug!("Using {} source, timezone {}", source.id(), config.timezone);

    let results = match args.command {
        Command::Latest(target) => latest(&source, &target).await,
        Command::History { target, start, end } => {
            let range = DateRange::new(start, end)?;
            history(&source, &target, range).await
        }
    };

    let failed = results.iter().filter(|r| r.get("error").is_some()).count();
    println!("{}", serde_json::to_string_pretty(&Value::Array(results))?);

    if failed > 0 {
        anyhow::bail!("{} ticker(s) failed", failed);
    }
    Ok(())
}

async fn latest(source: &YahooFinanceDataSource, target: &Target) -> Vec<Value> {
    let market = target.market;
    let fetches = target.tickers.iter().map(|ticker| async move {
        match source.get_most_recent_quote(market, ticker).await {
            Ok(quote) => json!({ "ticker": ticker, "market": market, "quote": quote }),
            Err(e) => failure(market, ticker, &e),
        }
    });
    join_all(fetches).await
}

async fn history(
    source: &YahooFinanceDataSource,
    target: &Target,
    range: DateRange,
) -> Vec<Value> {
    let market = target.market;
    let fetches = target.tickers.iter().map(|ticker| async move {
        match source.get_historical_quotes(market, ticker, range).await {
            Ok(HistoricalQuotes::Series(series)) => {
                let skipped: Vec<String> = series.skipped.iter().map(|e| e.to_string()).collect();
                json!({
                    "ticker": ticker,
                    "market": market,
                    "quotes": series.quotes,
                    "skipped": skipped,
                })
            }
            Ok(HistoricalQuotes::SessionUnavailable) => {
                tracing::info!("No history session for {}:{}", market, ticker);
                json!({ "ticker": ticker, "market": market, "sessionUnavailable": true })
            }
            Err(e) => failure(market, ticker, &e),
        }
    });
    join_all(fetches).await
}

fn failure(market: Market, ticker: &str, error: &dyn std::error::Error) -> Value {
    tracing::error!("Failed to fetch {}:{}: {}", market, ticker, error);
    json!({ "ticker": ticker, "market": market, "error": error.to_string() })
}
