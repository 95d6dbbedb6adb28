//! Command-line arguments for `quotefeed`.
use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Args as ClapArgs, Parser, Subcommand};
use quotefeed_market_data::Market;

/// Fetch equity quotes from Yahoo Finance.
#[derive(Debug, Parser)]
#[command(name = "quotefeed", version, about, long_about = None)]
pub struct Args {
    /// JSON file with source settings (URL templates, timezone, timeout).
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Print the most recent quote of each ticker.
    Latest(Target),

    /// Print daily quotes of each ticker between two days, inclusive.
    History {
        #[command(flatten)]
        target: Target,

        /// First day, YYYY-MM-DD.
        #[arg(long)]
        start: NaiveDate,

        /// Last day, YYYY-MM-DD.
        #[arg(long)]
        end: NaiveDate,
    },
}

#[derive(Debug, ClapArgs)]
pub struct Target {
    /// Market code, e.g. USA, GBR, AUS.
    #[arg(long, default_value = "USA")]
    pub market: Market,

    /// Ticker without market suffix. Repeat for several tickers.
    #[arg(long = "ticker", required = true)]
    pub tickers: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_latest() {
        let args = Args::parse_from([
            "quotefeed", "latest", "--market", "gbr", "--ticker", "VOD", "--ticker", "BP",
        ]);
        match args.command {
            Command::Latest(target) => {
                assert_eq!(target.market, Market::Gbr);
                assert_eq!(target.tickers, vec!["VOD", "BP"]);
            }
            other => panic!("unexpected command {:?}", other),
        }
        assert!(args.config.is_none());
    }

    #[test]
    fn test_parse_history() {
        let args = Args::parse_from([
            "quotefeed",
            "history",
            "--ticker",
            "AAPL",
            "--start",
            "2023-01-02",
            "--end",
            "2023-01-05",
            "--config",
            "qf.json",
        ]);
        match args.command {
            Command::History { target, start, end } => {
                assert_eq!(target.market, Market::Usa);
                assert_eq!(start, NaiveDate::from_ymd_opt(2023, 1, 2).unwrap());
                assert_eq!(end, NaiveDate::from_ymd_opt(2023, 1, 5).unwrap());
            }
            other => panic!("unexpected command {:?}", other),
        }
        assert_eq!(args.config, Some(PathBuf::from("qf.json")));
    }

    #[test]
    fn test_rejects_unknown_market() {
        let result = Args::try_parse_from(["quotefeed", "latest", "--market", "XYZ", "--ticker", "A"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_requires_ticker() {
        assert!(Args::try_parse_from(["quotefeed", "latest"]).is_err());
    }
}
