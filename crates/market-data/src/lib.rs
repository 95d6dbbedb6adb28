//! Quotefeed Market Data Crate
//!
//! Fetches current and historical equity quotes from Yahoo Finance for
//! tickers listed on a fixed set of markets.
//!
//! # Overview
//!
//! - Market-aware identifier resolution (`VOD` on `GBR` becomes `VOD.L`)
//! - A two-phase session: the quote page yields a crumb and cookies that
//!   authorise the history download
//! - Lenient CSV parsing that skips bad rows and reports them
//! - Client-side restriction of the history to the requested date range
//!
//! # Architecture
//!
//! ```text
//! +------------------+     +------------------+
//! |  Market, ticker  | --> |    Resolver      |  (full id, e.g. "BHP.AX")
//! +------------------+     +------------------+
//!                                  |
//!                                  v
//!                          +------------------+
//!                          |  HttpTransport   |  (quote page, history CSV)
//!                          +------------------+
//!                                  |
//!                                  v
//!                          +------------------+
//!                          |   QuoteParser    |  (ParsedQuote, ParseReport)
//!                          +------------------+
//!                                  |
//!                                  v
//!                          +------------------+
//!                          |  Range filter    |  (inclusive day bounds)
//!                          +------------------+
//!                                  |
//!                                  v
//!                          +------------------+
//!                          | HistoricalQuotes |  (Series | SessionUnavailable)
//!                          +------------------+
//! ```
//!
//! # Core Types
//!
//! - [`Market`] - Supported exchanges and their Yahoo suffixes
//! - [`StockId`] - A ticker qualified by its market
//! - [`Quote`] - One price observation
//! - [`SessionToken`] - Crumb and cookies from a quote-page fetch
//! - [`YahooFinanceDataSource`] - The two-phase Yahoo source

pub mod config;
pub mod errors;
pub mod filter;
pub mod models;
pub mod parser;
pub mod provider;
pub mod resolver;
pub mod transport;

// Re-export all public types from models
pub use models::{
    Cookie, DateRange, HistoricalQuotes, Market, ParsedQuote, Quote, QuoteSeries, SessionCookies,
    SessionToken, StockId, YahooQuote, YAHOO_SOURCE,
};

pub use config::{UrlTemplate, YahooFinanceConfig};
pub use filter::filter_by_range;
pub use parser::{ParseReport, QuoteParser, YahooQuoteParser};
pub use resolver::resolve_full_id;
pub use transport::{HttpResponse, HttpTransport, ReqwestTransport};

// Re-export provider types
pub use provider::yahoo::{SessionQuote, YahooFinanceDataSource};
pub use provider::QuoteDataSource;

// Re-export error types
pub use errors::{MarketDataError, QuoteParseError};
