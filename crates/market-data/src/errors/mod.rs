//! Error types for the market data crate.
//!
//! This module provides:
//! - [`MarketDataError`]: The main error enum for all data source operations
//! - [`QuoteParseError`]: Errors raised while turning response bodies into quotes

mod parse;

pub use parse::QuoteParseError;

use chrono::NaiveDate;
use thiserror::Error;

/// Errors that can occur during market data operations.
///
/// A missing session crumb is deliberately *not* represented here: it is a
/// normal outcome of a historical fetch (see
/// [`HistoricalQuotes::SessionUnavailable`](crate::HistoricalQuotes)).
#[derive(Error, Debug)]
pub enum MarketDataError {
    /// The HTTP request could not be completed (DNS, connection reset, TLS, ...).
    #[error("Transport error for {url}: {message}")]
    Transport {
        /// The URL that was requested
        url: String,
        /// The underlying failure
        message: String,
    },

    /// The HTTP request timed out.
    #[error("Timeout: {url}")]
    Timeout {
        /// The URL that was requested
        url: String,
    },

    /// The server answered with a non-success status code.
    #[error("HTTP {status} from {url}")]
    HttpStatus {
        /// The URL that was requested
        url: String,
        /// The HTTP status code
        status: u16,
    },

    /// The response body could not be interpreted at all.
    /// Row-level failures never surface here; they are collected on the series.
    #[error("Parse error: {0}")]
    Parse(#[from] QuoteParseError),

    /// Configuration is unusable (bad URL template, unreadable file, ...).
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// The market code is not one we know a suffix for.
    #[error("Unknown market: {0}")]
    UnknownMarket(String),

    /// The requested range ends before it starts.
    #[error("Invalid date range: {start} is after {end}")]
    InvalidDateRange {
        /// First day of the range
        start: NaiveDate,
        /// Last day of the range
        end: NaiveDate,
    },
}

impl MarketDataError {
    /// Whether this error came from the network call itself.
    ///
    /// # Examples
    ///
    /// ```
    /// use quotefeed_market_data::errors::MarketDataError;
    ///
    /// let error = MarketDataError::HttpStatus { url: "https://x".to_string(), status: 503 };
    /// assert!(error.is_transport());
    ///
    /// let error = MarketDataError::UnknownMarket("XYZ".to_string());
    /// assert!(!error.is_transport());
    /// ```
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            Self::Transport { .. } | Self::Timeout { .. } | Self::HttpStatus { .. }
        )
    }
}
