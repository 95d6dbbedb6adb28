//! Response body parsers.
//!
//! A parser turns the raw text of a response into quotes. Failures are
//! reported per unit: a malformed row becomes an entry in
//! [`ParseReport::errors`] and parsing carries on with the next row. Only a
//! body that cannot be read at all fails the whole call.

mod yahoo;

use crate::errors::QuoteParseError;
use crate::models::{Market, ParsedQuote, Quote};

pub use yahoo::YahooQuoteParser;

/// A parsed value together with the recoverable errors met while building it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParseReport<T> {
    pub value: T,
    pub errors: Vec<QuoteParseError>,
}

impl<T> ParseReport<T> {
    pub fn new(value: T) -> Self {
        Self {
            value,
            errors: Vec::new(),
        }
    }

    pub fn with_errors(value: T, errors: Vec<QuoteParseError>) -> Self {
        Self { value, errors }
    }

    pub fn is_clean(&self) -> bool {
        self.errors.is_empty()
    }
}

pub trait QuoteParser: Send + Sync {
    /// Parse a current-quote response.
    ///
    /// Session-aware parsers return [`ParsedQuote::Yahoo`] with the crumb
    /// found in the body, if any.
    fn parse_single(
        &self,
        market: Market,
        ticker: &str,
        body: &str,
    ) -> Result<ParsedQuote, QuoteParseError>;

    /// Parse a historical response into quotes in body order.
    fn parse_multiple(
        &self,
        market: Market,
        ticker: &str,
        body: &str,
    ) -> Result<ParseReport<Vec<Quote>>, QuoteParseError>;
}
