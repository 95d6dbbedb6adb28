use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::market::Market;
use crate::errors::QuoteParseError;

/// Source tag stamped on quotes parsed from Yahoo Finance responses.
pub const YAHOO_SOURCE: &str = "YAHOO";

/// One priced observation of a stock.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Quote {
    pub market: Market,

    /// Ticker as the caller supplied it (without market suffix)
    pub ticker: String,

    /// Trade time, wall clock in the source's configured timezone
    pub trade_date_time: NaiveDateTime,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub open: Option<Decimal>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub high: Option<Decimal>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub low: Option<Decimal>,

    /// Closing/current price (required)
    pub close: Decimal,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub adjusted_close: Option<Decimal>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub volume: Option<Decimal>,

    /// Source of the quote (YAHOO, ...)
    pub source: String,
}

impl Quote {
    /// Create a new quote with minimal required fields
    pub fn new(
        market: Market,
        ticker: impl Into<String>,
        trade_date_time: NaiveDateTime,
        close: Decimal,
        source: impl Into<String>,
    ) -> Self {
        Self {
            market,
            ticker: ticker.into(),
            trade_date_time,
            open: None,
            high: None,
            low: None,
            close,
            adjusted_close: None,
            volume: None,
            source: source.into(),
        }
    }
}

/// Current quote as read from a Yahoo quote page, with the session crumb
/// embedded in the same page.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct YahooQuote {
    pub quote: Quote,
    pub crumb: Option<String>,
}

/// Result of single-quote parsing.
///
/// Only the [`ParsedQuote::Yahoo`] variant can open a historical session.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ParsedQuote {
    Yahoo(YahooQuote),
    /// A quote from a parser that knows nothing about sessions.
    Basic(Quote),
}

impl ParsedQuote {
    pub fn quote(&self) -> &Quote {
        match self {
            ParsedQuote::Yahoo(yahoo) => &yahoo.quote,
            ParsedQuote::Basic(quote) => quote,
        }
    }

    pub fn into_quote(self) -> Quote {
        match self {
            ParsedQuote::Yahoo(yahoo) => yahoo.quote,
            ParsedQuote::Basic(quote) => quote,
        }
    }

    /// The crumb, if this is the Yahoo variant and the crumb is non-empty.
    pub fn crumb(&self) -> Option<&str> {
        match self {
            ParsedQuote::Yahoo(YahooQuote {
                crumb: Some(crumb), ..
            }) if !crumb.is_empty() => Some(crumb),
            _ => None,
        }
    }
}

/// Historical quotes as returned by the source, plus the rows that had to be
/// dropped on the way.
///
/// Order is the source's order; no sorting or deduplication is applied.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct QuoteSeries {
    pub quotes: Vec<Quote>,
    pub skipped: Vec<QuoteParseError>,
}

impl QuoteSeries {
    pub fn len(&self) -> usize {
        self.quotes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.quotes.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Quote> {
        self.quotes.iter()
    }
}

/// Outcome of a historical quote request.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum HistoricalQuotes {
    Series(QuoteSeries),
    /// The quote page did not hand out a usable crumb, so no history was requested.
    SessionUnavailable,
}

impl HistoricalQuotes {
    pub fn into_series(self) -> Option<QuoteSeries> {
        match self {
            HistoricalQuotes::Series(series) => Some(series),
            HistoricalQuotes::SessionUnavailable => None,
        }
    }

    pub fn is_session_unavailable(&self) -> bool {
        matches!(self, HistoricalQuotes::SessionUnavailable)
    }
}
