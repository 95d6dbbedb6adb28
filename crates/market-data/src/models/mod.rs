//! Market data models
//!
//! This module contains the core data types for quote fetching:
//! - `market` - Listing market and its exchange suffix (Market)
//! - `stock_id` - Market + raw ticker (StockId)
//! - `date_range` - Inclusive day window and its epoch bounds (DateRange)
//! - `quote` - Quote data structures (Quote, ParsedQuote, QuoteSeries, HistoricalQuotes)
//! - `session` - Session cookies and crumb (Cookie, SessionCookies, SessionToken)

mod date_range;
mod market;
mod quote;
mod session;
mod stock_id;

pub use date_range::DateRange;
pub use market::Market;
pub use quote::{HistoricalQuotes, ParsedQuote, Quote, QuoteSeries, YahooQuote, YAHOO_SOURCE};
pub use session::{Cookie, SessionCookies, SessionToken};
pub use stock_id::StockId;
