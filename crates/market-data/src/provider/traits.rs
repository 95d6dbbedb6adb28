//! Quote data source trait definitions.
//!
//! This module defines the capability trait that every quote source
//! implements.

use async_trait::async_trait;

use crate::errors::MarketDataError;
use crate::models::{DateRange, HistoricalQuotes, Market, Quote};

/// Trait for quote data sources.
///
/// Implementations hold no per-request state, so one instance can serve
/// concurrent requests for different tickers.
///
/// # Example
///
/// ```ignore
/// use quotefeed_market_data::{Market, QuoteDataSource, YahooFinanceConfig, YahooFinanceDataSource};
///
/// let source = YahooFinanceDataSource::new(&YahooFinanceConfig::default())?;
/// let quote = source.get_most_recent_quote(Market::Gbr, "VOD").await?;
/// ```
#[async_trait]
pub trait QuoteDataSource: Send + Sync {
    /// Unique identifier for this source, e.g. "YAHOO".
    fn id(&self) -> &'static str;

    /// Fetch the current quote for `ticker` on `market`.
    ///
    /// # Returns
    ///
    /// The parsed quote, or a transport / parse error.
    async fn get_most_recent_quote(
        &self,
        market: Market,
        ticker: &str,
    ) -> Result<Quote, MarketDataError>;

    /// Fetch daily quotes for `ticker` on `market` within `range`.
    ///
    /// # Returns
    ///
    /// - `Ok(HistoricalQuotes::Series(..))` - quotes inside the range, in
    ///   source order, with any skipped rows listed
    /// - `Ok(HistoricalQuotes::SessionUnavailable)` - the source could not
    ///   open a session, so no history was requested
    /// - `Err(..)` - transport failure or unreadable history body
    async fn get_historical_quotes(
        &self,
        market: Market,
        ticker: &str,
        range: DateRange,
    ) -> Result<HistoricalQuotes, MarketDataError>;
}
