//! Yahoo Finance quote source.
//!
//! Historical prices sit behind a two-phase session:
//!
//! ```text
//!   quote page (no cookies) ──▶ body + Set-Cookie
//!          │                        │
//!          ▼                        ▼
//!   parse_single ──▶ crumb   +   cookies  = SessionToken
//!                                   │
//!                                   ▼
//!   history URL(id, start, end, crumb) + Cookie ──▶ CSV ──▶ parse_multiple ──▶ filter
//! ```
//!
//! Without a crumb there is no phase two: the call returns
//! [`HistoricalQuotes::SessionUnavailable`]. The token lives only for the
//! duration of one call; nothing is cached between calls.

use std::sync::Arc;

use async_trait::async_trait;
use chrono_tz::Tz;
use log::{debug, info, warn};
use urlencoding::encode;

use crate::config::{UrlTemplate, YahooFinanceConfig};
use crate::errors::MarketDataError;
use crate::filter::filter_by_range;
use crate::models::{
    DateRange, HistoricalQuotes, Market, ParsedQuote, Quote, QuoteSeries, SessionCookies,
    SessionToken, StockId,
};
use crate::parser::{ParseReport, QuoteParser, YahooQuoteParser};
use crate::provider::QuoteDataSource;
use crate::transport::{HttpTransport, ReqwestTransport};

const PROVIDER_ID: &str = "YAHOO";

/// Phase-one result: the current quote and the cookies that came with it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SessionQuote {
    pub quote: ParsedQuote,
    pub cookies: SessionCookies,
}

impl SessionQuote {
    /// The session token, if the page handed out a usable crumb.
    pub fn token(&self) -> Option<SessionToken> {
        SessionToken::from_session(&self.quote, self.cookies.clone())
    }
}

// ============================================================================
// Yahoo Finance Data Source
// ============================================================================

/// Yahoo Finance quote source.
///
/// # Example
///
/// ```ignore
/// let source = YahooFinanceDataSource::new(&YahooFinanceConfig::default())?;
/// let range = DateRange::new(start, end)?;
/// match source.get_historical_quotes(Market::Usa, "AAPL", range).await? {
///     HistoricalQuotes::Series(series) => println!("{} quotes", series.len()),
///     HistoricalQuotes::SessionUnavailable => println!("no session"),
/// }
/// ```
pub struct YahooFinanceDataSource {
    quote_template: UrlTemplate,
    historical_template: UrlTemplate,
    timezone: Tz,
    transport: Arc<dyn HttpTransport>,
    parser: Arc<dyn QuoteParser>,
}

impl YahooFinanceDataSource {
    /// Create a source using the `reqwest` transport and the Yahoo parser.
    pub fn new(config: &YahooFinanceConfig) -> Result<Self, MarketDataError> {
        Self::with_collaborators(
            config,
            Arc::new(ReqwestTransport::new(config)?),
            Arc::new(YahooQuoteParser::new(config.timezone)),
        )
    }

    /// Create a source with explicit transport and parser.
    pub fn with_collaborators(
        config: &YahooFinanceConfig,
        transport: Arc<dyn HttpTransport>,
        parser: Arc<dyn QuoteParser>,
    ) -> Result<Self, MarketDataError> {
        Ok(Self {
            quote_template: config.quote_template()?,
            historical_template: config.historical_template()?,
            timezone: config.timezone,
            transport,
            parser,
        })
    }

    // ========================================================================
    // Phase One: Session Quote
    // ========================================================================

    /// Fetch the quote page without cookies and parse it.
    pub async fn fetch_session_quote(
        &self,
        stock: &StockId,
    ) -> Result<SessionQuote, MarketDataError> {
        let full_id = stock.full_id();
        let encoded_id = encode(&full_id);
        let url = self.quote_template.render(&[encoded_id.as_ref()]);

        debug!("Fetching session quote for {} from Yahoo", full_id);

        let response = self.transport.fetch(&url, None).await?;
        let quote = self
            .parser
            .parse_single(stock.market, &stock.ticker, &response.body)?;

        Ok(SessionQuote {
            quote,
            cookies: response.cookies,
        })
    }

    // ========================================================================
    // Phase Two: History
    // ========================================================================

    /// Fetch the history download using a session token from phase one.
    ///
    /// The returned quotes are not yet restricted to `range`.
    pub async fn fetch_history(
        &self,
        stock: &StockId,
        range: &DateRange,
        token: &SessionToken,
    ) -> Result<ParseReport<Vec<Quote>>, MarketDataError> {
        let full_id = stock.full_id();
        let (start, end) = range.epoch_bounds(self.timezone);
        let encoded_id = encode(&full_id);
        let encoded_crumb = encode(token.crumb());
        let (start_text, end_text) = (start.to_string(), end.to_string());
        let url = self.historical_template.render(&[
            encoded_id.as_ref(),
            start_text.as_str(),
            end_text.as_str(),
            encoded_crumb.as_ref(),
        ]);

        debug!(
            "Fetching history for {} from {} to {} ({}..{}) with {} cookies",
            full_id,
            range.start(),
            range.end(),
            start,
            end,
            token.cookies().len()
        );

        let response = self.transport.fetch(&url, Some(token.cookies())).await?;
        let report = self
            .parser
            .parse_multiple(stock.market, &stock.ticker, &response.body)?;

        Ok(report)
    }
}

// ============================================================================
// QuoteDataSource Implementation
// ============================================================================

#[async_trait]
impl QuoteDataSource for YahooFinanceDataSource {
    fn id(&self) -> &'static str {
        PROVIDER_ID
    }

    async fn get_most_recent_quote(
        &self,
        market: Market,
        ticker: &str,
    ) -> Result<Quote, MarketDataError> {
        let stock = StockId::new(market, ticker);
        let session = self.fetch_session_quote(&stock).await?;
        Ok(session.quote.into_quote())
    }

    async fn get_historical_quotes(
        &self,
        market: Market,
        ticker: &str,
        range: DateRange,
    ) -> Result<HistoricalQuotes, MarketDataError> {
        let stock = StockId::new(market, ticker);

        let session = match self.fetch_session_quote(&stock).await {
            Ok(session) => session,
            Err(MarketDataError::Parse(e)) => {
                info!("No session for {}: quote page unreadable ({})", stock, e);
                return Ok(HistoricalQuotes::SessionUnavailable);
            }
            Err(e) => return Err(e),
        };

        let Some(token) = session.token() else {
            info!("No session for {}: quote page carried no crumb", stock);
            return Ok(HistoricalQuotes::SessionUnavailable);
        };

        let report = self.fetch_history(&stock, &range, &token).await?;
        for error in &report.errors {
            warn!("Skipping history row for {}: {}", stock, error);
        }

        let fetched = report.value.len();
        let quotes = filter_by_range(report.value, &range);
        debug!(
            "Kept {} of {} history rows for {} ({} skipped)",
            quotes.len(),
            fetched,
            stock,
            report.errors.len()
        );

        Ok(HistoricalQuotes::Series(QuoteSeries {
            quotes,
            skipped: report.errors,
        }))
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_id() {
        let source = YahooFinanceDataSource::new(&YahooFinanceConfig::default()).unwrap();
        assert_eq!(source.id(), "YAHOO");
    }

    #[test]
    fn test_rejects_invalid_templates() {
        let config = YahooFinanceConfig {
            historical_data_url: "https://example.com/{0}?crumb={3}".to_string(),
            ..Default::default()
        };
        let err = YahooFinanceDataSource::new(&config).err().unwrap();
        assert!(matches!(err, MarketDataError::InvalidConfig(_)));
    }

    #[test]
    fn test_rejects_invalid_user_agent() {
        let config = YahooFinanceConfig {
            user_agent: "bad\nagent".to_string(),
            request_timeout_secs: 1,
            ..Default::default()
        };
        let err = YahooFinanceDataSource::new(&config).err().unwrap();
        assert!(matches!(err, MarketDataError::InvalidConfig(_)));
    }

    #[test]
    fn test_session_quote_token_requires_crumb() {
        use crate::models::{Cookie, YahooQuote, YAHOO_SOURCE};
        use chrono::NaiveDate;
        use rust_decimal_macros::dec;

        let ts = NaiveDate::from_ymd_opt(2023, 1, 3)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        let quote = Quote::new(Market::Usa, "AAPL", ts, dec!(1), YAHOO_SOURCE);
        let cookies: SessionCookies = [Cookie::new("B", "x")].into_iter().collect();

        let session = SessionQuote {
            quote: ParsedQuote::Basic(quote.clone()),
            cookies: cookies.clone(),
        };
        assert!(session.token().is_none());

        let session = SessionQuote {
            quote: ParsedQuote::Yahoo(YahooQuote {
                quote,
                crumb: Some("abc".to_string()),
            }),
            cookies,
        };
        assert_eq!(session.token().unwrap().crumb(), "abc");
    }
}
