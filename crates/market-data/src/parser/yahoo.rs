//! Parser for Yahoo Finance quote pages and history downloads.
//!
//! The quote page embeds its application state as JSON. Two pieces are read
//! out of it:
//!
//! - `"CrumbStore":{"crumb":"..."}` - the session crumb (JSON string escapes
//!   such as `/` are decoded)
//! - `"regularMarket*"` fields of the quote summary, either as a bare number
//!   or as `{"raw": n, "fmt": "..."}`
//!
//! The history download is CSV:
//!
//! ```text
//! Date,Open,High,Low,Close,Adj Close,Volume
//! 2023-01-03,130.279999,130.899994,124.169998,125.070000,124.216301,112117500
//! ```

use std::str::FromStr;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime, TimeZone};
use chrono_tz::Tz;
use lazy_static::lazy_static;
use regex::Regex;
use rust_decimal::Decimal;

use crate::errors::QuoteParseError;
use crate::models::{Market, ParsedQuote, Quote, YahooQuote, YAHOO_SOURCE};

use super::{ParseReport, QuoteParser};

lazy_static! {
    static ref CRUMB_RE: Regex =
        Regex::new(r#""CrumbStore"\s*:\s*\{\s*"crumb"\s*:\s*"((?:[^"\\]|\\.)*)""#)
            .expect("crumb pattern");
    static ref PRICE_RE: Regex = market_field("regularMarketPrice");
    static ref OPEN_RE: Regex = market_field("regularMarketOpen");
    static ref HIGH_RE: Regex = market_field("regularMarketDayHigh");
    static ref LOW_RE: Regex = market_field("regularMarketDayLow");
    static ref VOLUME_RE: Regex = market_field("regularMarketVolume");
    static ref TIME_RE: Regex = market_field("regularMarketTime");
}

fn market_field(name: &str) -> Regex {
    Regex::new(&format!(
        r#""{}"\s*:\s*(?:\{{\s*"raw"\s*:\s*)?(-?\d+(?:\.\d+)?(?:[eE][-+]?\d+)?)"#,
        name
    ))
    .expect("market field pattern")
}

/// Marker that precedes the quoted symbol's own summary in the page.
const SUMMARY_STORE: &str = "\"QuoteSummaryStore\"";

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Parser for Yahoo Finance responses.
///
/// Trade times are expressed as wall-clock time in `timezone`.
#[derive(Clone, Debug)]
pub struct YahooQuoteParser {
    timezone: Tz,
}

impl Default for YahooQuoteParser {
    fn default() -> Self {
        Self::new(Tz::UTC)
    }
}

impl YahooQuoteParser {
    pub fn new(timezone: Tz) -> Self {
        Self { timezone }
    }

    fn extract_crumb(body: &str) -> Option<String> {
        let raw = CRUMB_RE.captures(body)?.get(1)?.as_str();
        let decoded = serde_json::from_str::<String>(&format!("\"{}\"", raw))
            .unwrap_or_else(|_| raw.to_string());
        Some(decoded)
    }

    fn extract_number(re: &Regex, scope: &str) -> Option<Decimal> {
        let text = re.captures(scope)?.get(1)?.as_str();
        parse_number(text)
    }

    fn extract_trade_time(&self, scope: &str) -> Option<NaiveDateTime> {
        let seconds: i64 = TIME_RE.captures(scope)?.get(1)?.as_str().parse().ok()?;
        self.timezone
            .timestamp_opt(seconds, 0)
            .single()
            .map(|dt| dt.naive_local())
    }
}

fn parse_number(text: &str) -> Option<Decimal> {
    Decimal::from_str(text)
        .or_else(|_| Decimal::from_scientific(text))
        .ok()
}

/// Column positions of a history CSV header.
struct Columns {
    date: usize,
    open: Option<usize>,
    high: Option<usize>,
    low: Option<usize>,
    close: usize,
    adjusted_close: Option<usize>,
    volume: Option<usize>,
}

impl Columns {
    fn from_headers(headers: &csv::StringRecord) -> Result<Self, QuoteParseError> {
        let find = |name: &str| headers.iter().position(|h| h.eq_ignore_ascii_case(name));
        let required = |name: &str| {
            find(name).ok_or_else(|| {
                QuoteParseError::UnexpectedFormat(format!("history header has no '{}' column", name))
            })
        };

        Ok(Self {
            date: required("Date")?,
            open: find("Open"),
            high: find("High"),
            low: find("Low"),
            close: required("Close")?,
            adjusted_close: find("Adj Close"),
            volume: find("Volume"),
        })
    }
}

fn cell<'r>(
    record: &'r csv::StringRecord,
    index: usize,
    name: &str,
    line: u64,
) -> Result<&'r str, QuoteParseError> {
    record.get(index).ok_or_else(|| QuoteParseError::InvalidRow {
        line,
        message: format!("missing '{}' cell", name),
    })
}

fn decimal_cell(
    record: &csv::StringRecord,
    index: usize,
    name: &str,
    line: u64,
) -> Result<Decimal, QuoteParseError> {
    let text = cell(record, index, name, line)?;
    parse_number(text).ok_or_else(|| QuoteParseError::InvalidRow {
        line,
        message: format!("'{}' is not a number: '{}'", name, text),
    })
}

fn optional_decimal_cell(
    record: &csv::StringRecord,
    index: Option<usize>,
    name: &str,
    line: u64,
) -> Result<Option<Decimal>, QuoteParseError> {
    index
        .map(|i| decimal_cell(record, i, name, line))
        .transpose()
}

fn parse_row(
    market: Market,
    ticker: &str,
    columns: &Columns,
    record: &csv::StringRecord,
    line: u64,
) -> Result<Quote, QuoteParseError> {
    let date_text = cell(record, columns.date, "Date", line)?;
    let date = NaiveDate::parse_from_str(date_text, DATE_FORMAT).map_err(|e| {
        QuoteParseError::InvalidRow {
            line,
            message: format!("bad date '{}': {}", date_text, e),
        }
    })?;

    let mut quote = Quote::new(
        market,
        ticker,
        date.and_time(NaiveTime::MIN),
        decimal_cell(record, columns.close, "Close", line)?,
        YAHOO_SOURCE,
    );
    quote.open = optional_decimal_cell(record, columns.open, "Open", line)?;
    quote.high = optional_decimal_cell(record, columns.high, "High", line)?;
    quote.low = optional_decimal_cell(record, columns.low, "Low", line)?;
    quote.adjusted_close =
        optional_decimal_cell(record, columns.adjusted_close, "Adj Close", line)?;
    quote.volume = optional_decimal_cell(record, columns.volume, "Volume", line)?;
    Ok(quote)
}

impl QuoteParser for YahooQuoteParser {
    fn parse_single(
        &self,
        market: Market,
        ticker: &str,
        body: &str,
    ) -> Result<ParsedQuote, QuoteParseError> {
        let crumb = Self::extract_crumb(body);

        let scope = body
            .find(SUMMARY_STORE)
            .map(|i| &body[i..])
            .unwrap_or(body);

        let close = Self::extract_number(&PRICE_RE, scope).ok_or(QuoteParseError::MissingField {
            field: "regularMarketPrice",
        })?;
        let trade_date_time =
            self.extract_trade_time(scope)
                .ok_or(QuoteParseError::MissingField {
                    field: "regularMarketTime",
                })?;

        let mut quote = Quote::new(market, ticker, trade_date_time, close, YAHOO_SOURCE);
        quote.open = Self::extract_number(&OPEN_RE, scope);
        quote.high = Self::extract_number(&HIGH_RE, scope);
        quote.low = Self::extract_number(&LOW_RE, scope);
        quote.volume = Self::extract_number(&VOLUME_RE, scope);

        Ok(ParsedQuote::Yahoo(YahooQuote { quote, crumb }))
    }

    fn parse_multiple(
        &self,
        market: Market,
        ticker: &str,
        body: &str,
    ) -> Result<ParseReport<Vec<Quote>>, QuoteParseError> {
        if body.trim().is_empty() {
            return Ok(ParseReport::new(Vec::new()));
        }

        let mut reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .flexible(true)
            .from_reader(body.as_bytes());

        let headers = reader
            .headers()
            .map_err(|e| QuoteParseError::UnexpectedFormat(e.to_string()))?
            .clone();
        let columns = Columns::from_headers(&headers)?;

        let mut quotes = Vec::new();
        let mut errors = Vec::new();

        for result in reader.records() {
            let row = result
                .map_err(|e| QuoteParseError::InvalidRow {
                    line: e.position().map(|p| p.line()).unwrap_or(0),
                    message: e.to_string(),
                })
                .and_then(|record| {
                    let line = record.position().map(|p| p.line()).unwrap_or(0);
                    parse_row(market, ticker, &columns, &record, line)
                });

            match row {
                Ok(quote) => quotes.push(quote),
                Err(e) => errors.push(e),
            }
        }

        Ok(ParseReport::with_errors(quotes, errors))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    const QUOTE_PAGE: &str = r#"<html><script>root.App.main = {"context":{"dispatcher":{"stores":{
        "CrumbStore":{"crumb":"Xy7/ab.Q1"},
        "StreamDataStore":{"quoteData":{"MSFT":{"regularMarketPrice":{"raw":239.58}}}},
        "QuoteSummaryStore":{"price":{
            "regularMarketOpen":{"raw":130.28,"fmt":"130.28"},
            "regularMarketDayHigh":{"raw":130.9,"fmt":"130.90"},
            "regularMarketDayLow":{"raw":124.17,"fmt":"124.17"},
            "regularMarketPrice":{"raw":125.07,"fmt":"125.07"},
            "regularMarketVolume":{"raw":112117471,"fmt":"112.12M"},
            "regularMarketTime":1672779604
        }}}}}};</script></html>"#;

    const HISTORY_CSV: &str = "Date,Open,High,Low,Close,Adj Close,Volume\n\
        2023-01-03,130.279999,130.899994,124.169998,125.070000,124.216301,112117500\n\
        2023-01-04,126.889999,128.660004,125.080002,126.360001,125.497498,89113600\n";

    #[test]
    fn test_parse_single_reads_crumb_and_summary_price() {
        let parser = YahooQuoteParser::default();
        let parsed = parser.parse_single(Market::Usa, "AAPL", QUOTE_PAGE).unwrap();

        assert_eq!(parsed.crumb(), Some("Xy7/ab.Q1"));
        let quote = parsed.quote();
        // the streamed MSFT price earlier in the page must not be picked up
        assert_eq!(quote.close, dec!(125.07));
        assert_eq!(quote.open, Some(dec!(130.28)));
        assert_eq!(quote.high, Some(dec!(130.9)));
        assert_eq!(quote.low, Some(dec!(124.17)));
        assert_eq!(quote.volume, Some(dec!(112117471)));
        assert_eq!(quote.trade_date_time.to_string(), "2023-01-03 21:00:04");
        assert_eq!(quote.ticker, "AAPL");
        assert_eq!(quote.source, YAHOO_SOURCE);
    }

    #[test]
    fn test_parse_single_uses_configured_timezone() {
        let parser = YahooQuoteParser::new(chrono_tz::America::New_York);
        let parsed = parser.parse_single(Market::Usa, "AAPL", QUOTE_PAGE).unwrap();
        assert_eq!(
            parsed.quote().trade_date_time.to_string(),
            "2023-01-03 16:00:04"
        );
    }

    #[test]
    fn test_parse_single_without_crumb() {
        let body = r#"{"regularMarketPrice":12.5,"regularMarketTime":1672779604}"#;
        let parsed = YahooQuoteParser::default()
            .parse_single(Market::Gbr, "VOD", body)
            .unwrap();
        assert!(matches!(&parsed, ParsedQuote::Yahoo(y) if y.crumb.is_none()));
        assert_eq!(parsed.crumb(), None);
        assert_eq!(parsed.quote().close, dec!(12.5));
    }

    #[test]
    fn test_parse_single_without_price_fails() {
        let err = YahooQuoteParser::default()
            .parse_single(Market::Usa, "NOPE", "<html>Symbol not found</html>")
            .unwrap_err();
        assert_eq!(
            err,
            QuoteParseError::MissingField {
                field: "regularMarketPrice"
            }
        );
    }

    #[test]
    fn test_parse_multiple() {
        let report = YahooQuoteParser::default()
            .parse_multiple(Market::Usa, "AAPL", HISTORY_CSV)
            .unwrap();

        assert!(report.is_clean());
        assert_eq!(report.value.len(), 2);
        let first = &report.value[0];
        assert_eq!(first.trade_date_time.to_string(), "2023-01-03 00:00:00");
        assert_eq!(first.close, dec!(125.070000));
        assert_eq!(first.adjusted_close, Some(dec!(124.216301)));
        assert_eq!(first.volume, Some(dec!(112117500)));
    }

    #[test]
    fn test_parse_multiple_skips_bad_rows() {
        let body = "Date,Open,High,Low,Close,Adj Close,Volume\n\
            2023-01-03,130.28,130.90,124.17,125.07,124.21,112117500\n\
            2023-01-04,null,null,null,null,null,null\n\
            not-a-date,1,1,1,1,1,1\n\
            2023-01-05,127.13,127.77,124.76,125.02,124.16,80962700\n";

        let report = YahooQuoteParser::default()
            .parse_multiple(Market::Usa, "AAPL", body)
            .unwrap();

        let dates: Vec<String> = report
            .value
            .iter()
            .map(|q| q.trade_date_time.date().to_string())
            .collect();
        assert_eq!(dates, vec!["2023-01-03", "2023-01-05"]);
        assert_eq!(report.errors.len(), 2);
        assert!(matches!(report.errors[0], QuoteParseError::InvalidRow { line: 3, .. }));
        assert!(matches!(report.errors[1], QuoteParseError::InvalidRow { line: 4, .. }));
    }

    #[test]
    fn test_parse_multiple_empty_body() {
        let report = YahooQuoteParser::default()
            .parse_multiple(Market::Usa, "AAPL", "  \n")
            .unwrap();
        assert!(report.value.is_empty());
        assert!(report.is_clean());
    }

    #[test]
    fn test_parse_multiple_rejects_non_csv() {
        let err = YahooQuoteParser::default()
            .parse_multiple(Market::Usa, "AAPL", "<html>Invalid cookie</html>")
            .unwrap_err();
        assert!(matches!(err, QuoteParseError::UnexpectedFormat(_)));
    }

    #[test]
    fn test_parse_multiple_header_only() {
        let report = YahooQuoteParser::default()
            .parse_multiple(Market::Usa, "AAPL", "Date,Open,High,Low,Close,Adj Close,Volume\n")
            .unwrap();
        assert!(report.value.is_empty());
    }
}
