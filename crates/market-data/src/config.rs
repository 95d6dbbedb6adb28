//! Data source configuration.
//!
//! URL templates use positional slots `{0}`, `{1}`, ... that are filled in
//! order when a request is built. The same slot may appear several times.

use std::fs;
use std::path::Path;
use std::time::Duration;

use chrono_tz::Tz;
use reqwest::header::HeaderValue;
use serde::{Deserialize, Serialize};

use crate::errors::MarketDataError;

/// Default current-quote page. Slot: identifier.
pub const DEFAULT_QUOTE_URL: &str = "https://finance.yahoo.com/quote/{0}/history?p={0}";

/// Default history download. Slots: identifier, start, end, crumb.
pub const DEFAULT_HISTORICAL_DATA_URL: &str = "https://query1.finance.yahoo.com/v7/finance/download/{0}?period1={1}&period2={2}&interval=1d&events=history&crumb={3}";

pub const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36";

/// Yahoo Finance data source configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct YahooFinanceConfig {
    /// Current-quote page template (one slot: identifier)
    pub quote_url: String,
    /// History template (four slots: identifier, start, end, crumb)
    pub historical_data_url: String,
    /// Timezone used to turn calendar days into epoch seconds and back
    pub timezone: Tz,
    /// Per-request timeout
    pub request_timeout_secs: u64,
    pub user_agent: String,
}

impl Default for YahooFinanceConfig {
    fn default() -> Self {
        Self {
            quote_url: DEFAULT_QUOTE_URL.to_string(),
            historical_data_url: DEFAULT_HISTORICAL_DATA_URL.to_string(),
            timezone: Tz::UTC,
            request_timeout_secs: 30,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

impl YahooFinanceConfig {
    /// Load configuration from a JSON file. Missing keys take their defaults.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, MarketDataError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            MarketDataError::InvalidConfig(format!("cannot read {}: {}", path.display(), e))
        })?;
        let config: YahooFinanceConfig = serde_json::from_str(&content).map_err(|e| {
            MarketDataError::InvalidConfig(format!("cannot parse {}: {}", path.display(), e))
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Check both URL templates have the slots they need and the user agent
    /// is a valid header value.
    pub fn validate(&self) -> Result<(), MarketDataError> {
        self.quote_template()?;
        self.historical_template()?;
        HeaderValue::from_str(&self.user_agent).map_err(|_| {
            MarketDataError::InvalidConfig(format!(
                "user agent {:?} is not a valid header value",
                self.user_agent
            ))
        })?;
        Ok(())
    }

    pub fn quote_template(&self) -> Result<UrlTemplate, MarketDataError> {
        UrlTemplate::parse(&self.quote_url, 1)
    }

    pub fn historical_template(&self) -> Result<UrlTemplate, MarketDataError> {
        UrlTemplate::parse(&self.historical_data_url, 4)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Slot(usize),
}

/// A URL with numbered substitution slots.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UrlTemplate {
    segments: Vec<Segment>,
    slots: usize,
}

impl UrlTemplate {
    /// Parse `template`, requiring exactly the slots `{0}..{slots-1}`.
    pub fn parse(template: &str, slots: usize) -> Result<Self, MarketDataError> {
        let mut segments = Vec::new();
        let mut literal = String::new();
        let mut rest = template;

        while let Some(open) = rest.find('{') {
            literal.push_str(&rest[..open]);
            let after = &rest[open + 1..];
            let index = after
                .find('}')
                .and_then(|close| after[..close].parse::<usize>().ok().map(|i| (i, close)));
            match index {
                Some((index, close)) => {
                    if !literal.is_empty() {
                        segments.push(Segment::Literal(std::mem::take(&mut literal)));
                    }
                    segments.push(Segment::Slot(index));
                    rest = &after[close + 1..];
                }
                None => {
                    literal.push('{');
                    rest = after;
                }
            }
        }
        literal.push_str(rest);
        if !literal.is_empty() {
            segments.push(Segment::Literal(literal));
        }

        let used: Vec<usize> = segments
            .iter()
            .filter_map(|s| match s {
                Segment::Slot(i) => Some(*i),
                Segment::Literal(_) => None,
            })
            .collect();
        if let Some(out_of_range) = used.iter().find(|i| **i >= slots) {
            return Err(MarketDataError::InvalidConfig(format!(
                "template '{}' uses slot {{{}}} but only {} are supplied",
                template, out_of_range, slots
            )));
        }
        if let Some(missing) = (0..slots).find(|i| !used.contains(i)) {
            return Err(MarketDataError::InvalidConfig(format!(
                "template '{}' is missing slot {{{}}}",
                template, missing
            )));
        }

        Ok(Self { segments, slots })
    }

    /// Fill the slots with `values` in order.
    ///
    /// `values` must hold one entry per slot; this is checked in debug builds.
    pub fn render(&self, values: &[&str]) -> String {
        debug_assert_eq!(values.len(), self.slots);
        self.segments
            .iter()
            .map(|segment| match segment {
                Segment::Literal(text) => text.as_str(),
                Segment::Slot(i) => values.get(*i).copied().unwrap_or_default(),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_templates_are_valid() {
        YahooFinanceConfig::default().validate().unwrap();
    }

    #[test]
    fn test_render_repeats_slot() {
        let template = UrlTemplate::parse(DEFAULT_QUOTE_URL, 1).unwrap();
        assert_eq!(
            template.render(&["VOD.L"]),
            "https://finance.yahoo.com/quote/VOD.L/history?p=VOD.L"
        );
    }

    #[test]
    fn test_render_historical_in_order() {
        let template = UrlTemplate::parse("https://h/{0}?a={1}&b={2}&c={3}", 4).unwrap();
        assert_eq!(
            template.render(&["AAPL", "1", "2", "crumb"]),
            "https://h/AAPL?a=1&b=2&c=crumb"
        );
    }

    #[test]
    fn test_non_numeric_braces_are_literal() {
        let template = UrlTemplate::parse("https://h/{x}/{0}", 1).unwrap();
        assert_eq!(template.render(&["A"]), "https://h/{x}/A");
    }

    #[test]
    fn test_missing_slot_is_rejected() {
        let err = UrlTemplate::parse("https://h/{0}?a={1}&c={3}", 4).unwrap_err();
        assert!(matches!(err, MarketDataError::InvalidConfig(msg) if msg.contains("{2}")));
    }

    #[test]
    fn test_extra_slot_is_rejected() {
        let err = UrlTemplate::parse("https://h/{0}/{1}", 1).unwrap_err();
        assert!(matches!(err, MarketDataError::InvalidConfig(_)));
    }

    #[test]
    fn test_from_file_fills_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"quoteUrl": "http://localhost/q/{{0}}", "timezone": "Europe/London"}}"#
        )
        .unwrap();

        let config = YahooFinanceConfig::from_file(file.path()).unwrap();
        assert_eq!(config.quote_url, "http://localhost/q/{0}");
        assert_eq!(config.timezone, chrono_tz::Europe::London);
        assert_eq!(config.historical_data_url, DEFAULT_HISTORICAL_DATA_URL);
        assert_eq!(config.request_timeout(), Duration::from_secs(30));
    }

    #[test]
    fn test_from_file_rejects_bad_user_agent() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"userAgent": "bad\nagent"}}"#).unwrap();

        let err = YahooFinanceConfig::from_file(file.path()).unwrap_err();
        assert!(matches!(err, MarketDataError::InvalidConfig(msg) if msg.contains("user agent")));
    }

    #[test]
    fn test_from_file_rejects_bad_template() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"historicalDataUrl": "http://localhost/h/{{0}}"}}"#).unwrap();

        let err = YahooFinanceConfig::from_file(file.path()).unwrap_err();
        assert!(matches!(err, MarketDataError::InvalidConfig(_)));
    }
}
