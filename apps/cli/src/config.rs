use std::path::Path;

use anyhow::{Context, Result};
use chrono_tz::Tz;
use quotefeed_market_data::YahooFinanceConfig;

pub const ENV_CONFIG_FILE: &str = "QF_CONFIG_FILE";
pub const ENV_QUOTE_URL: &str = "QF_QUOTE_URL";
pub const ENV_HISTORICAL_URL: &str = "QF_HISTORICAL_URL";
pub const ENV_TIMEZONE: &str = "QF_TIMEZONE";
pub const ENV_REQUEST_TIMEOUT_SECS: &str = "QF_REQUEST_TIMEOUT_SECS";
pub const ENV_USER_AGENT: &str = "QF_USER_AGENT";

/// Build the source configuration from an optional JSON file and `QF_*`
/// environment variables. Variables win over the file.
///
/// A `.env` file in the working directory is loaded first if present.
pub fn from_env(config_path: Option<&Path>) -> Result<YahooFinanceConfig> {
    dotenvy::dotenv().ok();

    let file = config_path
        .map(Path::to_path_buf)
        .or_else(|| std::env::var(ENV_CONFIG_FILE).ok().map(Into::into));
    let base = match file {
        Some(path) => YahooFinanceConfig::from_file(&path)
            .with_context(|| format!("Failed to load config from {}", path.display()))?,
        None => YahooFinanceConfig::default(),
    };

    let config = apply_overrides(base, |key| std::env::var(key).ok())?;
    config.validate().context("Invalid URL template")?;
    Ok(config)
}

/// Overlay variables looked up through `lookup` on `config`.
fn apply_overrides<F>(mut config: YahooFinanceConfig, lookup: F) -> Result<YahooFinanceConfig>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(url) = lookup(ENV_QUOTE_URL) {
        config.quote_url = url;
    }
    if let Some(url) = lookup(ENV_HISTORICAL_URL) {
        config.historical_data_url = url;
    }
    if let Some(name) = lookup(ENV_TIMEZONE) {
        config.timezone = name
            .parse::<Tz>()
            .map_err(|e| anyhow::anyhow!("Invalid {}: {}", ENV_TIMEZONE, e))?;
    }
    if let Some(secs) = lookup(ENV_REQUEST_TIMEOUT_SECS) {
        config.request_timeout_secs = secs
            .trim()
            .parse()
            .with_context(|| format!("Invalid {}: '{}'", ENV_REQUEST_TIMEOUT_SECS, secs))?;
    }
    if let Some(agent) = lookup(ENV_USER_AGENT) {
        config.user_agent = agent;
    }
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_no_overrides_keeps_defaults() {
        let config = apply_overrides(YahooFinanceConfig::default(), lookup(&[])).unwrap();
        assert_eq!(config, YahooFinanceConfig::default());
    }

    #[test]
    fn test_overrides_apply() {
        let config = apply_overrides(
            YahooFinanceConfig::default(),
            lookup(&[
                (ENV_QUOTE_URL, "http://localhost/q/{0}"),
                (ENV_TIMEZONE, "Europe/London"),
                (ENV_REQUEST_TIMEOUT_SECS, " 5 "),
                (ENV_USER_AGENT, "quotefeed-test"),
            ]),
        )
        .unwrap();

        assert_eq!(config.quote_url, "http://localhost/q/{0}");
        assert_eq!(config.timezone, chrono_tz::Europe::London);
        assert_eq!(config.request_timeout_secs, 5);
        assert_eq!(config.user_agent, "quotefeed-test");
    }

    #[test]
    fn test_bad_timezone_is_rejected() {
        let result = apply_overrides(
            YahooFinanceConfig::default(),
            lookup(&[(ENV_TIMEZONE, "Mars/Olympus")]),
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_bad_timeout_is_rejected() {
        let result = apply_overrides(
            YahooFinanceConfig::default(),
            lookup(&[(ENV_REQUEST_TIMEOUT_SECS, "soon")]),
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_explicit_file_is_loaded() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"requestTimeoutSecs": 7}}"#).unwrap();

        let config = YahooFinanceConfig::from_file(file.path()).unwrap();
        let config = apply_overrides(config, lookup(&[])).unwrap();
        assert_eq!(config.request_timeout_secs, 7);
        assert_eq!(config.quote_url, YahooFinanceConfig::default().quote_url);
    }
}
