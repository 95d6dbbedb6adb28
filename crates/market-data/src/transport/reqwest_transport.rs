use async_trait::async_trait;
use log::debug;
use reqwest::{header, Client};

use crate::config::YahooFinanceConfig;
use crate::errors::MarketDataError;
use crate::models::SessionCookies;

use super::{HttpResponse, HttpTransport};

/// [`HttpTransport`] backed by a shared `reqwest` client.
#[derive(Clone, Debug)]
pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    /// Build a client with the configured timeout and user agent.
    ///
    /// Fails with [`MarketDataError::InvalidConfig`] if the client cannot be
    /// built, e.g. when the user agent is not a valid header value.
    pub fn new(config: &YahooFinanceConfig) -> Result<Self, MarketDataError> {
        let client = Client::builder()
            .timeout(config.request_timeout())
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(|e| {
                MarketDataError::InvalidConfig(format!("cannot build HTTP client: {}", e))
            })?;

        Ok(Self { client })
    }

    pub fn with_client(client: Client) -> Self {
        Self { client }
    }
}

/// `url` without its query string. Query strings may carry the crumb, so
/// this is the only form of a URL that goes into logs and errors.
pub(crate) fn redact_query(url: &str) -> &str {
    url.split('?').next().unwrap_or(url)
}

fn transport_error(url: &str, error: reqwest::Error) -> MarketDataError {
    if error.is_timeout() {
        MarketDataError::Timeout {
            url: redact_query(url).to_string(),
        }
    } else {
        MarketDataError::Transport {
            url: redact_query(url).to_string(),
            message: error.without_url().to_string(),
        }
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn fetch(
        &self,
        url: &str,
        cookies: Option<&SessionCookies>,
    ) -> Result<HttpResponse, MarketDataError> {
        let mut request = self.client.get(url);
        if let Some(cookie_header) = cookies.and_then(SessionCookies::header_value) {
            request = request.header(header::COOKIE, cookie_header);
        }

        let response = request.send().await.map_err(|e| transport_error(url, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(MarketDataError::HttpStatus {
                url: redact_query(url).to_string(),
                status: status.as_u16(),
            });
        }

        let cookies = SessionCookies::from_set_cookie_headers(
            response
                .headers()
                .get_all(header::SET_COOKIE)
                .iter()
                .filter_map(|h| h.to_str().ok()),
        );

        let body = response.text().await.map_err(|e| transport_error(url, e))?;

        debug!(
            "GET {} -> {} ({} bytes, {} cookies)",
            redact_query(url),
            status,
            body.len(),
            cookies.len()
        );

        Ok(HttpResponse { body, cookies })
    }
}
