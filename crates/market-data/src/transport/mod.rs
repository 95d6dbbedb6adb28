//! HTTP transport used by the data sources.
//!
//! The transport performs exactly one GET per call and never retries. It
//! keeps no cookie store: cookies go in and come out explicitly, so two
//! concurrent request chains can never see each other's session.

mod reqwest_transport;

use async_trait::async_trait;

use crate::errors::MarketDataError;
use crate::models::SessionCookies;

pub use reqwest_transport::ReqwestTransport;

/// Body and cookies of a successful (2xx) response.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct HttpResponse {
    pub body: String,
    pub cookies: SessionCookies,
}

#[async_trait]
pub trait HttpTransport: Send + Sync {
    /// GET `url`, sending `cookies` if given.
    ///
    /// Network failures, timeouts and non-2xx statuses are all errors for
    /// which [`MarketDataError::is_transport`] holds.
    async fn fetch(
        &self,
        url: &str,
        cookies: Option<&SessionCookies>,
    ) -> Result<HttpResponse, MarketDataError>;
}
