//! HTTP access to the external catalogs.
//!
//! Everything that talks to the network goes through the [`Fetch`] trait so
//! the engines can be driven by an in-memory implementation in tests.

use std::future::Future;
use std::time::Duration;

use thiserror::Error;

const USER_AGENT: &str = concat!("assembly-config/", env!("CARGO_PKG_VERSION"));

/// Overall bound on any single request made through [`HttpFetcher`]
const REQUEST_TIMEOUT_SECS: u64 = 30;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("HTTP {code} {reason}")]
    Status { code: u16, reason: String },

    #[error("Request timed out")]
    Timeout,

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),
}

/// Source of response bodies for GET requests
pub trait Fetch {
    /// GET `url` and return the body of a successful (2xx) response
    fn get_text(&self, url: &str) -> impl Future<Output = Result<String, FetchError>> + Send;
}

/// [`Fetch`] implementation backed by `reqwest`
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    /// Build a client with the crate's user agent and request timeout
    ///
    /// # Errors
    ///
    /// Returns `FetchError::Network` if the TLS backend cannot be initialized.
    pub fn new() -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .map_err(|e| FetchError::Network(e.to_string()))?;

        Ok(Self { client })
    }
}

impl Fetch for HttpFetcher {
    async fn get_text(&self, url: &str) -> Result<String, FetchError> {
        tracing::debug!(url = %url, "GET");

        let response = self.client.get(url).send().await.map_err(|e| {
            if e.is_timeout() {
                FetchError::Timeout
            } else {
                FetchError::Network(e.to_string())
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                code: status.as_u16(),
                reason: status.canonical_reason().unwrap_or_default().to_string(),
            });
        }

        response
            .text()
            .await
            .map_err(|e| FetchError::Network(e.to_string()))
    }
}

/// Append URL-encoded query parameters to `base`
///
/// # Errors
///
/// Returns `FetchError::InvalidUrl` if `base` is not an absolute URL.
pub fn url_with_query(base: &str, params: &[(&str, &str)]) -> Result<String, FetchError> {
    reqwest::Url::parse_with_params(base, params)
        .map(String::from)
        .map_err(|e| FetchError::InvalidUrl(format!("{base}: {e}")))
}
