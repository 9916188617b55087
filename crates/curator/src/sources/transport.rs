//! HTTP transport used by adapters and remote searchers.

use std::time::Duration;

use reqwest::blocking::Client;
use reqwest::header::{ACCEPT, HeaderMap, HeaderValue, USER_AGENT};

use crate::error::{CuratorError, DataSourceError, Result};
use crate::model::SourceName;

/// Default request timeout.
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// Default user agent sent to providers.
pub const DEFAULT_USER_AGENT: &str = concat!("curator/", env!("CARGO_PKG_VERSION"));

/// A completed HTTP exchange.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    /// Status code.
    pub status: u16,
    /// Response body as text.
    pub body: String,
}

impl HttpResponse {
    pub fn ok(body: impl Into<String>) -> Self {
        Self {
            status: 200,
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Issues GET requests.
///
/// Implementations must be thread-safe (Send + Sync): remote searches run
/// in parallel over a shared transport.
pub trait Transport: Send + Sync {
    /// GET `url` (query string already encoded). `Err` carries the network-level cause.
    fn get(&self, url: &str) -> std::result::Result<HttpResponse, String>;
}

/// Blocking reqwest-backed transport.
pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    /// Create a transport with default timeout and user agent.
    pub fn new() -> Result<Self> {
        Self::with_options(Duration::from_secs(DEFAULT_TIMEOUT_SECS), DEFAULT_USER_AGENT)
    }

    /// Create a transport with a custom timeout and user agent.
    pub fn with_options(timeout: Duration, user_agent: &str) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(
            USER_AGENT,
            HeaderValue::from_str(user_agent)
                .map_err(|e| CuratorError::Config(format!("Invalid user agent: {}", e)))?,
        );
        headers.insert(
            ACCEPT,
            HeaderValue::from_static("application/json, text/csv;q=0.9, */*;q=0.5"),
        );

        let client = Client::builder()
            .timeout(timeout)
            .default_headers(headers)
            .build()
            .map_err(|e| CuratorError::Config(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { client })
    }
}

impl Transport for ReqwestTransport {
    fn get(&self, url: &str) -> std::result::Result<HttpResponse, String> {
        let response = self.client.get(url).send().map_err(|e| e.to_string())?;
        let status = response.status().as_u16();
        let body = response.text().map_err(|e| e.to_string())?;
        Ok(HttpResponse { status, body })
    }
}

/// GET `url` and map failures to [`DataSourceError`] for `provider`.
///
/// Returns the body of a 2xx response.
pub fn fetch_text(transport: &dyn Transport, provider: SourceName, url: &str) -> Result<String> {
    tracing::debug!(%provider, url, "GET");

    let response = transport.get(url).map_err(|cause| DataSourceError::Network {
        provider,
        cause,
    })?;

    if !response.is_success() {
        let mut cause = response.body.trim().to_string();
        if cause.len() > 200 {
            let cut = (0..=200).rev().find(|i| cause.is_char_boundary(*i)).unwrap_or(0);
            cause.truncate(cut);
        }
        return Err(DataSourceError::Http {
            provider,
            status: response.status,
            cause,
        }
        .into());
    }

    Ok(response.body)
}

/// Build a URL with an encoded query string.
pub fn build_url(base: &str, query: &[(&str, String)]) -> Result<String> {
    let url = reqwest::Url::parse_with_params(base, query)
        .map_err(|e| CuratorError::Config(format!("Invalid URL '{}': {}", base, e)))?;
    Ok(url.into())
}
