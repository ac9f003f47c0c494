//! HTTP fetcher implementation
//!
//! This module handles all HTTP requests for the crawler, including:
//! - Building HTTP clients with proper user agent strings
//! - GET requests returning status, content type and raw body
//! - Error classification

use crate::config::UserAgentConfig;
use crate::extract::parse_content_type;
use reqwest::{redirect::Policy, Client};
use std::time::Duration;
use url::Url;

/// Maximum redirect hops followed per request
const MAX_REDIRECTS: usize = 10;

/// A response that arrived, whatever its status
#[derive(Debug, Clone)]
pub struct FetchedResponse {
    /// HTTP status code
    pub status_code: u16,
    /// Lowercased, parameter-stripped Content-Type (empty when absent)
    pub content_type: String,
    /// Raw body bytes
    pub body: Vec<u8>,
}

impl FetchedResponse {
    /// Body decoded as UTF-8, with invalid sequences replaced
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    pub fn is_error_status(&self) -> bool {
        self.status_code >= 400
    }
}

/// Result of a fetch operation
#[derive(Debug)]
pub enum FetchResult {
    /// A response was received (any status)
    Success(FetchedResponse),

    /// Network error (connection refused, timeout, body read failure)
    NetworkError {
        /// Error description
        error: String,
    },
}

/// Builds an HTTP client with proper configuration
///
/// # Arguments
///
/// * `config` - The user agent configuration
/// * `timeout` - Whole-request timeout for list and document fetches
///
/// # Returns
///
/// * `Ok(Client)` - Successfully built HTTP client
/// * `Err(reqwest::Error)` - Failed to build client
///
/// # Example
///
/// ```no_run
/// use corpus_harvester::config::UserAgentConfig;
/// use corpus_harvester::crawler::build_http_client;
/// use std::time::Duration;
///
/// let config = UserAgentConfig {
///     crawler_name: "ScamCorpusBot".to_string(),
///     crawler_version: "0.1".to_string(),
///     contact_url: "https://example.com/about".to_string(),
///     contact_email: "admin@example.com".to_string(),
/// };
///
/// let client = build_http_client(&config, Duration::from_secs(30)).unwrap();
/// ```
pub fn build_http_client(
    config: &UserAgentConfig,
    timeout: Duration,
) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(config.header_value())
        .timeout(timeout)
        .connect_timeout(timeout.min(Duration::from_secs(10)))
        .redirect(Policy::limited(MAX_REDIRECTS))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Fetches a URL with a single GET request
///
/// Error statuses are returned as `Success` so the caller can record them;
/// only transport failures produce `NetworkError`. Nothing is retried.
///
/// # Arguments
///
/// * `client` - The HTTP client to use
/// * `url` - The URL to fetch
///
/// # Returns
///
/// A FetchResult holding the response or the classified failure
pub async fn fetch_url(client: &Client, url: &Url) -> FetchResult {
    let response = match client.get(url.clone()).send().await {
        Ok(response) => response,
        Err(e) => return classify_error(&e),
    };

    let status_code = response.status().as_u16();
    if response.url() != url {
        tracing::debug!("{} redirected to {}", url, response.url());
    }
    let content_type = response
        .headers()
        .get(reqwest::header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(parse_content_type)
        .unwrap_or_default();

    match response.bytes().await {
        Ok(body) => FetchResult::Success(FetchedResponse {
            status_code,
            content_type,
            body: body.to_vec(),
        }),
        Err(e) => classify_error(&e),
    }
}

fn classify_error(e: &reqwest::Error) -> FetchResult {
    let error = if e.is_timeout() {
        "Request timeout".to_string()
    } else if e.is_connect() {
        format!("Connection failed: {}", e)
    } else if e.is_redirect() {
        format!("Redirect error: {}", e)
    } else {
        e.to_string()
    };
    FetchResult::NetworkError { error }
}
