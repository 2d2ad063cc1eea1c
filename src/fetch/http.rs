// src/fetch/http.rs
// =============================================================================
// The default Fetcher: a plain GET with reqwest.
//
// Key functionality:
// - One shared Client for the whole crawl (connection pooling)
// - Per-request timeout and a redirect limit
// - Any status code counts as a response; the classifier decides what a 404
//   means. Only "no response at all" is a FetchFailure.
//
// Rust concepts:
// - async/await: the crawl engine awaits each fetch
// - Builder pattern: Client::builder() and HttpFetcher::with_*
// =============================================================================

use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use reqwest::Client;
use std::time::Duration;

use super::{FetchFailure, FetchResponse, Fetcher};
use crate::canonical::NormalizedUrl;

const DEFAULT_USER_AGENT: &str = concat!("site-crawler/", env!("CARGO_PKG_VERSION"));

/// reqwest-backed Fetcher.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    /// Creates a fetcher with the given per-request timeout.
    pub fn new(timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .timeout(timeout)
            .redirect(reqwest::redirect::Policy::limited(5)) // Follow up to 5 redirects
            .user_agent(DEFAULT_USER_AGENT)
            .build()?;

        Ok(Self { client })
    }

    /// Uses a pre-configured client (proxies, custom TLS, ...).
    pub fn with_client(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch(&self, url: &NormalizedUrl) -> Result<FetchResponse, FetchFailure> {
        let response = self
            .client
            .get(url.as_str())
            .send()
            .await
            .map_err(categorize_error)?;

        let status = response.status().as_u16();
        let final_url = Some(response.url().clone()).filter(|served| served != url.as_url());
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);

        // The body of an error page is never looked at
        let body = if response.status().is_success() {
            response.bytes().await.map_err(categorize_error)?.to_vec()
        } else {
            Vec::new()
        };

        Ok(FetchResponse {
            status,
            content_type,
            body,
            final_url,
        })
    }
}

// Keeps a human-readable reason for the logs; all of these are reported as
// CONNECTION_ERROR
fn categorize_error(error: reqwest::Error) -> FetchFailure {
    let error_string = error.to_string();

    let reason = if error.is_timeout() {
        "Request timed out".to_string()
    } else if error.is_redirect() {
        "Too many redirects".to_string()
    } else if error.is_connect() {
        if error_string.contains("dns") {
            "Could not resolve hostname".to_string()
        } else {
            "Connection failed".to_string()
        }
    } else if error_string.contains("certificate") || error_string.contains("ssl") {
        "SSL certificate error".to_string()
    } else {
        error_string
    };

    FetchFailure::Connection(reason)
}
