// src/testing.rs
// =============================================================================
// Test helpers: an in-memory website.
//
// StaticSite answers fetches from a map of canned responses and remembers
// every URL it was asked for, so tests can check what was (not) fetched.
// URLs it has no response for behave like an unreachable host.
// =============================================================================

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;
use url::Url;

use crate::canonical::NormalizedUrl;
use crate::fetch::{FetchFailure, FetchResponse, Fetcher};

#[derive(Debug, Default)]
pub struct StaticSite {
    pages: HashMap<String, FetchResponse>,
    log: Mutex<Vec<String>>,
}

impl StaticSite {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a canned response; `url` is canonicalized first.
    pub fn with(mut self, url: &str, status: u16, content_type: Option<&str>, body: Vec<u8>) -> Self {
        self.pages.insert(
            key(url),
            FetchResponse {
                status,
                content_type: content_type.map(str::to_string),
                body,
                final_url: None,
            },
        );
        self
    }

    pub fn html(self, url: &str, body: &str) -> Self {
        self.with(url, 200, Some("text/html; charset=utf-8"), body.as_bytes().to_vec())
    }

    pub fn image(self, url: &str, bytes: &[u8]) -> Self {
        self.with(url, 200, Some("image/png"), bytes.to_vec())
    }

    pub fn status(self, url: &str, status: u16) -> Self {
        self.with(url, status, Some("text/html"), Vec::new())
    }

    /// Makes the response for `url` look like it came from `final_url`
    /// after following redirects.
    pub fn redirected(mut self, url: &str, final_url: &str) -> Self {
        if let (Some(response), Ok(target)) = (self.pages.get_mut(&key(url)), Url::parse(final_url)) {
            response.final_url = Some(target);
        }
        self
    }

    /// Every URL fetched so far, in request order.
    pub fn fetched(&self) -> Vec<String> {
        self.log.lock().map(|log| log.clone()).unwrap_or_default()
    }
}

fn key(url: &str) -> String {
    NormalizedUrl::parse(url)
        .map(|u| u.to_string())
        .unwrap_or_else(|_| url.to_string())
}

#[async_trait]
impl Fetcher for StaticSite {
    async fn fetch(&self, url: &NormalizedUrl) -> Result<FetchResponse, FetchFailure> {
        if let Ok(mut log) = self.log.lock() {
            log.push(url.to_string());
        }

        self.pages
            .get(url.as_str())
            .cloned()
            .ok_or_else(|| FetchFailure::Connection(format!("no route to {}", url)))
    }
}
