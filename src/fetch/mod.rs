// src/fetch/mod.rs
// =============================================================================
// This module is everything between "here is a URL" and "here are the bytes".
//
// Submodules:
// - classify: the domain fence + mapping of fetch outcomes onto ErrorKind
// - http: the default Fetcher, backed by reqwest
//
// The crawl engine only ever talks to the `Fetcher` trait, so tests (and
// other transports) can plug in without a network.
// =============================================================================

mod classify;
mod http;

pub use classify::{classify, Fetched, Payload};
pub use http::HttpFetcher;

use async_trait::async_trait;
use url::Url;

use crate::canonical::NormalizedUrl;

/// A completed HTTP exchange, whatever its status.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchResponse {
    pub status: u16,
    /// Declared `Content-Type` header, if any
    pub content_type: Option<String>,
    pub body: Vec<u8>,
    /// Address the body was finally served from, when redirects moved it
    pub final_url: Option<Url>,
}

impl FetchResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// The request never produced a response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchFailure {
    Connection(String),
}

/// Capability to retrieve a URL.
///
/// Implementations do not retry and do not interpret status codes; that is
/// the classifier's job.
#[async_trait]
pub trait Fetcher: Send + Sync {
    async fn fetch(&self, url: &NormalizedUrl) -> Result<FetchResponse, FetchFailure>;
}
