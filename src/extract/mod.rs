// src/extract/mod.rs
// =============================================================================
// The Content Extractor adapter.
//
// Given a classified payload, produce the raw references the crawler should
// look at next:
// - links:  where to go from here (anchors)
// - images: what to fingerprint (image sources)
//
// The actual HTML parsing sits behind the `LinkExtractor` trait; the default
// implementation in html.rs uses scraper. The adapter itself only decides
// what each kind of payload yields:
//
//   Markup       -> whatever the LinkExtractor finds
//   Image        -> no links, one image: itself
//   Unsupported  -> nothing
//
// References come out as raw strings in document order; canonicalization
// happens in the crawl engine.
// =============================================================================

mod html;

pub use html::HtmlExtractor;

use thiserror::Error;
use url::Url;

use crate::canonical::NormalizedUrl;
use crate::error::ErrorKind;
use crate::fetch::{Fetched, Payload};

/// Raw references found in one payload, in document order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Extracted {
    pub links: Vec<String>,
    pub images: Vec<String>,
}

#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("cannot parse markup: {0}")]
    Markup(String),
}

/// Capability to pull link and image references out of markup.
pub trait LinkExtractor: Send + Sync {
    /// `base` is the address the markup was served from.
    fn extract(&self, base: &Url, markup: &str) -> Result<Extracted, ExtractError>;
}

/// Dispatches on the payload kind. Extractor failures become `PARSE_ERROR`.
pub fn extract<E>(extractor: &E, url: &NormalizedUrl, fetched: &Fetched) -> Result<Extracted, ErrorKind>
where
    E: LinkExtractor + ?Sized,
{
    match &fetched.payload {
        Payload::Markup(markup) => extractor.extract(&fetched.base, markup).map_err(|e| {
            tracing::debug!(url = %url, error = %e, "markup extraction failed");
            ErrorKind::ParseError
        }),
        Payload::Image(_) => Ok(Extracted {
            links: Vec::new(),
            images: vec![url.to_string()],
        }),
        Payload::Unsupported(_) => Ok(Extracted::default()),
    }
}
