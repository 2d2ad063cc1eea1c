// src/crawl/results.rs
// =============================================================================
// The Result Aggregator: the three ordered outputs of a crawl.
//
// - visited           (url, depth)        in visitation order
// - invalid           (url, reason)       in rejection order
// - duplicate images  (url, fingerprint)  in detection order
//
// The crawl engine appends while it runs; afterwards everything is read-only
// and handed to the report writers.
// =============================================================================

use serde::ser::SerializeStruct;
use serde::{Serialize, Serializer};

use crate::canonical::NormalizedUrl;
use crate::error::ErrorKind;
use crate::images::DuplicateImage;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VisitedPage {
    pub url: NormalizedUrl,
    pub depth: u32,
}

/// A link that could not be followed.
///
/// `url` is the canonical URL when there is one, or the raw reference as
/// found in the page when it could not be canonicalized.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidLink {
    pub url: String,
    pub reason: ErrorKind,
}

impl InvalidLink {
    pub fn new(url: impl Into<String>, reason: ErrorKind) -> Self {
        Self {
            url: url.into(),
            reason,
        }
    }
}

// {"url": "...", "reason": "HTTP_ERROR", "status": 404}; status only for HTTP_ERROR
impl Serialize for InvalidLink {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let status = self.reason.status();
        let fields = if status.is_some() { 3 } else { 2 };

        let mut state = serializer.serialize_struct("InvalidLink", fields)?;
        state.serialize_field("url", &self.url)?;
        state.serialize_field("reason", &self.reason)?;
        if let Some(status) = status {
            state.serialize_field("status", &status)?;
        }
        state.end()
    }
}

#[derive(Debug, Default, Serialize)]
pub struct CrawlResults {
    visited: Vec<VisitedPage>,
    invalid: Vec<InvalidLink>,
    duplicate_images: Vec<DuplicateImage>,
}

impl CrawlResults {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn record_visited(&mut self, url: NormalizedUrl, depth: u32) {
        self.visited.push(VisitedPage { url, depth });
    }

    pub(crate) fn record_invalid(&mut self, link: InvalidLink) {
        self.invalid.push(link);
    }

    pub(crate) fn record_duplicate(&mut self, duplicate: DuplicateImage) {
        self.duplicate_images.push(duplicate);
    }

    pub fn visited(&self) -> &[VisitedPage] {
        &self.visited
    }

    pub fn invalid(&self) -> &[InvalidLink] {
        &self.invalid
    }

    pub fn duplicate_images(&self) -> &[DuplicateImage] {
        &self.duplicate_images
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_link_json() {
        let not_found = InvalidLink::new("http://example.com/gone", ErrorKind::HttpError(404));
        assert_eq!(
            serde_json::to_string(&not_found).unwrap(),
            r#"{"url":"http://example.com/gone","reason":"HTTP_ERROR","status":404}"#
        );

        let external = InvalidLink::new("http://evil.com/b", ErrorKind::ExternalDomain);
        assert_eq!(
            serde_json::to_string(&external).unwrap(),
            r#"{"url":"http://evil.com/b","reason":"EXTERNAL_DOMAIN"}"#
        );
    }

    #[test]
    fn test_sequences_keep_insertion_order() {
        let mut results = CrawlResults::new();
        let a = NormalizedUrl::parse("http://example.com/a").unwrap();
        let b = NormalizedUrl::parse("http://example.com/b").unwrap();

        results.record_visited(b.clone(), 1);
        results.record_visited(a.clone(), 1);

        assert_eq!(results.visited()[0].url, b);
        assert_eq!(results.visited()[1].url, a);
        assert!(results.invalid().is_empty());
        assert!(results.duplicate_images().is_empty());
    }
}
