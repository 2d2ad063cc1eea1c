// src/extract/html.rs
// =============================================================================
// This module extracts link and image references from HTML pages.
//
// We use the `scraper` crate which:
// - Parses HTML into a DOM (Document Object Model)
// - Supports CSS selectors for finding elements
// - Is built on html5ever, which never rejects a document: broken HTML is
//   repaired the way a browser would
//
// What we collect:
// - <a href="...">   -> links
// - <img src="...">  -> images
//
// References are returned as written, except when the page declares a
// <base href>, in which case they are resolved against it here (the engine
// only knows the page URL, not the declared base).
// =============================================================================

use scraper::{Html, Selector};
use url::Url;

use super::{ExtractError, Extracted, LinkExtractor};

/// scraper-backed LinkExtractor.
#[derive(Debug, Clone, Copy, Default)]
pub struct HtmlExtractor;

impl HtmlExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl LinkExtractor for HtmlExtractor {
    fn extract(&self, base: &Url, markup: &str) -> Result<Extracted, ExtractError> {
        let document = Html::parse_document(markup);

        // Selectors are constants and known to be valid
        let anchors = Selector::parse("a[href]").unwrap();
        let images = Selector::parse("img[src]").unwrap();
        let base_tag = Selector::parse("base[href]").unwrap();

        // <base href> only applies when it resolves against the page URL
        let declared_base = document
            .select(&base_tag)
            .next()
            .and_then(|element| element.value().attr("href"))
            .and_then(|href| base.join(href.trim()).ok());

        let collect = |selector: &Selector, attr: &str| -> Vec<String> {
            document
                .select(selector)
                .filter_map(|element| element.value().attr(attr))
                .map(str::trim)
                .filter(|reference| is_followable(reference))
                .map(|reference| match &declared_base {
                    Some(declared) => declared
                        .join(reference)
                        .map(|u| u.to_string())
                        .unwrap_or_else(|_| reference.to_string()),
                    None => reference.to_string(),
                })
                .collect()
        };

        Ok(Extracted {
            links: collect(&anchors, "href"),
            images: collect(&images, "src"),
        })
    }
}

// Skips references that can never be fetched: in-page anchors, email,
// phone, scripts and inline data
fn is_followable(reference: &str) -> bool {
    if reference.is_empty() || reference.starts_with('#') {
        return false;
    }

    let lower = reference.to_ascii_lowercase();
    !["mailto:", "tel:", "javascript:", "data:"]
        .iter()
        .any(|scheme| lower.starts_with(scheme))
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. Why return raw strings instead of Url?
//    - A reference like "http://exa mple.com" is still worth reporting
//    - If we parsed here, we'd have to decide what to do with bad ones
//    - Keeping them raw lets the crawler report them as MALFORMED
//
// 2. What is the closure `collect` doing?
//    - It captures `document` and `declared_base` by reference
//    - It's called twice: once for anchors, once for images
//    - Closures avoid repeating the same filter/map chain
//
// 3. Why is there no error path?
//    - html5ever (under scraper) is a browser-grade parser
//    - It always produces a tree, no matter how broken the input
//    - The trait still returns Result so stricter parsers can fail
// -----------------------------------------------------------------------------
