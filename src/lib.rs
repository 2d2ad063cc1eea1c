// src/lib.rs
// =============================================================================
// site-crawler: a breadth-first, single-domain website crawler.
//
// A crawl starts at a seed URL and reports:
// - every page it visited, with its link depth
// - every link it could not follow, with a reason code
// - every image whose bytes duplicate an image seen earlier
//
// Modules, leaf first:
// - canonical: URL normalization and the domain fence
// - fetch:     the Fetcher capability and outcome classification
// - extract:   link/image references from fetched payloads
// - images:    content fingerprints and duplicate detection
// - crawl:     frontier, crawl state, results and the crawl loop
//
// The CLI and the report writers live in the binary (src/main.rs).
// =============================================================================

pub mod canonical;
pub mod config;
pub mod crawl;
pub mod error;
pub mod extract;
pub mod fetch;
pub mod images;

#[cfg(test)]
pub(crate) mod testing;

pub use canonical::{canonicalize, same_domain, NormalizedUrl, UrlError};
pub use config::CrawlConfig;
pub use crawl::{CrawlReport, Crawler};
pub use error::{CrawlError, ErrorKind};
pub use extract::{Extracted, HtmlExtractor, LinkExtractor};
pub use fetch::{FetchFailure, FetchResponse, Fetcher, HttpFetcher};
pub use images::{DuplicateImage, DuplicateImageDetector, Fingerprint};
