// src/config.rs
// =============================================================================
// Crawl configuration.
//
// Built with `CrawlConfig::new(seed)` plus `with_*` methods, and checked by
// `validate()` before traversal starts. A config that fails validation is the
// only way a crawl can fail as a whole.
// =============================================================================

use serde::Serialize;

use crate::canonical::NormalizedUrl;
use crate::error::CrawlError;

/// Link depth used when none is given.
pub const DEFAULT_MAX_DEPTH: u32 = 2;

/// Settings for one crawl run.
#[derive(Debug, Clone, Serialize)]
pub struct CrawlConfig {
    /// Where the crawl starts; its host is the domain fence
    pub seed: String,
    /// Deepest link-hop distance from the seed that is still fetched
    pub max_depth: u32,
    /// Fetches in flight at once within one depth level
    pub concurrency: usize,
    /// Stop after this many tasks have been processed
    pub max_pages: Option<usize>,
}

impl CrawlConfig {
    pub fn new(seed: impl Into<String>) -> Self {
        Self {
            seed: seed.into(),
            max_depth: DEFAULT_MAX_DEPTH,
            concurrency: 1,
            max_pages: None,
        }
    }

    pub fn with_max_depth(mut self, max_depth: u32) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency;
        self
    }

    pub fn with_max_pages(mut self, max_pages: usize) -> Self {
        self.max_pages = Some(max_pages);
        self
    }

    /// Checks the settings and returns the canonical seed.
    pub fn validate(&self) -> Result<NormalizedUrl, CrawlError> {
        if self.concurrency == 0 {
            return Err(CrawlError::InvalidConfig(
                "concurrency must be at least 1".to_string(),
            ));
        }

        if self.max_pages == Some(0) {
            return Err(CrawlError::InvalidConfig(
                "max pages must be at least 1".to_string(),
            ));
        }

        Ok(NormalizedUrl::parse(&self.seed)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = CrawlConfig::new("http://example.com");
        assert_eq!(config.max_depth, DEFAULT_MAX_DEPTH);
        assert_eq!(config.concurrency, 1);
        assert_eq!(config.max_pages, None);
    }

    #[test]
    fn test_validate_returns_canonical_seed() {
        let seed = CrawlConfig::new("HTTP://Example.com/#top").validate().unwrap();
        assert_eq!(seed.as_str(), "http://example.com/");
    }

    #[test]
    fn test_seed_without_scheme_is_fatal() {
        let err = CrawlConfig::new("example.com").validate().unwrap_err();
        assert!(matches!(err, CrawlError::InvalidSeed(_)));
    }

    #[test]
    fn test_zero_concurrency_is_fatal() {
        let err = CrawlConfig::new("http://example.com")
            .with_concurrency(0)
            .validate()
            .unwrap_err();
        assert!(matches!(err, CrawlError::InvalidConfig(_)));
    }

    #[test]
    fn test_zero_page_budget_is_fatal() {
        let err = CrawlConfig::new("http://example.com")
            .with_max_pages(0)
            .validate()
            .unwrap_err();
        assert!(matches!(err, CrawlError::InvalidConfig(_)));
    }
}
