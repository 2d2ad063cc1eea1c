// src/crawl/state.rs
// =============================================================================
// CrawlState: everything one crawl run knows, in one value.
//
// - the frontier (pending tasks + every URL ever queued or claimed)
// - the visited map (url -> depth of first visit, written once)
// - the duplicate image detector (fingerprint index)
// - the three result sequences
//
// The engine owns exactly one CrawlState and applies each task's outcome to
// it in order, so no locking is needed even when fetches run concurrently.
// =============================================================================

use std::collections::{HashMap, HashSet};
use url::Url;

use super::queue::{CrawlTask, Frontier};
use super::results::{CrawlResults, InvalidLink};
use crate::canonical::{canonicalize, NormalizedUrl};
use crate::error::ErrorKind;
use crate::images::DuplicateImageDetector;

#[derive(Debug)]
pub struct CrawlState {
    seed: NormalizedUrl,
    frontier: Frontier,
    visited: HashMap<NormalizedUrl, u32>,
    reported_malformed: HashSet<String>,
    detector: DuplicateImageDetector,
    results: CrawlResults,
    tasks_processed: usize,
}

impl CrawlState {
    /// Starts a crawl: the seed is queued at depth 0.
    pub fn new(seed: NormalizedUrl, max_depth: u32) -> Self {
        let mut frontier = Frontier::new(max_depth);
        frontier.push(seed.clone(), 0);

        Self {
            seed,
            frontier,
            visited: HashMap::new(),
            reported_malformed: HashSet::new(),
            detector: DuplicateImageDetector::new(),
            results: CrawlResults::new(),
            tasks_processed: 0,
        }
    }

    pub fn seed(&self) -> &NormalizedUrl {
        &self.seed
    }

    /// The domain fence: only this host is ever fetched.
    pub fn seed_host(&self) -> &str {
        self.seed.host()
    }

    /// Next batch of same-depth tasks, at most `limit` of them.
    pub fn next_level(&mut self, limit: usize) -> Vec<CrawlTask> {
        self.frontier.pop_level(limit)
    }

    pub fn has_pending(&self) -> bool {
        !self.frontier.is_empty()
    }

    pub fn tasks_processed(&self) -> usize {
        self.tasks_processed
    }

    /// Depth at which `url` was first visited.
    pub fn visited_depth(&self, url: &NormalizedUrl) -> Option<u32> {
        self.visited.get(url).copied()
    }

    /// Moves a task to `visited`. Returns false if it already was.
    pub fn mark_visited(&mut self, task: &CrawlTask) -> bool {
        self.tasks_processed += 1;

        if self.visited.contains_key(&task.url) {
            return false;
        }

        self.visited.insert(task.url.clone(), task.depth);
        self.results.record_visited(task.url.clone(), task.depth);
        true
    }

    /// Moves a task to `invalid`.
    pub fn reject_task(&mut self, task: &CrawlTask, reason: ErrorKind) {
        self.tasks_processed += 1;
        self.reject(task.url.to_string(), reason);
    }

    /// Records an invalid link or image reference.
    pub fn reject(&mut self, url: impl Into<String>, reason: ErrorKind) {
        let link = InvalidLink::new(url, reason);
        tracing::warn!(url = %link.url, reason = %link.reason, "invalid link");
        self.results.record_invalid(link);
    }

    /// Canonicalizes the links found on a page at `depth` and queues the new
    /// ones at `depth + 1`.
    ///
    /// Links past the depth limit are dropped without being looked at.
    /// Returns how many tasks were queued.
    pub fn enqueue_links(&mut self, base: &Url, links: &[String], depth: u32) -> usize {
        let next_depth = depth + 1;
        if next_depth > self.frontier.max_depth() {
            return 0;
        }

        let mut queued = 0;
        for raw in links {
            match canonicalize(raw, base) {
                Ok(url) => {
                    if !self.visited.contains_key(&url) && self.frontier.push(url, next_depth) {
                        queued += 1;
                    }
                }
                Err(e) => {
                    tracing::debug!(reference = %raw, error = %e, "cannot canonicalize link");
                    self.reject_malformed(raw, e.kind());
                }
            }
        }
        queued
    }

    /// Canonicalizes an image reference, recording it as malformed if needed.
    pub fn resolve_image(&mut self, base: &Url, raw: &str) -> Option<NormalizedUrl> {
        match canonicalize(raw, base) {
            Ok(url) => Some(url),
            Err(e) => {
                tracing::debug!(reference = %raw, error = %e, "cannot canonicalize image");
                self.reject_malformed(raw, e.kind());
                None
            }
        }
    }

    /// Claims an image URL for fingerprinting.
    ///
    /// False if the URL was claimed before or is already a crawl task (queued
    /// or visited); a task that turns out to be an image fingerprints itself.
    /// A claimed URL is never queued as a task later.
    pub fn claim_image(&mut self, url: &NormalizedUrl) -> bool {
        !self.visited.contains_key(url) && self.frontier.mark_seen(url)
    }

    /// Fingerprints image bytes and records a duplicate if there is one.
    pub fn observe_image(&mut self, url: NormalizedUrl, bytes: &[u8]) {
        if let Some(duplicate) = self.detector.observe(url, bytes) {
            tracing::info!(
                url = %duplicate.url,
                original = %duplicate.original,
                fingerprint = %duplicate.fingerprint,
                "duplicate image"
            );
            self.results.record_duplicate(duplicate);
        }
    }

    pub fn distinct_images(&self) -> usize {
        self.detector.len()
    }

    pub fn results(&self) -> &CrawlResults {
        &self.results
    }

    pub fn into_results(self) -> CrawlResults {
        self.results
    }

    // The same broken reference on many pages is reported once
    fn reject_malformed(&mut self, raw: &str, reason: ErrorKind) {
        if self.reported_malformed.insert(raw.to_string()) {
            self.reject(raw, reason);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn url(path: &str) -> NormalizedUrl {
        NormalizedUrl::parse(&format!("http://example.com{}", path)).unwrap()
    }

    fn links(raw: &[&str]) -> Vec<String> {
        raw.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_seed_is_queued_at_depth_zero() {
        let mut state = CrawlState::new(url("/"), 2);
        let level = state.next_level(usize::MAX);
        assert_eq!(level, vec![CrawlTask { url: url("/"), depth: 0 }]);
        assert_eq!(state.seed_host(), "example.com");
    }

    #[test]
    fn test_visited_depth_is_written_once() {
        let mut state = CrawlState::new(url("/"), 2);
        let task = state.next_level(1).remove(0);

        assert!(state.mark_visited(&task));
        assert!(!state.mark_visited(&CrawlTask { url: url("/"), depth: 2 }));
        assert_eq!(state.visited_depth(&url("/")), Some(0));
        assert_eq!(state.results().visited().len(), 1);
    }

    #[test]
    fn test_enqueue_links_skips_visited_and_queued() {
        let mut state = CrawlState::new(url("/"), 2);
        let seed = state.next_level(1).remove(0);
        state.mark_visited(&seed);

        let base = url("/").as_url().clone();
        let queued = state.enqueue_links(&base, &links(&["/a", "/a#x", "/", "/b/"]), 0);

        assert_eq!(queued, 2);
        let level = state.next_level(usize::MAX);
        let urls: Vec<_> = level.iter().map(|t| (t.url.clone(), t.depth)).collect();
        assert_eq!(urls, vec![(url("/a"), 1), (url("/b"), 1)]);
    }

    #[test]
    fn test_links_past_depth_limit_are_dropped_silently() {
        let mut state = CrawlState::new(url("/"), 1);
        let base = url("/a").as_url().clone();

        let queued = state.enqueue_links(&base, &links(&["/deep", "http://exa mple.com/"]), 1);

        assert_eq!(queued, 0);
        assert!(state.results().invalid().is_empty());
    }

    #[test]
    fn test_malformed_link_is_reported_once() {
        let mut state = CrawlState::new(url("/"), 2);
        let base = url("/").as_url().clone();
        let bad = links(&["http://exa mple.com/"]);

        state.enqueue_links(&base, &bad, 0);
        state.enqueue_links(&base, &bad, 0);

        let invalid = state.results().invalid();
        assert_eq!(invalid.len(), 1);
        assert_eq!(invalid[0].url, "http://exa mple.com/");
        assert_eq!(invalid[0].reason, ErrorKind::Malformed);
    }

    #[test]
    fn test_image_claimed_once() {
        let mut state = CrawlState::new(url("/"), 2);
        assert!(state.claim_image(&url("/logo.png")));
        assert!(!state.claim_image(&url("/logo.png")));
    }

    #[test]
    fn test_linked_url_is_not_claimed_as_image() {
        let mut state = CrawlState::new(url("/"), 2);
        let base = url("/").as_url().clone();

        state.enqueue_links(&base, &links(&["/a"]), 0);
        assert!(!state.claim_image(&url("/a")));
        // The seed is a task too
        assert!(!state.claim_image(&url("/")));
    }

    #[test]
    fn test_claimed_image_is_not_queued_as_page() {
        let mut state = CrawlState::new(url("/"), 2);
        let seed = state.next_level(1).remove(0);
        state.mark_visited(&seed);

        let base = url("/").as_url().clone();
        assert!(state.claim_image(&url("/logo.png")));
        assert_eq!(state.enqueue_links(&base, &links(&["/logo.png"]), 0), 0);
        assert!(!state.has_pending());
    }

    #[test]
    fn test_observe_image_records_duplicates() {
        let mut state = CrawlState::new(url("/"), 2);
        state.observe_image(url("/img1.png"), b"same");
        state.observe_image(url("/img2.png"), b"same");

        let duplicates = state.results().duplicate_images();
        assert_eq!(duplicates.len(), 1);
        assert_eq!(duplicates[0].url, url("/img2.png"));
        assert_eq!(duplicates[0].original, url("/img1.png"));
        assert_eq!(state.distinct_images(), 1);
    }
}
