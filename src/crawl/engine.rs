// src/crawl/engine.rs
// =============================================================================
// The crawl loop.
//
// How it works:
// 1. Validate the config; the seed goes into the frontier at depth 0
// 2. Take every task of the shallowest remaining depth (one "level")
// 3. Fetch them (up to `concurrency` at a time) and classify each outcome
// 4. Apply the outcomes to CrawlState in frontier order:
//      failure -> invalid
//      success -> visited, links queued at depth + 1, image refs collected
// 5. Fetch the newly seen image refs and fingerprint them
// 6. Repeat until the frontier is empty (or the page budget is spent)
//
// Because a whole level is applied before the next one is taken, the result
// is identical whether fetches run one at a time or concurrently.
// =============================================================================

use futures::stream::{self, StreamExt};
use serde::Serialize;

use super::queue::CrawlTask;
use super::results::CrawlResults;
use super::state::CrawlState;
use crate::canonical::NormalizedUrl;
use crate::config::CrawlConfig;
use crate::error::{CrawlError, ErrorKind};
use crate::extract::{extract, LinkExtractor};
use crate::fetch::{classify, Fetched, Fetcher, Payload};

/// Everything a finished crawl produced.
#[derive(Debug, Serialize)]
pub struct CrawlReport {
    pub seed: NormalizedUrl,
    pub max_depth: u32,
    pub results: CrawlResults,
    pub stats: CrawlStats,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CrawlStats {
    /// Tasks taken from the frontier (visited + invalid)
    pub tasks_processed: usize,
    /// Image URLs fetched for fingerprinting
    pub images_fetched: usize,
    /// Distinct image fingerprints seen
    pub distinct_images: usize,
    /// True when the page budget stopped the crawl with work still queued
    pub budget_exhausted: bool,
}

/// A crawl over one site, with pluggable transport and HTML parsing.
pub struct Crawler<F, E> {
    config: CrawlConfig,
    fetcher: F,
    extractor: E,
}

impl<F, E> Crawler<F, E>
where
    F: Fetcher,
    E: LinkExtractor,
{
    pub fn new(config: CrawlConfig, fetcher: F, extractor: E) -> Self {
        Self {
            config,
            fetcher,
            extractor,
        }
    }

    pub fn config(&self) -> &CrawlConfig {
        &self.config
    }

    /// Runs the crawl to completion.
    ///
    /// Only configuration problems fail the crawl; every per-link problem
    /// ends up in the invalid report instead.
    pub async fn run(&self) -> Result<CrawlReport, CrawlError> {
        let seed = self.config.validate()?;
        let mut state = CrawlState::new(seed.clone(), self.config.max_depth);
        let mut stats = CrawlStats::default();

        tracing::info!(
            seed = %seed,
            max_depth = self.config.max_depth,
            concurrency = self.config.concurrency,
            "starting crawl"
        );

        loop {
            let limit = match self.config.max_pages {
                Some(max) => max.saturating_sub(state.tasks_processed()),
                None => usize::MAX,
            };
            if limit == 0 {
                stats.budget_exhausted = state.has_pending();
                if stats.budget_exhausted {
                    tracing::warn!(
                        max_pages = ?self.config.max_pages,
                        "page budget spent, stopping with tasks still queued"
                    );
                }
                break;
            }

            let level = state.next_level(limit);
            if level.is_empty() {
                break;
            }

            let images = self.crawl_level(&mut state, level).await;
            stats.images_fetched += images;
        }

        stats.tasks_processed = state.tasks_processed();
        stats.distinct_images = state.distinct_images();

        let results = state.into_results();
        tracing::info!(
            visited = results.visited().len(),
            invalid = results.invalid().len(),
            duplicate_images = results.duplicate_images().len(),
            "crawl finished"
        );

        Ok(CrawlReport {
            seed,
            max_depth: self.config.max_depth,
            results,
            stats,
        })
    }

    // Fetches and applies one level; returns how many images were fetched
    async fn crawl_level(&self, state: &mut CrawlState, level: Vec<CrawlTask>) -> usize {
        let seed_host = state.seed_host().to_string();

        let outcomes = self
            .fetch_all(level, &seed_host, |task: &CrawlTask| &task.url)
            .await;

        let mut pending_images = Vec::new();
        for (task, outcome) in outcomes {
            tracing::debug!(url = %task.url, depth = task.depth, "processing");
            if let Some(images) = self.apply(state, &task, outcome) {
                pending_images.extend(images);
            }
        }

        let fetched = pending_images.len();
        let image_outcomes = self
            .fetch_all(pending_images, &seed_host, |url: &NormalizedUrl| url)
            .await;

        for (url, outcome) in image_outcomes {
            match outcome {
                Ok(Fetched {
                    payload: Payload::Image(bytes),
                    ..
                }) => state.observe_image(url, &bytes),
                Ok(_) => state.reject(url.to_string(), ErrorKind::UnsupportedContent),
                Err(reason) => state.reject(url.to_string(), reason),
            }
        }

        fetched
    }

    // Classifies every item, keeping input order
    async fn fetch_all<T, U>(
        &self,
        items: Vec<T>,
        seed_host: &str,
        url_of: U,
    ) -> Vec<(T, Result<Fetched, ErrorKind>)>
    where
        U: Fn(&T) -> &NormalizedUrl + Copy,
    {
        let fetcher = &self.fetcher;

        stream::iter(items.into_iter().map(|item| async move {
            let outcome = classify(fetcher, url_of(&item), seed_host).await;
            (item, outcome)
        }))
        .buffered(self.config.concurrency)
        .collect()
        .await
    }

    // Commits one task's outcome; returns the image URLs still to fetch
    fn apply(
        &self,
        state: &mut CrawlState,
        task: &CrawlTask,
        outcome: Result<Fetched, ErrorKind>,
    ) -> Option<Vec<NormalizedUrl>> {
        let fetched = match outcome {
            Ok(fetched) => fetched,
            Err(reason) => {
                state.reject_task(task, reason);
                return None;
            }
        };

        let extracted = match extract(&self.extractor, &task.url, &fetched) {
            Ok(extracted) => extracted,
            Err(reason) => {
                state.reject_task(task, reason);
                return None;
            }
        };

        if !state.mark_visited(task) {
            return None;
        }
        tracing::info!(url = %task.url, depth = task.depth, "visited");

        let queued = state.enqueue_links(&fetched.base, &extracted.links, task.depth);
        tracing::debug!(url = %task.url, found = extracted.links.len(), queued, "links");

        let mut to_fetch = Vec::new();
        for raw in &extracted.images {
            let Some(image) = state.resolve_image(&fetched.base, raw) else {
                continue;
            };

            // A crawled image file is its own image; its bytes are already here
            match &fetched.payload {
                Payload::Image(bytes) if image == task.url => state.observe_image(image, bytes),
                _ => {
                    if state.claim_image(&image) {
                        to_fetch.push(image);
                    }
                }
            }
        }

        Some(to_fetch)
    }
}
