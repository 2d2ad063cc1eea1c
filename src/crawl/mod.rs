// src/crawl/mod.rs
// =============================================================================
// This module handles the website crawl itself.
//
// Features:
// - Breadth-first crawling starting from a seed URL
// - Same-domain restriction (external links are reported, never fetched)
// - Configurable depth limit
// - Each URL fetched at most once
// - Duplicate image detection across the whole site
//
// Submodules:
// - queue:   the frontier (FIFO of (url, depth) tasks)
// - state:   visited map, image claims, fingerprint index
// - results: the three ordered output sequences
// - engine:  the crawl loop tying it all together
// =============================================================================

mod engine;
mod queue;
mod results;
mod state;

pub use engine::{CrawlReport, CrawlStats, Crawler};
pub use queue::{CrawlTask, Frontier};
pub use results::{CrawlResults, InvalidLink, VisitedPage};
pub use state::CrawlState;
