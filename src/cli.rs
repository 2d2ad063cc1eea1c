// src/cli.rs
// =============================================================================
// This file defines our command-line interface using the `clap` crate.
//
// We use the "derive" API which lets us define the CLI structure using
// Rust structs and attributes (the #[...] things).
//
// Example:
//   site-crawler https://example.com --depth 3 --concurrency 8
// =============================================================================

use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;

use site_crawler::config::DEFAULT_MAX_DEPTH;
use site_crawler::CrawlConfig;

use crate::report::ReportPaths;

#[derive(Parser, Debug)]
#[command(
    name = "site-crawler",
    version,
    about = "Crawl a website and report visited pages, invalid links and duplicate images",
    long_about = "site-crawler walks a website breadth-first from a starting URL, staying on \
                  that URL's host, and writes three CSV reports: the pages it visited (with \
                  their link depth), the links it could not follow (with a reason), and the \
                  images whose content duplicates an image seen earlier."
)]
pub struct Cli {
    /// URL to start crawling from (e.g., https://example.com)
    ///
    /// Only pages on exactly this host are fetched
    pub url: String,

    /// Maximum link depth (0 = only the starting page)
    #[arg(long, default_value_t = DEFAULT_MAX_DEPTH)]
    pub depth: u32,

    /// CSV file to store visited links
    #[arg(long, value_name = "FILE", default_value = "visited.csv")]
    pub visited: PathBuf,

    /// CSV file to store invalid links
    #[arg(long, value_name = "FILE", default_value = "invalid.csv")]
    pub invalid: PathBuf,

    /// CSV file to store links of duplicate images
    #[arg(long, value_name = "FILE", default_value = "dupimgs.csv")]
    pub dupimgs: PathBuf,

    /// Number of fetches in flight at once (default: number of CPUs)
    #[arg(long, value_name = "N")]
    pub concurrency: Option<usize>,

    /// Stop after this many pages have been processed
    #[arg(long, value_name = "N")]
    pub max_pages: Option<usize>,

    /// Per-request timeout in seconds
    #[arg(long, value_name = "SECS", default_value_t = 10)]
    pub timeout: u64,

    /// Print results as JSON instead of a table
    #[arg(long)]
    pub json: bool,
}

impl Cli {
    pub fn crawl_config(&self) -> CrawlConfig {
        let concurrency = self.concurrency.unwrap_or_else(|| {
            std::thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(1)
        });

        let config = CrawlConfig::new(self.url.clone())
            .with_max_depth(self.depth)
            .with_concurrency(concurrency);

        match self.max_pages {
            Some(max_pages) => config.with_max_pages(max_pages),
            None => config,
        }
    }

    pub fn report_paths(&self) -> ReportPaths {
        ReportPaths {
            visited: self.visited.clone(),
            invalid: self.invalid.clone(),
            duplicate_images: self.dupimgs.clone(),
        }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout)
    }
}
