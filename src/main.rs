// src/main.rs
// =============================================================================
// This is the entry point of our CLI application.
//
// What happens here:
// 1. Set up logging (RUST_LOG overrides the default filter)
// 2. Parse command-line arguments using clap
// 3. Run the crawl with the reqwest fetcher and the scraper extractor
// 4. Write the CSV reports and print a summary
// 5. Exit with proper code (0 = no invalid links, 1 = invalid links, 2 = error)
// =============================================================================

mod cli;
mod report;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use cli::Cli;
use site_crawler::{Crawler, HtmlExtractor, HttpFetcher};

#[tokio::main]
async fn main() {
    // Logs go to stderr so --json output on stdout stays clean
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "site_crawler=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let exit_code = match run().await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            2
        }
    };

    std::process::exit(exit_code);
}

// Returns:
//   Ok(0) = crawl finished, no invalid links
//   Ok(1) = crawl finished, invalid links found
//   Err   = the crawl could not run or the reports could not be written
async fn run() -> Result<i32> {
    let cli = Cli::parse();
    let config = cli.crawl_config();

    if !cli.json {
        println!("🔍 Crawling website: {}", config.seed);
        println!("📊 Max depth: {}, concurrency: {}", config.max_depth, config.concurrency);
    }

    let fetcher = HttpFetcher::new(cli.timeout()).context("Failed to create HTTP client")?;
    let crawler = Crawler::new(config, fetcher, HtmlExtractor::new());

    let report = crawler.run().await.context("Crawl failed")?;

    let paths = cli.report_paths();
    report::write_csv_reports(&report.results, &paths)?;
    report::print_results(&report, cli.json)?;

    if !cli.json {
        println!(
            "\n📄 Reports written to {}, {}, {}",
            paths.visited.display(),
            paths.invalid.display(),
            paths.duplicate_images.display()
        );
    }

    if report.results.invalid().is_empty() {
        Ok(0)
    } else {
        Ok(1)
    }
}
