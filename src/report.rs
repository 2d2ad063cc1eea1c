// src/report.rs
// =============================================================================
// Turns a finished crawl into output.
//
// Two kinds of output:
// 1. CSV files (always written), one per result sequence:
//      visited.csv   url,depth
//      invalid.csv   url,reason,detail
//      dupimgs.csv   url,sha256,original
// 2. Terminal output: a human-readable table, or JSON with --json
//
// Rust concepts:
// - Generic writers: `W: io::Write` lets tests write into a Vec<u8> and the
//   CLI write into a File with the same code
// - anyhow::Context: attach the file name to I/O errors
// =============================================================================

use anyhow::{Context, Result};
use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};

use site_crawler::crawl::{CrawlReport, CrawlResults};

/// Where the three CSV reports go.
#[derive(Debug, Clone)]
pub struct ReportPaths {
    pub visited: PathBuf,
    pub invalid: PathBuf,
    pub duplicate_images: PathBuf,
}

/// Writes visited.csv, invalid.csv and dupimgs.csv.
pub fn write_csv_reports(results: &CrawlResults, paths: &ReportPaths) -> Result<()> {
    write_to(&paths.visited, |file| write_visited(file, results))?;
    write_to(&paths.invalid, |file| write_invalid(file, results))?;
    write_to(&paths.duplicate_images, |file| write_duplicates(file, results))?;
    Ok(())
}

fn write_to<F>(path: &Path, write: F) -> Result<()>
where
    F: FnOnce(File) -> csv::Result<()>,
{
    let file = File::create(path)
        .with_context(|| format!("Failed to create {}", path.display()))?;
    write(file).with_context(|| format!("Failed to write {}", path.display()))
}

pub fn write_visited<W: io::Write>(writer: W, results: &CrawlResults) -> csv::Result<()> {
    let mut csv = csv::Writer::from_writer(writer);
    csv.write_record(["url", "depth"])?;
    for page in results.visited() {
        let depth = page.depth.to_string();
        csv.write_record([page.url.as_str(), depth.as_str()])?;
    }
    csv.flush()?;
    Ok(())
}

pub fn write_invalid<W: io::Write>(writer: W, results: &CrawlResults) -> csv::Result<()> {
    let mut csv = csv::Writer::from_writer(writer);
    csv.write_record(["url", "reason", "detail"])?;
    for link in results.invalid() {
        let detail = link
            .reason
            .status()
            .map(|status| status.to_string())
            .unwrap_or_default();
        csv.write_record([link.url.as_str(), link.reason.code(), detail.as_str()])?;
    }
    csv.flush()?;
    Ok(())
}

pub fn write_duplicates<W: io::Write>(writer: W, results: &CrawlResults) -> csv::Result<()> {
    let mut csv = csv::Writer::from_writer(writer);
    csv.write_record(["url", "sha256", "original"])?;
    for image in results.duplicate_images() {
        let fingerprint = image.fingerprint.to_hex();
        csv.write_record([image.url.as_str(), fingerprint.as_str(), image.original.as_str()])?;
    }
    csv.flush()?;
    Ok(())
}

// Prints the results either as a table or JSON
pub fn print_results(report: &CrawlReport, json: bool) -> Result<()> {
    if json {
        let json_output = serde_json::to_string_pretty(report)?;
        println!("{}", json_output);
    } else {
        print_table(report);
    }
    Ok(())
}

// Prints results as human-readable tables in the terminal
fn print_table(report: &CrawlReport) {
    let results = &report.results;

    println!("{:<70} {:<6}", "VISITED", "DEPTH");
    println!("{}", "=".repeat(77));
    for page in results.visited() {
        println!("{:<70} {:<6}", truncate(page.url.as_str(), 70), page.depth);
    }
    println!();

    if !results.invalid().is_empty() {
        println!("{:<70} {:<25}", "INVALID", "REASON");
        println!("{}", "=".repeat(96));
        for link in results.invalid() {
            println!("{:<70} {:<25}", truncate(&link.url, 70), link.reason.to_string());
        }
        println!();
    }

    if !results.duplicate_images().is_empty() {
        println!("{:<70} {:<16}", "DUPLICATE IMAGE", "SHA256");
        println!("{}", "=".repeat(87));
        for image in results.duplicate_images() {
            let hex = image.fingerprint.to_hex();
            println!("{:<70} {:<16}", truncate(image.url.as_str(), 70), &hex[..16]);
        }
        println!();
    }

    println!("📊 Summary:");
    println!("   ✅ Visited: {}", results.visited().len());
    println!("   ❌ Invalid: {}", results.invalid().len());
    println!("   🖼️  Duplicate images: {}", results.duplicate_images().len());
    println!("   📋 Tasks processed: {}", report.stats.tasks_processed);
    if report.stats.budget_exhausted {
        println!("   ⏹️  Stopped early: page budget spent");
    }
}

// Truncate long URLs for display
fn truncate(text: &str, width: usize) -> String {
    if text.chars().count() > width {
        let kept: String = text.chars().take(width - 3).collect();
        format!("{}...", kept)
    } else {
        text.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use site_crawler::{
        CrawlConfig, Crawler, ErrorKind, FetchFailure, FetchResponse, Fetcher, HtmlExtractor,
        NormalizedUrl,
    };

    // One page with a 404 link and two identical images
    struct TinySite;

    #[async_trait::async_trait]
    impl Fetcher for TinySite {
        async fn fetch(&self, url: &NormalizedUrl) -> Result<FetchResponse, FetchFailure> {
            let (status, content_type, body): (u16, &str, &[u8]) = match url.as_str() {
                "http://example.com/" => (
                    200,
                    "text/html",
                    &br#"<a href="/gone">g</a><a href="http://evil.com/">e</a><img src="/1.png"><img src="/2.png">"#[..],
                ),
                "http://example.com/1.png" | "http://example.com/2.png" => (200, "image/png", &b"png"[..]),
                _ => (404, "text/html", &b""[..]),
            };
            Ok(FetchResponse {
                status,
                content_type: Some(content_type.to_string()),
                body: body.to_vec(),
                final_url: None,
            })
        }
    }

    async fn report() -> CrawlReport {
        Crawler::new(CrawlConfig::new("http://example.com"), TinySite, HtmlExtractor::new())
            .run()
            .await
            .unwrap()
    }

    fn render<F>(write: F) -> String
    where
        F: FnOnce(&mut Vec<u8>) -> csv::Result<()>,
    {
        let mut buffer = Vec::new();
        write(&mut buffer).unwrap();
        String::from_utf8(buffer).unwrap()
    }

    #[tokio::test]
    async fn test_visited_csv() {
        let report = report().await;
        let csv = render(|w| write_visited(w, &report.results));
        assert_eq!(csv, "url,depth\nhttp://example.com/,0\n");
    }

    #[tokio::test]
    async fn test_invalid_csv() {
        let report = report().await;
        assert_eq!(report.results.invalid()[0].reason, ErrorKind::HttpError(404));

        let csv = render(|w| write_invalid(w, &report.results));
        assert_eq!(
            csv,
            "url,reason,detail\n\
             http://example.com/gone,HTTP_ERROR,404\n\
             http://evil.com/,EXTERNAL_DOMAIN,\n"
        );
    }

    #[tokio::test]
    async fn test_duplicates_csv() {
        let report = report().await;
        let csv = render(|w| write_duplicates(w, &report.results));

        let fingerprint = site_crawler::Fingerprint::of(b"png").to_hex();
        assert_eq!(
            csv,
            format!(
                "url,sha256,original\nhttp://example.com/2.png,{},http://example.com/1.png\n",
                fingerprint
            )
        );
    }

    #[tokio::test]
    async fn test_write_csv_reports_to_files() {
        let report = report().await;
        let dir = tempfile::tempdir().unwrap();
        let paths = ReportPaths {
            visited: dir.path().join("visited.csv"),
            invalid: dir.path().join("invalid.csv"),
            duplicate_images: dir.path().join("dupimgs.csv"),
        };

        write_csv_reports(&report.results, &paths).unwrap();

        let invalid = std::fs::read_to_string(&paths.invalid).unwrap();
        assert_eq!(invalid.lines().count(), 3);
        let duplicates = std::fs::read_to_string(&paths.duplicate_images).unwrap();
        assert_eq!(duplicates.lines().count(), 2);
    }

    #[tokio::test]
    async fn test_unwritable_path_is_an_error() {
        let report = report().await;
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("no-such-dir");
        let paths = ReportPaths {
            visited: missing.join("visited.csv"),
            invalid: missing.join("invalid.csv"),
            duplicate_images: missing.join("dupimgs.csv"),
        };

        let err = write_csv_reports(&report.results, &paths).unwrap_err();
        assert!(err.to_string().contains("visited.csv"));
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("abcdefghijkl", 8), "abcde...");
    }
}
