// src/error.rs
// =============================================================================
// Error types for the crawler.
//
// There are two very different kinds of failure:
//
// 1. ErrorKind - why a single link could not be followed. These are NOT
//    fatal: every one of them becomes an "invalid link" row in the report and
//    the crawl keeps going. The set is closed, one variant per reason code.
//
// 2. CrawlError - why a crawl could not even start (bad seed URL, bad
//    configuration). These ARE fatal and are returned before any fetch.
//
// Rust concepts:
// - thiserror: derive std::error::Error and Display from attributes
// - #[from]: automatic conversion so `?` works across error types
// =============================================================================

use serde::{Serialize, Serializer};
use std::fmt;
use thiserror::Error;

use crate::canonical::UrlError;

/// Reason a link ended up in the invalid report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// The raw reference could not be turned into a crawlable URL
    Malformed,
    /// The URL's host differs from the seed's host
    ExternalDomain,
    /// Transport failure: connect, DNS, TLS, timeout, redirect loop, body read
    ConnectionError,
    /// The server answered with a non-2xx status
    HttpError(u16),
    /// The response is neither markup nor an image
    UnsupportedContent,
    /// Markup was returned but could not be parsed
    ParseError,
}

impl ErrorKind {
    /// The stable reason code written to reports.
    pub fn code(&self) -> &'static str {
        match self {
            ErrorKind::Malformed => "MALFORMED",
            ErrorKind::ExternalDomain => "EXTERNAL_DOMAIN",
            ErrorKind::ConnectionError => "CONNECTION_ERROR",
            ErrorKind::HttpError(_) => "HTTP_ERROR",
            ErrorKind::UnsupportedContent => "UNSUPPORTED_CONTENT",
            ErrorKind::ParseError => "PARSE_ERROR",
        }
    }

    /// HTTP status carried by `HttpError`, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            ErrorKind::HttpError(status) => Some(*status),
            _ => None,
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorKind::HttpError(status) => write!(f, "{} ({})", self.code(), status),
            other => f.write_str(other.code()),
        }
    }
}

// Reports carry the reason code; the HTTP status travels in its own column
impl Serialize for ErrorKind {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.code())
    }
}

/// Fatal errors detected before traversal starts.
#[derive(Debug, Error)]
pub enum CrawlError {
    #[error("Invalid seed URL: {0}")]
    InvalidSeed(#[from] UrlError),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}
