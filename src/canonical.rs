// src/canonical.rs
// =============================================================================
// URL canonicalization and domain fencing.
//
// Every URL the crawler touches goes through here first, so that two spellings
// of the same resource end up as the same key in the visited/seen sets:
//
//   HTTP://Example.COM:80/a/./b/../c/#top   ->   http://example.com/a/c
//
// The `url` crate already does most of the heavy lifting when parsing:
// - lower-cases the host
// - collapses "." and ".." path segments
// - drops the port when it is the scheme's default (80 for http, 443 for https)
//
// On top of that we:
// - drop the fragment (#section points into the same page)
// - drop a trailing slash on anything but the root path
// - drop an empty query ("?")
// - only accept http/https URLs that have a host
// =============================================================================

use serde::{Serialize, Serializer};
use std::fmt;
use thiserror::Error;
use url::Url;

use crate::error::ErrorKind;

/// Why a reference could not be canonicalized.
///
/// All variants are reported as `MALFORMED` in the invalid-link report.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UrlError {
    #[error("cannot parse URL: {0}")]
    Parse(#[from] url::ParseError),

    #[error("unsupported scheme '{0}'")]
    UnsupportedScheme(String),

    #[error("URL has no host")]
    MissingHost,
}

impl UrlError {
    pub fn kind(&self) -> ErrorKind {
        ErrorKind::Malformed
    }
}

/// An absolute http(s) URL in canonical form.
///
/// Equality and hashing are over the canonical serialization, so it can be
/// used directly as a set/map key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NormalizedUrl(Url);

impl NormalizedUrl {
    /// Canonicalizes an absolute URL (used for the seed).
    pub fn parse(raw: &str) -> Result<Self, UrlError> {
        let url = Url::parse(raw.trim())?;
        Self::from_url(url)
    }

    /// Resolves `raw` (relative or absolute) against this URL and
    /// canonicalizes the result.
    pub fn join(&self, raw: &str) -> Result<Self, UrlError> {
        canonicalize(raw, &self.0)
    }

    /// Canonicalizes an already-parsed URL.
    pub fn from_url(mut url: Url) -> Result<Self, UrlError> {
        match url.scheme() {
            "http" | "https" => {}
            other => return Err(UrlError::UnsupportedScheme(other.to_string())),
        }

        if url.host_str().map_or(true, str::is_empty) {
            return Err(UrlError::MissingHost);
        }

        url.set_fragment(None);

        if url.query() == Some("") {
            url.set_query(None);
        }

        let path = url.path();
        if path.len() > 1 && path.ends_with('/') {
            let trimmed = path.trim_end_matches('/');
            let trimmed = if trimmed.is_empty() { "/" } else { trimmed }.to_string();
            url.set_path(&trimmed);
        }

        Ok(Self(url))
    }

    /// The canonical host (always lower-case, never empty).
    pub fn host(&self) -> &str {
        self.0.host_str().unwrap_or_default()
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    pub fn as_url(&self) -> &Url {
        &self.0
    }
}

impl fmt::Display for NormalizedUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for NormalizedUrl {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// Resolves `raw` against `base` and canonicalizes it.
///
/// `base` is a plain `Url` rather than a `NormalizedUrl` because relative
/// references must resolve against the address the page was actually served
/// from (e.g. `/docs/` after a redirect), trailing slash included.
pub fn canonicalize(raw: &str, base: &Url) -> Result<NormalizedUrl, UrlError> {
    let resolved = base.join(raw.trim())?;
    NormalizedUrl::from_url(resolved)
}

/// True when `url` is on exactly the seed's host.
///
/// No subdomain wildcarding: `www.example.com` is a different domain from
/// `example.com`. Ports are not part of the comparison.
pub fn same_domain(url: &NormalizedUrl, seed_host: &str) -> bool {
    url.host() == seed_host
}
