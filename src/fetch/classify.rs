// src/fetch/classify.rs
// =============================================================================
// The Fetch Classifier: turns "try to fetch this URL" into either a usable
// payload or exactly one ErrorKind.
//
//   off-domain host            -> EXTERNAL_DOMAIN     (no network I/O at all)
//   no response                -> CONNECTION_ERROR
//   redirected off the domain  -> EXTERNAL_DOMAIN
//   status outside 200..=299   -> HTTP_ERROR(status)
//   neither HTML nor image     -> UNSUPPORTED_CONTENT
//   HTML not valid in its      -> PARSE_ERROR
//   declared charset
//   otherwise                  -> Payload::Markup / Payload::Image
//
// Markup is decoded the way browsers do: a byte order mark wins, then the
// charset parameter of Content-Type. Without either, UTF-8 is tried and
// windows-1252 (which accepts any bytes) is the fallback.
//
// There are no retries here: a failed fetch is final for that URL.
// =============================================================================

use encoding_rs::{Encoding, WINDOWS_1252};
use url::Url;

use super::{FetchFailure, FetchResponse, Fetcher};
use crate::canonical::{same_domain, NormalizedUrl};
use crate::error::ErrorKind;

/// Fetched content, tagged by what the server said it is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Payload {
    Markup(String),
    Image(Vec<u8>),
    Unsupported(String),
}

impl Payload {
    /// Sorts a successful response by its declared content type.
    ///
    /// Markup that is malformed in its declared charset is a parse error.
    pub fn from_response(response: FetchResponse) -> Result<Payload, ErrorKind> {
        let header = response.content_type.as_deref().unwrap_or_default();
        let content_type = media_type(header);

        if content_type == "text/html" || content_type == "application/xhtml+xml" {
            decode_markup(&response.body, charset(header)).map(Payload::Markup)
        } else if content_type.starts_with("image/") {
            Ok(Payload::Image(response.body))
        } else {
            Ok(Payload::Unsupported(content_type))
        }
    }
}

/// A payload plus the URL its relative references resolve against.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fetched {
    pub base: Url,
    pub payload: Payload,
}

/// Applies the domain fence, fetches and classifies the outcome.
pub async fn classify<F>(fetcher: &F, url: &NormalizedUrl, seed_host: &str) -> Result<Fetched, ErrorKind>
where
    F: Fetcher + ?Sized,
{
    if !same_domain(url, seed_host) {
        return Err(ErrorKind::ExternalDomain);
    }

    let response = match fetcher.fetch(url).await {
        Ok(response) => response,
        Err(FetchFailure::Connection(reason)) => {
            tracing::debug!(url = %url, %reason, "connection failed");
            return Err(ErrorKind::ConnectionError);
        }
    };

    if let Some(final_url) = &response.final_url {
        if final_url.host_str() != Some(seed_host) {
            tracing::debug!(url = %url, final_url = %final_url, "redirected off the domain");
            return Err(ErrorKind::ExternalDomain);
        }
    }

    if !response.is_success() {
        return Err(ErrorKind::HttpError(response.status));
    }

    let base = response
        .final_url
        .clone()
        .unwrap_or_else(|| url.as_url().clone());

    match Payload::from_response(response)? {
        Payload::Unsupported(content_type) => {
            tracing::debug!(url = %url, %content_type, "unsupported content");
            Err(ErrorKind::UnsupportedContent)
        }
        payload => Ok(Fetched { base, payload }),
    }
}

// "text/HTML; charset=utf-8" -> "text/html"
fn media_type(header: &str) -> String {
    header
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase()
}

// "text/html; charset=\"ISO-8859-1\"" -> Some("ISO-8859-1")
fn charset(header: &str) -> Option<&str> {
    header.split(';').skip(1).find_map(|param| {
        let (name, value) = param.split_once('=')?;
        if name.trim().eq_ignore_ascii_case("charset") {
            Some(value.trim().trim_matches('"'))
        } else {
            None
        }
    })
}

fn decode_markup(body: &[u8], charset: Option<&str>) -> Result<String, ErrorKind> {
    let (encoding, body) = match Encoding::for_bom(body) {
        Some((encoding, bom_len)) => (Some(encoding), &body[bom_len..]),
        None => (charset.and_then(|label| Encoding::for_label(label.as_bytes())), body),
    };

    match encoding {
        Some(encoding) => encoding
            .decode_without_bom_handling_and_without_replacement(body)
            .map(|text| text.into_owned())
            .ok_or(ErrorKind::ParseError),
        None => match std::str::from_utf8(body) {
            Ok(text) => Ok(text.to_string()),
            Err(_) => Ok(WINDOWS_1252.decode_without_bom_handling(body).0.into_owned()),
        },
    }
}
