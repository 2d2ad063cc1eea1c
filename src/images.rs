// src/images.rs
// =============================================================================
// Duplicate image detection by content, not by URL.
//
// Every image payload is hashed with SHA-256. The first URL seen with a given
// hash is remembered as the "original"; any later image with the same hash
// (wherever it lives) is reported as a duplicate of it.
//
//   /img1.png   -> 3f2a...  (first seen, remembered, NOT reported)
//   /img2.png   -> 3f2a...  (reported as duplicate)
//   /logo.png   -> 91bc...  (first seen, remembered)
//   /copy.png   -> 3f2a...  (reported as duplicate)
//
// Two images are "the same image" iff their fingerprints are identical; no
// byte-by-byte comparison is done after a hash match.
// =============================================================================

use serde::{Serialize, Serializer};
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use std::fmt;

use crate::canonical::NormalizedUrl;

/// SHA-256 of the raw image bytes.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Fingerprint([u8; 32]);

impl Fingerprint {
    pub fn of(bytes: &[u8]) -> Self {
        Self(Sha256::digest(bytes).into())
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl fmt::Debug for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Fingerprint({})", self.to_hex())
    }
}

impl Serialize for Fingerprint {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

/// An image whose content was already seen under another URL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DuplicateImage {
    pub url: NormalizedUrl,
    pub fingerprint: Fingerprint,
    /// First URL seen with the same fingerprint
    pub original: NormalizedUrl,
}

/// Fingerprint -> URL of the first image observed with that fingerprint.
#[derive(Debug, Default)]
pub struct DuplicateImageDetector {
    index: HashMap<Fingerprint, NormalizedUrl>,
}

impl DuplicateImageDetector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records an image and reports it if its content was seen before.
    ///
    /// The index is only written on first sight of a fingerprint, so the
    /// original URL never changes and is never itself reported.
    pub fn observe(&mut self, url: NormalizedUrl, bytes: &[u8]) -> Option<DuplicateImage> {
        let fingerprint = Fingerprint::of(bytes);

        if let Some(original) = self.original_of(&fingerprint) {
            return Some(DuplicateImage {
                url,
                fingerprint,
                original: original.clone(),
            });
        }

        self.index.insert(fingerprint, url);
        None
    }

    /// URL of the first image seen with `fingerprint`.
    pub fn original_of(&self, fingerprint: &Fingerprint) -> Option<&NormalizedUrl> {
        self.index.get(fingerprint)
    }

    /// Number of distinct images seen so far.
    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn url(path: &str) -> NormalizedUrl {
        NormalizedUrl::parse(&format!("http://example.com{}", path)).unwrap()
    }

    #[test]
    fn test_first_occurrence_is_not_a_duplicate() {
        let mut detector = DuplicateImageDetector::new();
        assert_eq!(detector.observe(url("/img1.png"), b"pixels"), None);
        assert_eq!(detector.len(), 1);
    }

    #[test]
    fn test_every_later_occurrence_is_reported_once_with_its_own_url() {
        let mut detector = DuplicateImageDetector::new();
        let bytes = b"same pixels";

        assert_eq!(detector.observe(url("/a.png"), bytes), None);

        let second = detector.observe(url("/b.png"), bytes).unwrap();
        let third = detector.observe(url("/c.png"), bytes).unwrap();

        assert_eq!(second.url, url("/b.png"));
        assert_eq!(third.url, url("/c.png"));
        assert_eq!(second.fingerprint, Fingerprint::of(bytes));
        assert_eq!(third.fingerprint, second.fingerprint);

        // The original is retained, not replaced by later sightings
        assert_eq!(second.original, url("/a.png"));
        assert_eq!(third.original, url("/a.png"));
        assert_eq!(detector.len(), 1);
    }

    #[test]
    fn test_original_of() {
        let mut detector = DuplicateImageDetector::new();
        detector.observe(url("/first.png"), b"bytes");
        detector.observe(url("/second.png"), b"bytes");

        assert_eq!(detector.original_of(&Fingerprint::of(b"bytes")), Some(&url("/first.png")));
        assert_eq!(detector.original_of(&Fingerprint::of(b"unseen")), None);
    }

    #[test]
    fn test_different_content_is_not_a_duplicate() {
        let mut detector = DuplicateImageDetector::new();
        assert_eq!(detector.observe(url("/a.png"), b"one"), None);
        assert_eq!(detector.observe(url("/b.png"), b"two"), None);
        assert_eq!(detector.len(), 2);
    }

    #[test]
    fn test_fingerprint_is_sha256_hex() {
        let fp = Fingerprint::of(b"");
        assert_eq!(
            fp.to_hex(),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
        assert_eq!(fp.to_string().len(), 64);
    }
}
