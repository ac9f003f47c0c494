//! Text normalization and digests shared by the crawler and the corpus job

use sha1::Sha1;
use sha2::{Digest, Sha256};

/// Collapses every whitespace run to a single space and trims both ends
///
/// Idempotent: `normalize_text(&normalize_text(s)) == normalize_text(s)`.
pub fn normalize_text(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// SHA-256 hex digest of already-normalized text
pub fn content_hash(text: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(text.as_bytes());
    hex::encode(hasher.finalize())
}

/// Stable document id: SHA-1 hex digest of the URL string
///
/// Depends only on the URL, never on fetch time or content.
pub fn stable_doc_id(url: &str) -> String {
    let mut hasher = Sha1::new();
    hasher.update(url.as_bytes());
    hex::encode(hasher.finalize())
}
