//! Content extraction module
//!
//! Converts fetched HTML and PDF bodies into normalized text plus
//! best-effort title and publication date, and decides which conversion a
//! response gets.

mod html;
mod pdf;
mod text;

pub use html::{extract_html, extract_published_date, extract_title, html_to_text, parse_calendar_date, HtmlContent};
pub use pdf::pdf_to_text;
pub use text::{content_hash, normalize_text, stable_doc_id};

use thiserror::Error;
use url::Url;

/// Errors raised while converting a body to text
#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("PDF extraction failed: {0}")]
    Pdf(String),
}

/// How a fetched resource is converted to text
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentKind {
    Html,
    Pdf,
    /// Error statuses and unsupported types; emitted with empty text
    Other,
}

impl ContentKind {
    /// Classifies a response
    ///
    /// HTML is checked before PDF, so an HTML page at a `.pdf` URL is still
    /// treated as HTML.
    ///
    /// # Arguments
    ///
    /// * `status_code` - HTTP status of the response
    /// * `content_type` - Normalized content type (see [`parse_content_type`])
    /// * `url` - URL that was requested
    /// * `body_empty` - Whether the response body had no bytes
    pub fn classify(status_code: u16, content_type: &str, url: &Url, body_empty: bool) -> Self {
        if status_code >= 400 {
            return Self::Other;
        }

        if content_type.contains("text/html") || (content_type.is_empty() && !body_empty) {
            Self::Html
        } else if content_type.contains("pdf") || crate::url::has_pdf_suffix(url) {
            Self::Pdf
        } else {
            Self::Other
        }
    }
}

/// Lowercases a Content-Type header value and strips its parameters
///
/// `"Text/HTML; charset=UTF-8"` becomes `"text/html"`.
pub fn parse_content_type(header: &str) -> String {
    header
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase()
}
