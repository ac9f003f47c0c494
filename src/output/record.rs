use crate::extract::{content_hash, normalize_text, stable_doc_id};
use chrono::{DateTime, FixedOffset, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// One processed document, as written to the record stream
///
/// `doc_id` depends only on `url`, and `content_hash` only on `text`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentRecord {
    pub doc_id: String,
    pub source: String,
    pub url: String,
    /// Kept with the offset it was written with
    pub fetched_at: DateTime<FixedOffset>,
    pub status_code: u16,
    pub content_type: String,
    pub title: String,
    pub published_date: Option<NaiveDate>,
    pub text: String,
    pub content_hash: String,
}

impl DocumentRecord {
    /// Creates a record with empty text, title and date, fetched now
    ///
    /// # Arguments
    ///
    /// * `source` - Name of the source that produced the document
    /// * `url` - The URL that was requested
    /// * `status_code` - HTTP status of the response
    /// * `content_type` - Normalized content type
    pub fn new(source: &str, url: &str, status_code: u16, content_type: &str) -> Self {
        Self {
            doc_id: stable_doc_id(url),
            source: source.to_string(),
            url: url.to_string(),
            fetched_at: Utc::now().fixed_offset(),
            status_code,
            content_type: content_type.to_string(),
            title: String::new(),
            published_date: None,
            text: String::new(),
            content_hash: content_hash(""),
        }
    }

    /// Sets the extracted content, normalizing the text and rehashing it
    pub fn with_content(
        mut self,
        title: String,
        published_date: Option<NaiveDate>,
        text: &str,
    ) -> Self {
        self.title = title;
        self.published_date = published_date;
        self.text = normalize_text(text);
        self.content_hash = content_hash(&self.text);
        self
    }

    /// Sets the text of a record without title or date (PDF bodies)
    pub fn with_text(self, text: &str) -> Self {
        self.with_content(String::new(), None, text)
    }
}
