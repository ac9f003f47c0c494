//! HTML text and metadata extraction
//!
//! Title and publication date are best-effort heuristics. The date is found
//! by walking an ordered list of probes and taking the first value that
//! parses as a calendar date.

use crate::extract::text::normalize_text;
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use scraper::{Html, Node, Selector};

/// Elements whose text never reaches the extracted body
const SKIPPED_ELEMENTS: &[&str] = &["script", "style", "noscript", "template"];

/// Text and metadata pulled from one HTML document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HtmlContent {
    pub title: String,
    pub published_date: Option<NaiveDate>,
    pub text: String,
}

/// One place a publication date may be declared
#[derive(Debug, Clone, Copy)]
enum DateProbe {
    /// `content` attribute of the first element matching the selector
    MetaContent(&'static str),
    /// `datetime` attribute of the first `<time>` element carrying one
    TimeDatetime,
}

/// Probes in priority order
const PUBLISHED_DATE_PROBES: &[DateProbe] = &[
    DateProbe::MetaContent(r#"meta[property="article:published_time"]"#),
    DateProbe::MetaContent(r#"meta[name="article:published_time"]"#),
    DateProbe::MetaContent(r#"meta[name="date"]"#),
    DateProbe::MetaContent(r#"meta[name="pubdate"]"#),
    DateProbe::MetaContent(r#"meta[property="og:updated_time"]"#),
    DateProbe::TimeDatetime,
];

impl DateProbe {
    fn raw_value(&self, document: &Html) -> Option<String> {
        let (selector, attr) = match self {
            Self::MetaContent(selector) => (*selector, "content"),
            Self::TimeDatetime => ("time[datetime]", "datetime"),
        };
        let selector = Selector::parse(selector).ok()?;
        document
            .select(&selector)
            .next()
            .and_then(|el| el.value().attr(attr))
            .map(str::to_string)
    }
}

/// Parses HTML and extracts title, publication date and visible text
pub fn extract_html(markup: &str) -> HtmlContent {
    let document = Html::parse_document(markup);
    HtmlContent {
        title: extract_title(&document),
        published_date: extract_published_date(&document),
        text: html_to_text(&document),
    }
}

/// Visible text of a document, whitespace-normalized
pub fn html_to_text(document: &Html) -> String {
    let mut parts: Vec<&str> = Vec::new();

    for node in document.tree.root().descendants() {
        if let Node::Text(text) = node.value() {
            let hidden = node.ancestors().any(|ancestor| {
                matches!(ancestor.value(), Node::Element(el) if SKIPPED_ELEMENTS.contains(&el.name()))
            });
            if !hidden {
                parts.push(text);
            }
        }
    }

    normalize_text(&parts.join(" "))
}

/// `<title>` text, else the first `<h1>`, else an empty string
pub fn extract_title(document: &Html) -> String {
    ["title", "h1"]
        .iter()
        .filter_map(|tag| first_text(document, tag))
        .next()
        .unwrap_or_default()
}

fn first_text(document: &Html, tag: &str) -> Option<String> {
    let selector = Selector::parse(tag).ok()?;
    document
        .select(&selector)
        .next()
        .map(|element| normalize_text(&element.text().collect::<Vec<_>>().join(" ")))
        .filter(|s| !s.is_empty())
}

/// First probe value that parses into a calendar date
pub fn extract_published_date(document: &Html) -> Option<NaiveDate> {
    PUBLISHED_DATE_PROBES
        .iter()
        .filter_map(|probe| probe.raw_value(document))
        .find_map(|raw| parse_calendar_date(&raw))
}

const OFFSET_DATETIME_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S%.f%z", "%Y-%m-%dT%H:%M:%S%z"];

const NAIVE_DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
];

const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%B %d, %Y",
    "%b %d, %Y",
    "%d %B %Y",
    "%d %b %Y",
];

/// Parses a loosely formatted date or date-time into a calendar date
///
/// Offset-aware values keep their local date; no timezone conversion happens.
pub fn parse_calendar_date(raw: &str) -> Option<NaiveDate> {
    let s = raw.trim();
    if s.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.date_naive());
    }
    if let Ok(dt) = DateTime::parse_from_rfc2822(s) {
        return Some(dt.date_naive());
    }
    if let Some(dt) = OFFSET_DATETIME_FORMATS
        .iter()
        .find_map(|fmt| DateTime::parse_from_str(s, fmt).ok())
    {
        return Some(dt.date_naive());
    }
    if let Some(dt) = NAIVE_DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
    {
        return Some(dt.date());
    }
    if let Some(date) = DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(s, fmt).ok())
    {
        return Some(date);
    }

    // Values like "2024-03-01 (updated)" still lead with a usable date
    s.get(..10)
        .and_then(|prefix| NaiveDate::parse_from_str(prefix, "%Y-%m-%d").ok())
}
