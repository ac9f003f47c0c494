//! Link discovery on list and article pages
//!
//! List pages yield candidate article URLs plus an optional next-page URL.
//! Article pages are scanned for linked PDFs.

use crate::config::SourceConfig;
use crate::url::{has_pdf_suffix, is_allowed_domain, looks_like_target, resolve_link};
use scraper::{Html, Selector};
use std::collections::BTreeSet;
use url::Url;

/// What a list page points at
#[derive(Debug, Clone, Default)]
pub struct Discovery {
    /// Candidate article URLs, iterated in lexicographic order
    pub candidates: BTreeSet<Url>,

    /// The next list page, if the source paginates and one was found
    pub next_page: Option<Url>,
}

/// Parses a list page into candidate article URLs and the next-page URL
///
/// A link is a candidate iff its host matches one of the source's allow
/// domains AND the URL contains one of its article substrings.
///
/// # Arguments
///
/// * `base_url` - URL the page was fetched from, for resolving relative links
/// * `markup` - The list page HTML
/// * `source` - The source whose filters apply
///
/// # Example
///
/// ```
/// use corpus_harvester::config::SourceConfig;
/// use corpus_harvester::crawler::discover;
/// use url::Url;
///
/// let source = SourceConfig {
///     name: "alerts".to_string(),
///     start_urls: vec!["https://example.com/alerts".to_string()],
///     allow_domains: vec!["example.com".to_string()],
///     article_url_contains: vec!["/alerts/".to_string()],
///     next_page_selector: Some("a.next".to_string()),
///     rate_limit_seconds: 0.0,
///     max_list_pages: 2,
/// };
/// let html = r#"<a href="/alerts/fake-bank">x</a><a class="next" href="?page=2">next</a>"#;
/// let base = Url::parse("https://example.com/alerts").unwrap();
///
/// let found = discover(&base, html, &source);
/// assert_eq!(found.candidates.len(), 1);
/// assert_eq!(found.next_page.unwrap().as_str(), "https://example.com/alerts?page=2");
/// ```
pub fn discover(base_url: &Url, markup: &str, source: &SourceConfig) -> Discovery {
    let document = Html::parse_document(markup);

    let candidates = anchor_links(&document, base_url)
        .into_iter()
        .filter(|url| is_allowed_domain(url, &source.allow_domains))
        .filter(|url| looks_like_target(url, &source.article_url_contains))
        .collect();

    let next_page = source
        .next_page_selector()
        .and_then(|selector| find_next_page(&document, base_url, selector));

    Discovery {
        candidates,
        next_page,
    }
}

/// Finds PDFs linked from an article page, in document order
///
/// Only links on an allowed domain whose URL ends in `.pdf` are returned.
pub fn pdf_links(base_url: &Url, markup: &str, allow_domains: &[String]) -> Vec<Url> {
    let document = Html::parse_document(markup);

    anchor_links(&document, base_url)
        .into_iter()
        .filter(has_pdf_suffix)
        .filter(|url| is_allowed_domain(url, allow_domains))
        .collect()
}

/// Resolves every `a[href]` on the page, dropping links that cannot be followed
fn anchor_links(document: &Html, base_url: &Url) -> Vec<Url> {
    let Ok(selector) = Selector::parse("a[href]") else {
        return Vec::new();
    };

    document
        .select(&selector)
        .filter_map(|element| element.value().attr("href"))
        .filter_map(|href| resolve_link(href, base_url))
        .collect()
}

/// First element matching the selector that carries a resolvable href
fn find_next_page(document: &Html, base_url: &Url, selector: &str) -> Option<Url> {
    let selector = match Selector::parse(selector) {
        Ok(selector) => selector,
        Err(e) => {
            tracing::warn!("Ignoring invalid next-page selector '{}': {:?}", selector, e);
            return None;
        }
    };

    document
        .select(&selector)
        .filter_map(|element| element.value().attr("href"))
        .find_map(|href| resolve_link(href, base_url))
}
