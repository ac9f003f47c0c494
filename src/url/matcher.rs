use crate::url::extract_domain;
use url::Url;

/// Checks if a host falls under an allow-domain suffix
///
/// Matching is case-insensitive and respects label boundaries:
/// `example.com` matches `example.com` and `news.example.com`, but not
/// `badexample.com`.
///
/// # Examples
///
/// ```
/// use corpus_harvester::url::matches_domain_suffix;
///
/// assert!(matches_domain_suffix("example.com", "NEWS.Example.com"));
/// assert!(!matches_domain_suffix("example.com", "example.org"));
/// ```
pub fn matches_domain_suffix(allow_domain: &str, host: &str) -> bool {
    let allow = allow_domain.trim().trim_start_matches('.').to_lowercase();
    let host = host.to_lowercase();

    if allow.is_empty() {
        return false;
    }

    host == allow || host.ends_with(&format!(".{}", allow))
}

/// Checks whether a URL's host matches any of the allow-domains
pub fn is_allowed_domain(url: &Url, allow_domains: &[String]) -> bool {
    match extract_domain(url) {
        Some(host) => allow_domains
            .iter()
            .any(|domain| matches_domain_suffix(domain, &host)),
        None => false,
    }
}

/// Checks whether a URL contains at least one of the article substring rules
///
/// Both the URL and the rules are compared lowercased.
pub fn looks_like_target(url: &Url, contains_rules: &[String]) -> bool {
    let lowered = url.as_str().to_lowercase();
    contains_rules
        .iter()
        .filter(|rule| !rule.is_empty())
        .any(|rule| lowered.contains(&rule.to_lowercase()))
}

/// Checks whether a URL points at a PDF by its path suffix
pub fn has_pdf_suffix(url: &Url) -> bool {
    url.as_str().to_lowercase().ends_with(".pdf")
}
