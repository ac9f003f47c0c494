use url::Url;

/// Extracts the domain from a URL
///
/// This function retrieves the host portion of a URL and converts it to lowercase.
/// If the URL has no host, it returns None.
///
/// # Examples
///
/// ```
/// use url::Url;
/// use corpus_harvester::url::extract_domain;
///
/// let url = Url::parse("https://EXAMPLE.COM/path").unwrap();
/// assert_eq!(extract_domain(&url), Some("example.com".to_string()));
/// ```
pub fn extract_domain(url: &Url) -> Option<String> {
    url.host_str().map(|h| h.to_lowercase())
}

/// Extracts the authority (lowercased host plus any explicit port)
///
/// Robots rules are cached per authority, so `example.com` and
/// `example.com:8080` get separate entries.
///
/// ```
/// use url::Url;
/// use corpus_harvester::url::extract_authority;
///
/// let url = Url::parse("http://Example.com:8080/a").unwrap();
/// assert_eq!(extract_authority(&url), Some("example.com:8080".to_string()));
/// ```
pub fn extract_authority(url: &Url) -> Option<String> {
    let host = extract_domain(url)?;
    match url.port() {
        Some(port) => Some(format!("{}:{}", host, port)),
        None => Some(host),
    }
}
