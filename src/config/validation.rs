use crate::config::types::{
    Config, CrawlerConfig, OutputConfig, RobotsConfig, SourceConfig, UserAgentConfig,
};
use crate::ConfigError;
use scraper::Selector;
use std::collections::HashSet;
use url::Url;

/// Longest accepted robots.txt cache lifetime (one year)
const MAX_ROBOTS_TTL_HOURS: u64 = 24 * 365;

/// Longest accepted per-source request spacing (one day)
const MAX_RATE_LIMIT_SECONDS: f64 = 86_400.0;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_crawler_config(&config.crawler)?;
    validate_robots_config(&config.robots)?;
    validate_user_agent_config(&config.user_agent)?;
    validate_output_config(&config.output)?;
    validate_sources(&config.sources)?;
    Ok(())
}

/// Validates crawler configuration
fn validate_crawler_config(config: &CrawlerConfig) -> Result<(), ConfigError> {
    if config.max_docs < 1 {
        return Err(ConfigError::Validation(format!(
            "max_docs must be >= 1, got {}",
            config.max_docs
        )));
    }

    if config.request_timeout_secs < 1 {
        return Err(ConfigError::Validation(
            "request_timeout_secs must be >= 1".to_string(),
        ));
    }

    Ok(())
}

/// Validates robots.txt handling
fn validate_robots_config(config: &RobotsConfig) -> Result<(), ConfigError> {
    if config.timeout_secs < 1 {
        return Err(ConfigError::Validation(
            "robots timeout_secs must be >= 1".to_string(),
        ));
    }

    if let Some(hours) = config.ttl_hours {
        if !(1..=MAX_ROBOTS_TTL_HOURS).contains(&hours) || config.ttl().is_none() {
            return Err(ConfigError::Validation(format!(
                "robots ttl_hours must be between 1 and {}, got {}",
                MAX_ROBOTS_TTL_HOURS, hours
            )));
        }
    }

    Ok(())
}

/// Validates user agent configuration
fn validate_user_agent_config(config: &UserAgentConfig) -> Result<(), ConfigError> {
    // Crawler name doubles as the robots.txt product token
    if config.crawler_name.is_empty() {
        return Err(ConfigError::Validation(
            "crawler_name cannot be empty".to_string(),
        ));
    }

    if !config
        .crawler_name
        .chars()
        .all(|c| c.is_alphanumeric() || c == '-' || c == '_')
    {
        return Err(ConfigError::Validation(format!(
            "crawler_name must contain only alphanumeric characters, hyphens and underscores, got '{}'",
            config.crawler_name
        )));
    }

    Url::parse(&config.contact_url)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid contact_url: {}", e)))?;

    validate_email(&config.contact_email)?;

    Ok(())
}

/// Validates output configuration
fn validate_output_config(config: &OutputConfig) -> Result<(), ConfigError> {
    if config.records_path.trim().is_empty() {
        return Err(ConfigError::Validation(
            "records_path cannot be empty".to_string(),
        ));
    }

    if matches!(&config.raw_dir, Some(dir) if dir.trim().is_empty()) {
        return Err(ConfigError::Validation(
            "raw_dir cannot be empty when set".to_string(),
        ));
    }

    Ok(())
}

/// Validates every source entry and the uniqueness of source names
fn validate_sources(sources: &[SourceConfig]) -> Result<(), ConfigError> {
    if sources.is_empty() {
        return Err(ConfigError::Validation(
            "at least one [[source]] entry is required".to_string(),
        ));
    }

    let mut names = HashSet::new();
    for source in sources {
        validate_source(source)?;

        if !names.insert(source.name.as_str()) {
            return Err(ConfigError::Validation(format!(
                "duplicate source name '{}'",
                source.name
            )));
        }
    }

    Ok(())
}

/// Validates a single source entry
fn validate_source(source: &SourceConfig) -> Result<(), ConfigError> {
    if source.name.trim().is_empty() {
        return Err(ConfigError::Validation(
            "source name cannot be empty".to_string(),
        ));
    }

    if source.start_urls.is_empty() {
        return Err(ConfigError::Validation(format!(
            "source '{}' must have at least one start URL",
            source.name
        )));
    }

    for start_url in &source.start_urls {
        let url = Url::parse(start_url).map_err(|e| {
            ConfigError::InvalidUrl(format!("Invalid start URL '{}': {}", start_url, e))
        })?;

        if url.scheme() != "http" && url.scheme() != "https" {
            return Err(ConfigError::Validation(format!(
                "Start URL '{}' must use HTTP or HTTPS",
                start_url
            )));
        }
    }

    if source.allow_domains.is_empty() {
        return Err(ConfigError::Validation(format!(
            "source '{}' must allow at least one domain",
            source.name
        )));
    }

    for domain in &source.allow_domains {
        validate_domain_string(domain)?;
    }

    if source.article_url_contains.is_empty()
        || source.article_url_contains.iter().any(|r| r.is_empty())
    {
        return Err(ConfigError::Validation(format!(
            "source '{}' needs at least one non-empty article_url_contains rule",
            source.name
        )));
    }

    if let Some(selector) = source.next_page_selector() {
        Selector::parse(selector).map_err(|e| {
            ConfigError::InvalidSelector(format!("'{}' in source '{}': {:?}", selector, source.name, e))
        })?;
    }

    if !source.rate_limit_seconds.is_finite() || source.rate_limit_seconds < 0.0 {
        return Err(ConfigError::Validation(format!(
            "rate_limit_seconds must be a non-negative number, got {}",
            source.rate_limit_seconds
        )));
    }

    if source.rate_limit_seconds > MAX_RATE_LIMIT_SECONDS {
        return Err(ConfigError::Validation(format!(
            "rate_limit_seconds must be at most {}, got {}",
            MAX_RATE_LIMIT_SECONDS, source.rate_limit_seconds
        )));
    }

    if source.max_list_pages < 1 {
        return Err(ConfigError::Validation(format!(
            "max_list_pages must be >= 1, got {}",
            source.max_list_pages
        )));
    }

    Ok(())
}

/// Validates an allow-domain suffix such as `example.com`
fn validate_domain_string(domain: &str) -> Result<(), ConfigError> {
    if domain.is_empty() {
        return Err(ConfigError::InvalidPattern(
            "Domain cannot be empty".to_string(),
        ));
    }

    if !domain
        .chars()
        .all(|c| c.is_alphanumeric() || c == '.' || c == '-')
    {
        return Err(ConfigError::InvalidPattern(format!(
            "Domain '{}' contains invalid characters",
            domain
        )));
    }

    if domain.starts_with('.')
        || domain.ends_with('.')
        || domain.starts_with('-')
        || domain.ends_with('-')
    {
        return Err(ConfigError::InvalidPattern(format!(
            "Domain '{}' cannot start or end with '.' or '-'",
            domain
        )));
    }

    if domain.contains("..") {
        return Err(ConfigError::InvalidPattern(format!(
            "Domain '{}' cannot contain consecutive dots",
            domain
        )));
    }

    Ok(())
}

/// Basic email validation
fn validate_email(email: &str) -> Result<(), ConfigError> {
    if email.is_empty() {
        return Err(ConfigError::Validation(
            "contact_email cannot be empty".to_string(),
        ));
    }

    let parts: Vec<&str> = email.split('@').collect();
    if parts.len() != 2 {
        return Err(ConfigError::Validation(format!(
            "Invalid email format: '{}'",
            email
        )));
    }

    let local = parts[0];
    let domain = parts[1];

    if local.is_empty() || domain.is_empty() || !domain.contains('.') {
        return Err(ConfigError::Validation(format!(
            "Invalid email format: '{}'",
            email
        )));
    }

    Ok(())
}
