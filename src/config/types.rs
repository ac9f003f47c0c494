use serde::Deserialize;
use std::time::Duration;

/// Main configuration structure for the harvester
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub crawler: CrawlerConfig,
    #[serde(default)]
    pub robots: RobotsConfig,
    #[serde(rename = "user-agent")]
    pub user_agent: UserAgentConfig,
    pub output: OutputConfig,
    #[serde(rename = "source", default)]
    pub sources: Vec<SourceConfig>,
}

/// Crawler behavior configuration
#[derive(Debug, Clone, Deserialize)]
pub struct CrawlerConfig {
    /// Maximum number of records emitted across all sources
    #[serde(rename = "max-docs", default = "default_max_docs")]
    pub max_docs: usize,

    /// Timeout for list-page and document fetches (seconds)
    #[serde(rename = "request-timeout-secs", default = "default_request_timeout")]
    pub request_timeout_secs: u64,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            max_docs: default_max_docs(),
            request_timeout_secs: default_request_timeout(),
        }
    }
}

impl CrawlerConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

/// What to do when a robots.txt cannot be retrieved
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RobotsPolicy {
    /// Treat the domain as fully allowed
    #[default]
    FailOpen,
    /// Treat the domain as fully disallowed
    FailClosed,
}

/// Robots.txt handling configuration
#[derive(Debug, Clone, Deserialize)]
pub struct RobotsConfig {
    #[serde(default)]
    pub policy: RobotsPolicy,

    /// Timeout for robots.txt fetches (seconds)
    #[serde(rename = "timeout-secs", default = "default_robots_timeout")]
    pub timeout_secs: u64,

    /// Refetch cached rules older than this; absent means rules never expire
    #[serde(rename = "ttl-hours", default)]
    pub ttl_hours: Option<u64>,
}

impl Default for RobotsConfig {
    fn default() -> Self {
        Self {
            policy: RobotsPolicy::default(),
            timeout_secs: default_robots_timeout(),
            ttl_hours: None,
        }
    }
}

impl RobotsConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Cached-rules lifetime; `None` when unset or out of chrono's range
    pub fn ttl(&self) -> Option<chrono::Duration> {
        self.ttl_hours
            .and_then(|hours| i64::try_from(hours).ok())
            .and_then(chrono::Duration::try_hours)
    }
}

/// User agent identification configuration
#[derive(Debug, Clone, Deserialize)]
pub struct UserAgentConfig {
    /// Name of the crawler, also used as the robots.txt product token
    #[serde(rename = "crawler-name")]
    pub crawler_name: String,

    /// Version of the crawler
    #[serde(rename = "crawler-version")]
    pub crawler_version: String,

    /// URL with information about the crawler
    #[serde(rename = "contact-url")]
    pub contact_url: String,

    /// Email address for crawler-related contact
    #[serde(rename = "contact-email")]
    pub contact_email: String,
}

impl UserAgentConfig {
    /// Full header value: `Name/Version (+ContactURL; ContactEmail)`
    pub fn header_value(&self) -> String {
        format!(
            "{}/{} (+{}; {})",
            self.crawler_name, self.crawler_version, self.contact_url, self.contact_email
        )
    }
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    /// Path to the JSON Lines record stream
    #[serde(rename = "records-path")]
    pub records_path: String,

    /// Directory for raw HTML/PDF payloads; disabled when absent
    #[serde(rename = "raw-dir", default)]
    pub raw_dir: Option<String>,
}

/// One crawlable site
#[derive(Debug, Clone, Deserialize)]
pub struct SourceConfig {
    /// Unique source name, copied into every record
    pub name: String,

    /// Seed list pages, crawled in order
    #[serde(rename = "start-urls")]
    pub start_urls: Vec<String>,

    /// Hosts accepted for candidates, matched as case-insensitive suffixes
    #[serde(rename = "allow-domains")]
    pub allow_domains: Vec<String>,

    /// Substrings an article URL must contain (any one of them)
    #[serde(rename = "article-url-contains")]
    pub article_url_contains: Vec<String>,

    /// CSS selector for the "next page" link on list pages
    #[serde(rename = "next-page-selector", default)]
    pub next_page_selector: Option<String>,

    /// Minimum delay before every request to this source (seconds)
    #[serde(rename = "rate-limit-seconds", default = "default_rate_limit")]
    pub rate_limit_seconds: f64,

    /// Maximum list pages traversed per start URL
    #[serde(rename = "max-list-pages", default = "default_max_list_pages")]
    pub max_list_pages: u32,
}

impl SourceConfig {
    pub fn rate_limit(&self) -> Duration {
        Duration::try_from_secs_f64(self.rate_limit_seconds.max(0.0)).unwrap_or(Duration::MAX)
    }

    /// The configured next-page selector, treating a blank string as absent
    pub fn next_page_selector(&self) -> Option<&str> {
        self.next_page_selector
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }
}

fn default_max_docs() -> usize {
    200
}

fn default_request_timeout() -> u64 {
    30
}

fn default_robots_timeout() -> u64 {
    15
}

fn default_rate_limit() -> f64 {
    2.0
}

fn default_max_list_pages() -> u32 {
    3
}
