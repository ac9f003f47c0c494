//! Robots.txt handling module
//!
//! This module fetches, parses, and caches robots.txt rules per authority.
//! The cache is an explicit object owned by the crawl coordinator.

mod cache;
mod parser;

pub use cache::CachedRobots;
pub use parser::ParsedRobots;

use crate::config::{RobotsConfig, RobotsPolicy};
use crate::url::extract_authority;
use reqwest::Client;
use std::collections::HashMap;
use std::time::Duration;
use url::Url;

/// Lazily populated robots.txt cache keyed by authority
pub struct RobotsCache {
    client: Client,
    product_token: String,
    policy: RobotsPolicy,
    timeout: Duration,
    ttl: Option<chrono::Duration>,
    entries: HashMap<String, CachedRobots>,
}

impl RobotsCache {
    /// Creates an empty cache
    ///
    /// # Arguments
    ///
    /// * `client` - HTTP client carrying the crawler's User-Agent header
    /// * `config` - Policy, timeout and TTL settings
    /// * `product_token` - Name matched against `User-agent:` groups
    pub fn new(client: Client, config: &RobotsConfig, product_token: impl Into<String>) -> Self {
        Self {
            client,
            product_token: product_token.into(),
            policy: config.policy,
            timeout: config.timeout(),
            ttl: config.ttl(),
            entries: HashMap::new(),
        }
    }

    /// Checks whether the crawler may fetch a URL
    ///
    /// Fetches robots.txt for the URL's authority on first use (or once the
    /// cached entry is older than the TTL). URLs without a host are never
    /// allowed.
    pub async fn allowed(&mut self, url: &Url) -> bool {
        let Some(authority) = extract_authority(url) else {
            return false;
        };

        let needs_fetch = match self.entries.get(&authority) {
            Some(entry) => entry.is_stale(self.ttl),
            None => true,
        };

        if needs_fetch {
            let robots_url = format!("{}://{}/robots.txt", url.scheme(), authority);
            let rules = self.fetch_rules(&robots_url).await;
            self.entries
                .insert(authority.clone(), CachedRobots::new(rules));
        }

        self.entries
            .get(&authority)
            .map(|entry| entry.is_allowed(url.as_str(), &self.product_token))
            .unwrap_or(false)
    }

    /// Number of authorities with cached rules
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Fetches and parses one robots.txt
    ///
    /// A 4xx response means there is no robots file. Transport failures and
    /// 5xx responses resolve according to the configured policy.
    async fn fetch_rules(&self, robots_url: &str) -> ParsedRobots {
        tracing::debug!("Fetching {}", robots_url);

        let response = match self
            .client
            .get(robots_url)
            .timeout(self.timeout)
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) => {
                tracing::warn!("robots.txt fetch failed for {}: {}", robots_url, e);
                return self.unreachable_rules();
            }
        };

        let status = response.status();
        if status.is_server_error() {
            tracing::warn!("robots.txt returned {} for {}", status.as_u16(), robots_url);
            return self.unreachable_rules();
        }
        if status.as_u16() >= 400 {
            tracing::debug!("No robots.txt at {} ({})", robots_url, status.as_u16());
            return ParsedRobots::AllowAll;
        }

        match response.text().await {
            Ok(body) => ParsedRobots::from_content(&body),
            Err(e) => {
                tracing::warn!("Failed to read robots.txt body from {}: {}", robots_url, e);
                self.unreachable_rules()
            }
        }
    }

    fn unreachable_rules(&self) -> ParsedRobots {
        match self.policy {
            RobotsPolicy::FailOpen => ParsedRobots::AllowAll,
            RobotsPolicy::FailClosed => ParsedRobots::DisallowAll,
        }
    }
}
