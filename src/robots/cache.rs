//! Cached robots.txt entries

use crate::robots::ParsedRobots;
use chrono::{DateTime, Duration, Utc};

/// Rule set for one authority along with when it was fetched
#[derive(Debug, Clone)]
pub struct CachedRobots {
    pub content: ParsedRobots,
    pub fetched_at: DateTime<Utc>,
}

impl CachedRobots {
    /// Creates an entry stamped with the current time
    pub fn new(content: ParsedRobots) -> Self {
        Self {
            content,
            fetched_at: Utc::now(),
        }
    }

    /// Checks whether the entry has outlived the TTL
    ///
    /// # Arguments
    ///
    /// * `ttl` - Maximum age; `None` means entries never expire
    ///
    /// # Returns
    ///
    /// * `true` - If a TTL is set and the entry is older than it
    /// * `false` - Otherwise
    pub fn is_stale(&self, ttl: Option<Duration>) -> bool {
        match ttl {
            Some(ttl) => self.age() > ttl,
            None => false,
        }
    }

    /// How long ago the entry was fetched
    fn age(&self) -> Duration {
        Utc::now() - self.fetched_at
    }

    pub fn is_allowed(&self, url: &str, user_agent: &str) -> bool {
        self.content.is_allowed(url, user_agent)
    }
}
