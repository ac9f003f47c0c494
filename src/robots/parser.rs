//! Robots.txt rule sets
//!
//! Rule matching is delegated to the robotstxt crate.

use robotstxt::DefaultMatcher;

/// Rule set for one authority
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParsedRobots {
    /// No robots.txt, or it could not be fetched under the fail-open policy
    AllowAll,
    /// Unreachable robots.txt under the fail-closed policy
    DisallowAll,
    /// Raw robots.txt body, matched on demand
    Rules(String),
}

impl ParsedRobots {
    /// Creates a rule set from a robots.txt body
    ///
    /// An empty or whitespace-only body allows everything.
    pub fn from_content(content: &str) -> Self {
        if content.trim().is_empty() {
            Self::AllowAll
        } else {
            Self::Rules(content.to_string())
        }
    }

    /// Checks if a URL is allowed for the given product token
    ///
    /// # Arguments
    ///
    /// * `url` - The absolute URL (or path) to check
    /// * `user_agent` - The product token, e.g. `ScamCorpusBot`
    ///
    /// # Returns
    ///
    /// * `true` - If the URL is allowed
    /// * `false` - If the URL is disallowed
    pub fn is_allowed(&self, url: &str, user_agent: &str) -> bool {
        match self {
            Self::AllowAll => true,
            Self::DisallowAll => false,
            Self::Rules(content) => {
                let mut matcher = DefaultMatcher::default();
                matcher.one_agent_allowed_by_robots(content, user_agent, url)
            }
        }
    }
}
