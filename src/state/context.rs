use std::collections::HashSet;

/// Per-source crawl context
///
/// `seen_urls` only ever grows. It spans every start URL, list page and
/// nested PDF of one source crawl.
#[derive(Debug, Default)]
pub struct CrawlContext {
    seen_urls: HashSet<String>,
}

impl CrawlContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Marks a URL as seen
    ///
    /// # Returns
    ///
    /// * `true` - The URL was new
    /// * `false` - The URL had already been seen
    pub fn mark_seen(&mut self, url: &str) -> bool {
        self.seen_urls.insert(url.to_string())
    }

    pub fn is_seen(&self, url: &str) -> bool {
        self.seen_urls.contains(url)
    }

    pub fn seen_count(&self) -> usize {
        self.seen_urls.len()
    }
}

/// Record budget shared by every source in a run
#[derive(Debug, Clone, Copy)]
pub struct Quota {
    written: usize,
    max: usize,
}

impl Quota {
    pub fn new(max: usize) -> Self {
        Self { written: 0, max }
    }

    pub fn written(&self) -> usize {
        self.written
    }

    pub fn max(&self) -> usize {
        self.max
    }

    pub fn is_reached(&self) -> bool {
        self.written >= self.max
    }

    /// Whether `n` more records fit under the limit
    pub fn has_room_for(&self, n: usize) -> bool {
        self.written.saturating_add(n) <= self.max
    }

    /// Counts one emitted record
    pub fn record(&mut self) {
        self.written += 1;
    }
}
