//! Structured crawl outcomes
//!
//! Every source crawl returns a `SourceReport`; a full run aggregates them
//! into a `HarvestReport` that the CLI prints at the end.

use std::fmt;

/// Why a start URL's pagination stopped early
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListAbortReason {
    /// robots.txt disallows the list page
    RobotsDisallowed,
    /// The list page returned an error status
    HttpStatus(u16),
    /// The list page could not be fetched at all
    Transport(String),
}

impl fmt::Display for ListAbortReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::RobotsDisallowed => write!(f, "disallowed by robots.txt"),
            Self::HttpStatus(status) => write!(f, "HTTP {}", status),
            Self::Transport(error) => write!(f, "fetch failed: {}", error),
        }
    }
}

/// An aborted list-page traversal
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListAbort {
    pub start_url: String,
    pub list_url: String,
    pub reason: ListAbortReason,
}

/// Outcome of crawling one source
#[derive(Debug, Clone, Default)]
pub struct SourceReport {
    /// Source name
    pub source: String,

    /// List pages fetched successfully
    pub list_pages_fetched: u32,

    /// Records emitted, nested PDFs included
    pub records_emitted: usize,

    /// Records emitted for PDFs linked from article pages
    pub nested_pdf_records: usize,

    /// Documents skipped because robots.txt disallowed them
    pub robots_skips: usize,

    /// Documents that failed at transport level and produced no record
    pub fetch_failures: usize,

    /// Start URLs whose pagination ended early
    pub list_aborts: Vec<ListAbort>,

    /// The shared record budget ran out during this source
    pub quota_reached: bool,

    /// The run was cancelled during this source
    pub cancelled: bool,
}

impl SourceReport {
    pub fn new(source: &str) -> Self {
        Self {
            source: source.to_string(),
            ..Self::default()
        }
    }
}

/// Outcome of a complete run
#[derive(Debug, Clone, Default)]
pub struct HarvestReport {
    pub sources: Vec<SourceReport>,
}

impl HarvestReport {
    pub fn total_records(&self) -> usize {
        self.sources.iter().map(|s| s.records_emitted).sum()
    }

    pub fn total_fetch_failures(&self) -> usize {
        self.sources.iter().map(|s| s.fetch_failures).sum()
    }

    pub fn quota_reached(&self) -> bool {
        self.sources.iter().any(|s| s.quota_reached)
    }

    pub fn cancelled(&self) -> bool {
        self.sources.iter().any(|s| s.cancelled)
    }
}

/// Prints a run report to stdout
pub fn print_report(report: &HarvestReport) {
    println!("=== Harvest Report ===\n");

    for source in &report.sources {
        println!("[{}]", source.source);
        println!("  List pages fetched: {}", source.list_pages_fetched);
        println!(
            "  Records emitted: {} ({} nested PDFs)",
            source.records_emitted, source.nested_pdf_records
        );
        println!("  Robots skips: {}", source.robots_skips);
        println!("  Fetch failures: {}", source.fetch_failures);

        for abort in &source.list_aborts {
            println!("  Pagination aborted at {}: {}", abort.list_url, abort.reason);
        }
        println!();
    }

    println!("Total records: {}", report.total_records());
    if report.quota_reached() {
        println!("Stopped: document limit reached");
    }
    if report.cancelled() {
        println!("Stopped: cancelled");
    }
}
