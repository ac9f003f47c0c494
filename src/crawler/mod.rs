//! Crawler module for list traversal and document harvesting
//!
//! This module contains the core crawling logic, including:
//! - HTTP fetching with an identifying user agent
//! - List-page link discovery and nested PDF discovery
//! - Overall crawl coordination

mod coordinator;
mod discovery;
mod fetcher;

pub use coordinator::Coordinator;
pub use discovery::{discover, pdf_links, Discovery};
pub use fetcher::{build_http_client, fetch_url, FetchResult, FetchedResponse};

use crate::config::Config;
use crate::output::{HarvestReport, JsonlSink};
use crate::Result;
use std::path::Path;
use tokio_util::sync::CancellationToken;

/// Runs a complete crawl into the configured record stream
///
/// This is the main entry point for starting a crawl. It will:
/// 1. Open the JSON Lines record stream for appending
/// 2. Build the HTTP client and robots cache
/// 3. Crawl every source in order under one document limit
///
/// # Arguments
///
/// * `config` - The validated configuration
/// * `cancel` - Token that stops the crawl at the next fetch boundary
///
/// # Returns
///
/// * `Ok(HarvestReport)` - Crawl finished, hit its limit, or was cancelled
/// * `Err(HarvestError)` - Setup failed or a record could not be written
pub async fn crawl(config: Config, cancel: CancellationToken) -> Result<HarvestReport> {
    let mut sink = JsonlSink::open(Path::new(&config.output.records_path))?;
    let mut coordinator = Coordinator::new(config, cancel)?;
    coordinator.run(&mut sink).await
}
