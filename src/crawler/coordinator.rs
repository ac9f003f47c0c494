//! Crawler coordinator - main crawl orchestration logic
//!
//! This module drives each source end-to-end:
//! - Paginating list pages per start URL
//! - Checking robots rules and spacing requests
//! - Dispatching fetched documents to the right extractor
//! - Emitting one record per processed document
//!
//! Everything runs sequentially on one task, with at most one request in
//! flight. The seen-URL set, the quota and the sink are owned by the caller
//! of `crawl_source` and passed down by reference.

use crate::config::{Config, SourceConfig};
use crate::crawler::discovery::{discover, pdf_links};
use crate::crawler::{build_http_client, fetch_url, FetchResult, FetchedResponse};
use crate::extract::{extract_html, pdf_to_text, ContentKind};
use crate::output::{
    DocumentRecord, HarvestReport, ListAbort, ListAbortReason, RawKind, RawStore, RecordSink,
    SourceReport,
};
use crate::robots::RobotsCache;
use crate::state::{CrawlContext, CrawlPhase, Quota, Throttle};
use crate::url::parse_http_url;
use crate::Result;
use reqwest::Client;
use std::path::Path;
use tokio_util::sync::CancellationToken;
use url::Url;

/// State for one source crawl
struct SourceRun<'a> {
    source: &'a SourceConfig,
    context: CrawlContext,
    throttle: Throttle,
    report: SourceReport,
}

impl<'a> SourceRun<'a> {
    fn new(source: &'a SourceConfig) -> Self {
        Self {
            source,
            context: CrawlContext::new(),
            throttle: Throttle::new(source.rate_limit()),
            report: SourceReport::new(&source.name),
        }
    }
}

/// Main crawler coordinator structure
pub struct Coordinator {
    config: Config,
    client: Client,
    robots: RobotsCache,
    raw_store: Option<RawStore>,
    cancel: CancellationToken,
}

impl Coordinator {
    /// Creates a new coordinator instance
    ///
    /// # Arguments
    ///
    /// * `config` - The validated configuration
    /// * `cancel` - Token that stops the crawl at the next fetch boundary
    ///
    /// # Returns
    ///
    /// * `Ok(Coordinator)` - Successfully created coordinator
    /// * `Err(HarvestError)` - The HTTP client or raw directory could not be set up
    pub fn new(config: Config, cancel: CancellationToken) -> Result<Self> {
        let client = build_http_client(&config.user_agent, config.crawler.request_timeout())?;
        let robots = RobotsCache::new(
            client.clone(),
            &config.robots,
            config.user_agent.crawler_name.clone(),
        );

        let raw_store = match &config.output.raw_dir {
            Some(dir) => Some(RawStore::new(Path::new(dir))?),
            None => None,
        };

        Ok(Self {
            config,
            client,
            robots,
            raw_store,
            cancel,
        })
    }

    /// Crawls every configured source in order under one shared quota
    ///
    /// Stops early once the quota is reached or the token is cancelled.
    pub async fn run(&mut self, sink: &mut dyn RecordSink) -> Result<HarvestReport> {
        let mut quota = Quota::new(self.config.crawler.max_docs);
        let mut report = HarvestReport::default();
        let sources = self.config.sources.clone();

        tracing::info!(
            "Harvesting {} sources (max {} records)",
            sources.len(),
            quota.max()
        );

        for source in &sources {
            if quota.is_reached() {
                tracing::info!("Document limit reached, skipping remaining sources");
                break;
            }

            let source_report = self.crawl_source(source, sink, &mut quota).await?;
            let cancelled = source_report.cancelled;
            report.sources.push(source_report);

            if cancelled {
                tracing::info!("Crawl cancelled");
                break;
            }
        }

        tracing::info!("Harvest finished: {} records", report.total_records());
        Ok(report)
    }

    /// Crawls one source end-to-end
    ///
    /// # Arguments
    ///
    /// * `source` - The source to crawl
    /// * `sink` - Where records are emitted
    /// * `quota` - Record budget shared with other sources
    ///
    /// # Returns
    ///
    /// * `Ok(SourceReport)` - Outcome of the crawl, including aborted paginations
    /// * `Err(HarvestError)` - The sink failed; records already written stay valid
    pub async fn crawl_source(
        &mut self,
        source: &SourceConfig,
        sink: &mut dyn RecordSink,
        quota: &mut Quota,
    ) -> Result<SourceReport> {
        let mut run = SourceRun::new(source);
        tracing::info!("[{}] Starting source", source.name);

        for start_url in &source.start_urls {
            if self.stop_requested(quota, &mut run.report) {
                break;
            }

            match parse_http_url(start_url) {
                Ok(start) => self.crawl_start_url(&mut run, start, sink, quota).await?,
                Err(e) => tracing::warn!("[{}] Skipping start URL {}: {}", source.name, start_url, e),
            }
        }

        tracing::info!(
            "[{}] Done: {} records, {} list pages, {} URLs seen, {} fetch failures",
            source.name,
            run.report.records_emitted,
            run.report.list_pages_fetched,
            run.context.seen_count(),
            run.report.fetch_failures
        );
        Ok(run.report)
    }

    /// Paginates from one start URL
    async fn crawl_start_url(
        &mut self,
        run: &mut SourceRun<'_>,
        start: Url,
        sink: &mut dyn RecordSink,
        quota: &mut Quota,
    ) -> Result<()> {
        let source = run.source;
        let mut phase = CrawlPhase::ListFetch;
        let mut list_url = Some(start.clone());
        let mut page_count = 0u32;

        while let Some(current) = list_url.take() {
            if page_count >= source.max_list_pages || self.stop_requested(quota, &mut run.report) {
                break;
            }
            page_count += 1;

            // A disallowed list page ends this start URL's pagination
            if !self.robots.allowed(&current).await {
                tracing::info!("[{}] robots disallow list: {}", source.name, current);
                abort_list(run, &start, &current, ListAbortReason::RobotsDisallowed);
                break;
            }

            if !run.throttle.wait(&self.cancel).await {
                run.report.cancelled = true;
                break;
            }

            let response = match fetch_url(&self.client, &current).await {
                FetchResult::Success(response) if response.is_error_status() => {
                    tracing::warn!(
                        "[{}] list fetch failed {}: {}",
                        source.name,
                        response.status_code,
                        current
                    );
                    let reason = ListAbortReason::HttpStatus(response.status_code);
                    abort_list(run, &start, &current, reason);
                    break;
                }
                FetchResult::Success(response) => response,
                FetchResult::NetworkError { error } => {
                    tracing::warn!("[{}] list fetch failed: {}: {}", source.name, current, error);
                    abort_list(run, &start, &current, ListAbortReason::Transport(error));
                    break;
                }
            };
            run.report.list_pages_fetched += 1;

            let discovery = discover(&current, &response.text(), source);
            tracing::info!(
                "[{}] list page {}: found {} candidate links",
                source.name,
                page_count,
                discovery.candidates.len()
            );

            phase.transition(CrawlPhase::LinkProcessing)?;
            for candidate in &discovery.candidates {
                if self.stop_requested(quota, &mut run.report) {
                    break;
                }
                self.process_document(run, candidate, sink, quota).await?;
            }
            phase.transition(CrawlPhase::ListFetch)?;

            list_url = discovery.next_page;
        }

        phase.transition(CrawlPhase::Done)?;
        Ok(())
    }

    /// Fetches one candidate document and emits its record
    async fn process_document(
        &mut self,
        run: &mut SourceRun<'_>,
        url: &Url,
        sink: &mut dyn RecordSink,
        quota: &mut Quota,
    ) -> Result<()> {
        let source = run.source;

        if !run.context.mark_seen(url.as_str()) {
            return Ok(());
        }

        // A disallowed document is skipped on its own
        if !self.robots.allowed(url).await {
            tracing::debug!("[{}] robots disallow: {}", source.name, url);
            run.report.robots_skips += 1;
            return Ok(());
        }

        let Some(response) = self.fetch_document(run, url).await else {
            return Ok(());
        };

        let record = DocumentRecord::new(
            &source.name,
            url.as_str(),
            response.status_code,
            &response.content_type,
        );

        let kind = ContentKind::classify(
            response.status_code,
            &response.content_type,
            url,
            response.body.is_empty(),
        );

        let record = match kind {
            ContentKind::Html => {
                self.save_raw(&record.doc_id, RawKind::Html, &response.body);
                let markup = response.text();
                let content = extract_html(&markup);

                for pdf_url in pdf_links(url, &markup, &source.allow_domains) {
                    if self.cancel.is_cancelled() {
                        run.report.cancelled = true;
                        break;
                    }
                    // Leave room for this page's own record
                    if !quota.has_room_for(2) {
                        tracing::debug!("[{}] No quota left for nested PDFs on {}", source.name, url);
                        break;
                    }
                    self.process_nested_pdf(run, &pdf_url, sink, quota).await?;
                }

                record.with_content(content.title, content.published_date, &content.text)
            }
            ContentKind::Pdf => {
                self.save_raw(&record.doc_id, RawKind::Pdf, &response.body);
                self.pdf_record(record, &response.body)
            }
            ContentKind::Other => record,
        };

        self.emit(run, sink, quota, &record)
    }

    /// Fetches a PDF linked from an article page and emits its record
    async fn process_nested_pdf(
        &mut self,
        run: &mut SourceRun<'_>,
        url: &Url,
        sink: &mut dyn RecordSink,
        quota: &mut Quota,
    ) -> Result<()> {
        if run.context.is_seen(url.as_str()) {
            return Ok(());
        }
        if !self.robots.allowed(url).await {
            tracing::debug!("[{}] robots disallow PDF: {}", run.source.name, url);
            run.report.robots_skips += 1;
            return Ok(());
        }
        run.context.mark_seen(url.as_str());

        let Some(response) = self.fetch_document(run, url).await else {
            return Ok(());
        };

        let record = DocumentRecord::new(
            &run.source.name,
            url.as_str(),
            response.status_code,
            &response.content_type,
        );
        let record = if response.is_error_status() {
            record
        } else {
            self.save_raw(&record.doc_id, RawKind::Pdf, &response.body);
            self.pdf_record(record, &response.body)
        };

        self.emit(run, sink, quota, &record)?;
        run.report.nested_pdf_records += 1;
        Ok(())
    }

    /// Waits out the rate limit and fetches a document
    ///
    /// Returns None on cancellation or transport failure; both are noted in
    /// the source report.
    async fn fetch_document(
        &mut self,
        run: &mut SourceRun<'_>,
        url: &Url,
    ) -> Option<FetchedResponse> {
        if !run.throttle.wait(&self.cancel).await {
            run.report.cancelled = true;
            return None;
        }

        match fetch_url(&self.client, url).await {
            FetchResult::Success(response) => {
                tracing::debug!(
                    "[{}] {} {} ({})",
                    run.source.name,
                    response.status_code,
                    url,
                    response.content_type
                );
                Some(response)
            }
            FetchResult::NetworkError { error } => {
                tracing::warn!("[{}] fetch failed: {}: {}", run.source.name, url, error);
                run.report.fetch_failures += 1;
                None
            }
        }
    }

    fn pdf_record(&self, record: DocumentRecord, body: &[u8]) -> DocumentRecord {
        match pdf_to_text(body) {
            Ok(text) => record.with_text(&text),
            Err(e) => {
                tracing::warn!("parse error: {} -> {}", record.url, e);
                record
            }
        }
    }

    fn emit(
        &self,
        run: &mut SourceRun<'_>,
        sink: &mut dyn RecordSink,
        quota: &mut Quota,
        record: &DocumentRecord,
    ) -> Result<()> {
        sink.emit(record)?;
        quota.record();
        run.report.records_emitted += 1;
        Ok(())
    }

    /// Raw persistence never affects record emission
    fn save_raw(&self, doc_id: &str, kind: RawKind, body: &[u8]) {
        if let Some(store) = &self.raw_store {
            if let Err(e) = store.save(doc_id, kind, body) {
                tracing::warn!("Failed to save raw {} for {}: {}", kind.extension(), doc_id, e);
            }
        }
    }

    /// Checks the cancellation token and the quota, noting which one fired
    fn stop_requested(&self, quota: &Quota, report: &mut SourceReport) -> bool {
        if self.cancel.is_cancelled() {
            report.cancelled = true;
            true
        } else if quota.is_reached() {
            report.quota_reached = true;
            true
        } else {
            false
        }
    }
}

fn abort_list(run: &mut SourceRun<'_>, start: &Url, list_url: &Url, reason: ListAbortReason) {
    run.report.list_aborts.push(ListAbort {
        start_url: start.to_string(),
        list_url: list_url.to_string(),
        reason,
    });
}
