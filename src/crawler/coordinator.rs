//! Crawler coordinator - batch orchestration
//!
//! This module fans the page processor and the result sink out over every
//! seed URL, waits for all of them, and owns the resources they share:
//! - The HTTP client (one connection pool for the whole batch)
//! - The result sink (the only writer of the results file)
//! - A semaphore bounding the number of requests in flight

use crate::config::Config;
use crate::crawler::fetcher::{build_http_client, FetchOptions};
use crate::crawler::processor::PageProcessor;
use crate::output::{CrawlStatistics, ResultSink};
use crate::state::{CrawlOutcome, PageState, PageTracker};
use crate::HarvestError;
use futures::future::join_all;
use std::path::Path;
use tokio::fs::File;
use tokio::io::AsyncWrite;
use tokio::sync::Semaphore;

/// Main crawler coordinator structure
pub struct Coordinator<W> {
    seeds: Vec<String>,
    processor: PageProcessor,
    sink: ResultSink<W>,
    limiter: Semaphore,
    stats: CrawlStatistics,
}

impl Coordinator<File> {
    /// Creates a coordinator writing to the results file named in `config`
    ///
    /// The results file is truncated and its header written here, before
    /// any request is sent.
    ///
    /// # Returns
    ///
    /// * `Ok(Coordinator)` - Ready to run
    /// * `Err(HarvestError)` - The HTTP client or the results file could not be set up
    pub async fn from_config(config: &Config, seeds: Vec<String>) -> Result<Self, HarvestError> {
        let client = build_http_client(&config.http)?;
        let processor = PageProcessor::new(client, FetchOptions::default(), config.extract.mode);

        let sink = ResultSink::create(Path::new(&config.output.results_path)).await?;

        Ok(Self::new(
            seeds,
            processor,
            sink,
            config.http.max_concurrent_requests,
        ))
    }
}

impl<W: AsyncWrite + Unpin> Coordinator<W> {
    /// Creates a coordinator from already-built parts
    pub fn new(
        seeds: Vec<String>,
        processor: PageProcessor,
        sink: ResultSink<W>,
        max_concurrent_requests: usize,
    ) -> Self {
        Self {
            seeds,
            processor,
            sink,
            limiter: Semaphore::new(max_concurrent_requests.max(1)),
            stats: CrawlStatistics::new(),
        }
    }

    /// Crawls every seed concurrently and waits for all of them
    ///
    /// Per-URL failures are logged and counted; they never make this
    /// method fail.
    pub async fn run(&mut self) -> Result<(), HarvestError> {
        tracing::info!("Starting crawl of {} seed URLs", self.seeds.len());
        self.stats = CrawlStatistics::new();
        self.stats.start();

        let results = {
            let this = &*self;
            join_all(this.seeds.iter().map(|seed| this.crawl_one(seed))).await
        };

        for (outcome, written) in &results {
            self.stats.record(outcome, *written);
        }

        self.stats.finish();
        tracing::info!("Crawl completed: {}", self.stats);

        Ok(())
    }

    /// Statistics for the last (or current) run
    pub fn statistics(&self) -> &CrawlStatistics {
        &self.stats
    }

    /// Consumes the coordinator, closing the HTTP client, and returns the results writer
    pub fn into_writer(self) -> W {
        self.sink.into_inner()
    }

    /// Processes one seed and writes its records
    ///
    /// Returns the outcome and the number of records written, or `None`
    /// when the write itself failed.
    async fn crawl_one(&self, seed: &str) -> (CrawlOutcome, Option<usize>) {
        let mut tracker = PageTracker::new(seed);

        let page = {
            // The semaphore is never closed, so acquire cannot fail
            let _permit = self.limiter.acquire().await.ok();
            self.processor.process(&mut tracker).await
        };

        let written = match page.outcome {
            // Already terminal
            CrawlOutcome::FetchFailure(_) => Some(0),
            CrawlOutcome::ParseSkipped => {
                tracing::debug!("{} No links to write", seed);
                finish(&mut tracker, page.outcome.terminal_state());
                Some(0)
            }
            CrawlOutcome::Success(_) => {
                match self.sink.write_records(&page.source, &page.links).await {
                    Ok(count) => {
                        finish(&mut tracker, page.outcome.terminal_state());
                        Some(count)
                    }
                    Err(e) => {
                        tracing::error!("{} Failed to write links: {}", seed, e);
                        finish(&mut tracker, PageState::Skipped);
                        None
                    }
                }
            }
        };

        tracing::debug!("{} Finished: {} ({})", seed, page.outcome, tracker.state());
        (page.outcome, written)
    }
}

fn finish(tracker: &mut PageTracker, state: PageState) {
    if let Err(e) = tracker.advance(state) {
        tracing::error!("{} {}", tracker.url(), e);
    }
}

/// Runs a batch over `seeds` with the HTTP and output settings from `config`
///
/// # Example
///
/// ```no_run
/// use sumi_harvest::config::Config;
/// use sumi_harvest::crawler::run_crawl;
///
/// # async fn example() -> Result<(), sumi_harvest::HarvestError> {
/// let seeds = vec!["https://example.com/".to_string()];
/// run_crawl(&Config::default(), seeds).await?;
/// # Ok(())
/// # }
/// ```
pub async fn run_crawl(config: &Config, seeds: Vec<String>) -> Result<(), HarvestError> {
    let mut coordinator = Coordinator::from_config(config, seeds).await?;
    coordinator.run().await
}
