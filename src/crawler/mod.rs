//! Crawler module for page fetching and link harvesting
//!
//! This module contains the core crawling logic, including:
//! - HTTP fetching with error classification
//! - Link extraction from page content
//! - Per-page processing with failure isolation
//! - Concurrent batch coordination

mod coordinator;
mod fetcher;
mod parser;
mod processor;

pub use coordinator::{run_crawl, Coordinator};
pub use fetcher::{build_http_client, fetch_page, FetchError, FetchOptions};
pub use parser::{extract_href_attributes, extract_hrefs, extract_links};
pub use processor::{resolve_all, PageProcessor, ProcessedPage};

use crate::config::Config;
use crate::input::read_seed_urls;
use crate::HarvestError;
use std::path::Path;

/// Runs a complete crawl operation
///
/// This is the main entry point for a batch. It will:
/// 1. Read the seed URLs
/// 2. Truncate the results file and write its header
/// 3. Build the HTTP client
/// 4. Fetch every seed concurrently and append the links found
///
/// Steps 1 and 2 happen before any request is sent; a failure there is the
/// only way this function returns an error.
///
/// # Arguments
///
/// * `config` - The harvester configuration
pub async fn crawl(config: &Config) -> Result<(), HarvestError> {
    let seeds = read_seed_urls(Path::new(&config.input.urls_path))?;
    tracing::info!(
        "Read {} seed URLs from {}",
        seeds.len(),
        config.input.urls_path
    );
    run_crawl(config, seeds).await
}
