//! Page processor
//!
//! Runs fetch, extraction and resolution for one seed URL. Every failure is
//! absorbed here and reduced to "no links for this URL", so a bad page never
//! takes the rest of the batch down with it.

use crate::config::ExtractMode;
use crate::crawler::fetcher::{fetch_page, FetchError, FetchOptions};
use crate::crawler::parser::extract_links;
use crate::state::{CrawlOutcome, PageState, PageTracker};
use crate::url::resolve_link;
use reqwest::Client;
use std::collections::BTreeSet;
use url::Url;

/// Result of processing one seed URL
#[derive(Debug, Clone)]
pub struct ProcessedPage {
    /// The seed URL as given
    pub source: String,

    /// Distinct absolute links found on the page
    pub links: BTreeSet<String>,

    /// How processing ended
    pub outcome: CrawlOutcome,
}

impl ProcessedPage {
    fn failed(source: &str, reason: String) -> Self {
        Self {
            source: source.to_string(),
            links: BTreeSet::new(),
            outcome: CrawlOutcome::FetchFailure(reason),
        }
    }
}

/// Turns seed URLs into discovered link sets
///
/// Holds the shared HTTP client; cloning a `reqwest::Client` shares its
/// connection pool, and nothing here mutates it.
#[derive(Debug, Clone)]
pub struct PageProcessor {
    client: Client,
    options: FetchOptions,
    mode: ExtractMode,
}

impl PageProcessor {
    pub fn new(client: Client, options: FetchOptions, mode: ExtractMode) -> Self {
        Self {
            client,
            options,
            mode,
        }
    }

    /// Processes the URL tracked by `tracker`
    ///
    /// # Steps
    ///
    /// 1. Parse the seed and fetch it; any failure is logged at error level
    ///    and yields an empty link set
    /// 2. Extract raw hrefs from the body
    /// 3. Resolve each href against the seed; unresolvable hrefs are logged
    ///    and skipped without affecting the others
    ///
    /// On return the tracker is in `FetchFailed` or `Resolving`; the caller
    /// moves it to its terminal state once the links are written.
    pub async fn process(&self, tracker: &mut PageTracker) -> ProcessedPage {
        let source = tracker.url().to_string();
        enter(tracker, PageState::Fetching);

        let parsed = match source.chars().find(|c| c.is_ascii_control()) {
            Some(ch) => Err(format!("illegal character {:?}", ch)),
            None => Url::parse(&source).map_err(|e| e.to_string()),
        };
        let base = match parsed {
            Ok(base) => base,
            Err(e) => {
                tracing::error!("{} Unexpected error: not a valid URL: {}", source, e);
                enter(tracker, PageState::FetchFailed);
                return ProcessedPage::failed(&source, format!("invalid URL: {}", e));
            }
        };

        let body = match fetch_page(&self.client, &base, &self.options).await {
            Ok(body) => body,
            Err(e) => {
                log_fetch_error(&source, &e);
                enter(tracker, PageState::FetchFailed);
                return ProcessedPage::failed(&source, e.to_string());
            }
        };
        enter(tracker, PageState::Fetched);

        enter(tracker, PageState::Extracting);
        let hrefs = extract_links(&body, self.mode);
        drop(body);

        enter(tracker, PageState::Resolving);
        let links = resolve_all(&base, &hrefs);
        tracing::info!("{} Found {} links.", source, links.len());

        let outcome = if links.is_empty() {
            CrawlOutcome::ParseSkipped
        } else {
            CrawlOutcome::Success(links.len())
        };

        ProcessedPage {
            source,
            links,
            outcome,
        }
    }
}

/// Resolves every href against `base`, skipping the ones that fail
pub fn resolve_all(base: &Url, hrefs: &BTreeSet<String>) -> BTreeSet<String> {
    let mut found = BTreeSet::new();
    for href in hrefs {
        match resolve_link(base, href) {
            Ok(absolute) => {
                found.insert(absolute.to_string());
            }
            Err(e) => {
                tracing::warn!("{} Error parsing. Ignoring. ({})", href, e);
            }
        }
    }
    found
}

fn log_fetch_error(url: &str, error: &FetchError) {
    match error {
        FetchError::HttpStatus { status } => {
            tracing::error!("{} HTTP status error: status={}", url, status);
        }
        FetchError::Transport { message } => {
            tracing::error!("{} Transport error: {}", url, message);
        }
        FetchError::Unexpected { .. } => {
            tracing::error!("{} Unexpected error during fetch: {:?}", url, error);
        }
    }
}

/// Advances the tracker; an illegal transition is a bug, not a page failure
fn enter(tracker: &mut PageTracker, state: PageState) {
    if let Err(e) = tracker.advance(state) {
        tracing::error!("{} {}", tracker.url(), e);
    }
}
