use crate::state::PageState;
use std::fmt;

/// How processing one seed URL ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CrawlOutcome {
    /// Page fetched and this many distinct links resolved
    Success(usize),

    /// Fetch failed; the reason is the failure kind plus detail
    FetchFailure(String),

    /// Page fetched but no link could be extracted and resolved
    ParseSkipped,
}

impl CrawlOutcome {
    /// Terminal page state this outcome corresponds to
    pub fn terminal_state(&self) -> PageState {
        match self {
            Self::Success(_) => PageState::Written,
            Self::FetchFailure(_) => PageState::FetchFailed,
            Self::ParseSkipped => PageState::Skipped,
        }
    }
}

impl fmt::Display for CrawlOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Success(count) => write!(f, "success ({} links)", count),
            Self::FetchFailure(reason) => write!(f, "fetch failure ({})", reason),
            Self::ParseSkipped => write!(f, "skipped (no links)"),
        }
    }
}
