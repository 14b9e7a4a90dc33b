//! Page state definitions for tracking a seed URL through one crawl
//!
//! ```text
//! Pending → Fetching → Fetched → Extracting → Resolving → Written
//!                    ↘ FetchFailed                     ↘ Skipped
//! ```

use crate::HarvestError;
use std::fmt;

/// Represents the current state of a seed URL in the crawl process
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PageState {
    // ===== Active States =====
    /// Seed accepted, no request sent yet
    Pending,

    /// Request in flight
    Fetching,

    /// Body received
    Fetched,

    /// Pulling raw hrefs out of the body
    Extracting,

    /// Turning raw hrefs into absolute URLs
    Resolving,

    // ===== Terminal States =====
    /// At least one record was written for this page
    Written,

    /// Page fetched but no links survived resolution; nothing written
    Skipped,

    /// Fetch failed; nothing written
    FetchFailed,
}

impl PageState {
    /// Returns true if this is a terminal state (no further processing)
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Written | Self::Skipped | Self::FetchFailed)
    }

    /// Returns true if moving from `self` to `next` follows the state machine
    pub fn can_transition_to(&self, next: PageState) -> bool {
        use PageState::*;
        matches!(
            (self, next),
            (Pending, Fetching)
                | (Fetching, Fetched)
                | (Fetching, FetchFailed)
                | (Fetched, Extracting)
                | (Extracting, Resolving)
                | (Resolving, Written)
                | (Resolving, Skipped)
        )
    }

    /// Lowercase name used in log output
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Fetching => "fetching",
            Self::Fetched => "fetched",
            Self::Extracting => "extracting",
            Self::Resolving => "resolving",
            Self::Written => "written",
            Self::Skipped => "skipped",
            Self::FetchFailed => "fetch_failed",
        }
    }

}

impl fmt::Display for PageState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Tracks the state of one seed URL and rejects illegal transitions
#[derive(Debug, Clone)]
pub struct PageTracker {
    url: String,
    state: PageState,
}

impl PageTracker {
    /// Starts tracking `url` in [`PageState::Pending`]
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            state: PageState::Pending,
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn state(&self) -> PageState {
        self.state
    }

    /// Moves to `next`, failing if the state machine does not allow it
    pub fn advance(&mut self, next: PageState) -> Result<(), HarvestError> {
        if !self.state.can_transition_to(next) {
            return Err(HarvestError::InvalidTransition {
                from: self.state,
                to: next,
            });
        }
        tracing::trace!("{} {} -> {}", self.url, self.state, next);
        self.state = next;
        Ok(())
    }
}
