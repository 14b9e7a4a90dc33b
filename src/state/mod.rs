//! Per-URL state tracking
//!
//! Each seed URL walks a small state machine while it is processed and ends
//! with a [`CrawlOutcome`] that feeds the run statistics.

mod outcome;
mod page_state;

pub use outcome::CrawlOutcome;
pub use page_state::{PageState, PageTracker};
