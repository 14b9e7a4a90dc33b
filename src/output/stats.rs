//! Run statistics
//!
//! Tallies per-URL outcomes over one batch. Logged when the batch finishes.

use crate::state::CrawlOutcome;
use chrono::{DateTime, Utc};
use std::fmt;

/// Counters for one crawl run
#[derive(Debug, Clone, Default)]
pub struct CrawlStatistics {
    /// Seeds processed
    pub total_seeds: u64,

    /// Pages with at least one record written
    pub succeeded: u64,

    /// Pages fetched without any usable link
    pub skipped: u64,

    /// Pages whose fetch failed
    pub failed: u64,

    /// Pages whose links were found but could not be written
    pub write_failures: u64,

    /// Records written to the results file
    pub records_written: u64,

    pub started_at: Option<DateTime<Utc>>,
    pub finished_at: Option<DateTime<Utc>>,
}

impl CrawlStatistics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn start(&mut self) {
        self.started_at = Some(Utc::now());
    }

    pub fn finish(&mut self) {
        self.finished_at = Some(Utc::now());
    }

    /// Records the outcome of one seed and the number of records written for it
    ///
    /// `None` means the page's links were found but the write failed; the
    /// page then counts as a write failure instead of a success.
    pub fn record(&mut self, outcome: &CrawlOutcome, written: Option<usize>) {
        self.total_seeds += 1;
        let Some(written) = written else {
            self.write_failures += 1;
            return;
        };
        match outcome {
            CrawlOutcome::Success(_) => self.succeeded += 1,
            CrawlOutcome::ParseSkipped => self.skipped += 1,
            CrawlOutcome::FetchFailure(_) => self.failed += 1,
        }
        self.records_written += written as u64;
    }

    /// Wall-clock duration of the run, once finished
    pub fn duration(&self) -> Option<chrono::Duration> {
        match (self.started_at, self.finished_at) {
            (Some(start), Some(end)) => Some(end - start),
            _ => None,
        }
    }

    /// Percentage of seeds that produced records
    pub fn success_rate(&self) -> f64 {
        if self.total_seeds == 0 {
            return 0.0;
        }
        (self.succeeded as f64 / self.total_seeds as f64) * 100.0
    }
}

impl fmt::Display for CrawlStatistics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} seeds: {} succeeded, {} skipped, {} failed, {} write failures; {} records written ({:.1}% success)",
            self.total_seeds,
            self.succeeded,
            self.skipped,
            self.failed,
            self.write_failures,
            self.records_written,
            self.success_rate()
        )?;
        if let Some(duration) = self.duration() {
            write!(f, " in {}ms", duration.num_milliseconds())?;
        }
        Ok(())
    }
}
