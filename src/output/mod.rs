//! Output module for crawl results
//!
//! This module handles:
//! - Writing (source, link) records to the results file
//! - Recording crawl statistics for the run summary

mod sink;
pub mod stats;

pub use sink::{format_records, ResultSink, HEADER};
pub use stats::CrawlStatistics;
