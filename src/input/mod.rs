//! Seed URL input
//!
//! Seeds come from a newline-delimited text file that is read once, before
//! any network activity starts.

use crate::HarvestError;
use std::collections::HashSet;
use std::path::Path;

/// Reads the seed URL list from `path`
///
/// # Returns
///
/// * `Ok(Vec<String>)` - The seeds, see [`parse_seed_urls`]
/// * `Err(HarvestError::SeedInput)` - The file could not be read
pub fn read_seed_urls(path: &Path) -> Result<Vec<String>, HarvestError> {
    let content = std::fs::read_to_string(path).map_err(|source| HarvestError::SeedInput {
        path: path.display().to_string(),
        source,
    })?;
    Ok(parse_seed_urls(&content))
}

/// Parses seed URLs from newline-delimited text
///
/// Each line is trimmed. Blank lines and lines starting with `#` are
/// dropped. Duplicates are removed, keeping first-seen order.
///
/// # Example
///
/// ```
/// use sumi_harvest::input::parse_seed_urls;
///
/// let seeds = parse_seed_urls("http://a.test/\n\n  http://b.test/  \nhttp://a.test/\n");
/// assert_eq!(seeds, vec!["http://a.test/", "http://b.test/"]);
/// ```
pub fn parse_seed_urls(content: &str) -> Vec<String> {
    let mut seen = HashSet::new();
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .filter(|line| seen.insert(*line))
        .map(str::to_string)
        .collect()
}
