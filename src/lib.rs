//! Sumi-Harvest: a concurrent link harvester
//!
//! This crate fetches a batch of seed pages concurrently, pulls the `href`
//! values out of each page, resolves them against the page URL, and appends
//! every (source, link) pair to a tab-separated results file.

pub mod config;
pub mod crawler;
pub mod input;
pub mod output;
pub mod state;
pub mod url;

use thiserror::Error;

/// Main error type for Sumi-Harvest operations
///
/// Per-URL failures never surface here; they are absorbed by the page
/// processor. What remains are setup failures that stop a run before any
/// request is sent.
#[derive(Debug, Error)]
pub enum HarvestError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Failed to read seed URLs from {path}: {source}")]
    SeedInput {
        path: String,
        source: std::io::Error,
    },

    #[error("Failed to open results file {path}: {source}")]
    Destination {
        path: String,
        source: std::io::Error,
    },

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("Invalid state transition: {from:?} -> {to:?}")]
    InvalidTransition {
        from: state::PageState,
        to: state::PageState,
    },
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),
}

/// URL-specific errors
#[derive(Debug, Error, PartialEq, Eq)]
pub enum UrlError {
    #[error("Failed to parse URL: {0}")]
    Parse(String),

    #[error("Malformed scheme in {0:?}")]
    MalformedScheme(String),

    #[error("Illegal character {ch:?} in {href:?}")]
    IllegalCharacter { href: String, ch: char },
}

/// Result type alias for Sumi-Harvest operations
pub type Result<T> = std::result::Result<T, HarvestError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Result type alias for URL operations
pub type UrlResult<T> = std::result::Result<T, UrlError>;

// Re-export commonly used types
pub use config::Config;
pub use crawler::{crawl, Coordinator};
pub use state::{CrawlOutcome, PageState};
pub use crate::url::resolve_link;
