//! HTTP fetcher implementation
//!
//! This module handles all HTTP requests for the harvester:
//! - Building the shared HTTP client from configuration
//! - One GET request per page, with optional per-request options
//! - Status validation and error classification

use crate::config::HttpConfig;
use reqwest::Client;
use std::time::Duration;
use thiserror::Error;
use url::Url;

/// Why a page could not be fetched
#[derive(Debug, Error)]
pub enum FetchError {
    /// No response was obtained (DNS failure, refused or reset connection, timeout)
    #[error("transport error: {message}")]
    Transport { message: String },

    /// A response arrived with a non-success status
    #[error("http status {status}")]
    HttpStatus { status: u16 },

    /// Anything else (request construction, body decoding, ...)
    #[error("unexpected error: {message}")]
    Unexpected { message: String },
}

impl FetchError {
    /// Short label used in log messages and statistics
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Transport { .. } => "transport",
            Self::HttpStatus { .. } => "http status",
            Self::Unexpected { .. } => "unexpected",
        }
    }

    /// Classifies a reqwest error raised while sending or reading a response
    fn from_reqwest(error: reqwest::Error) -> Self {
        if let Some(status) = error.status() {
            return Self::HttpStatus {
                status: status.as_u16(),
            };
        }

        if error.is_timeout() || error.is_connect() || error.is_request() || error.is_body() {
            return Self::Transport {
                message: error_chain(&error),
            };
        }

        Self::Unexpected {
            message: error_chain(&error),
        }
    }
}

/// Options applied to a single request on top of the client defaults
#[derive(Debug, Clone, Default)]
pub struct FetchOptions {
    /// Overrides the client's whole-request timeout
    pub timeout: Option<Duration>,
}

/// Builds the HTTP client shared by every fetch in a batch
///
/// # Arguments
///
/// * `config` - The HTTP configuration
///
/// # Returns
///
/// * `Ok(Client)` - Successfully built HTTP client
/// * `Err(reqwest::Error)` - Failed to build client
///
/// # Example
///
/// ```no_run
/// use sumi_harvest::config::HttpConfig;
/// use sumi_harvest::crawler::build_http_client;
///
/// let client = build_http_client(&HttpConfig::default()).unwrap();
/// ```
pub fn build_http_client(config: &HttpConfig) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(config.user_agent.as_str())
        .timeout(Duration::from_secs(config.timeout_secs))
        .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Fetches one page and returns its body as text
///
/// # Request Flow
///
/// 1. Send a GET request (logs `Sent`)
/// 2. Log the status (`Received [200]`)
/// 3. Non-2xx status → [`FetchError::HttpStatus`]
/// 4. Read and decode the body
///
/// # Error Classification
///
/// | Condition | Result |
/// |-----------|--------|
/// | Status outside 200-299 | `HttpStatus` |
/// | Timeout, refused/reset connection, DNS failure | `Transport` |
/// | Body read interrupted by the network | `Transport` |
/// | Body cannot be decoded, request cannot be built | `Unexpected` |
pub async fn fetch_page(
    client: &Client,
    url: &Url,
    options: &FetchOptions,
) -> Result<String, FetchError> {
    let mut request = client.get(url.clone());
    if let Some(timeout) = options.timeout {
        request = request.timeout(timeout);
    }

    tracing::info!("{} Sent", url);
    let response = request.send().await.map_err(FetchError::from_reqwest)?;

    let status = response.status();
    tracing::info!("{} Received [{}]", url, status.as_u16());

    if !status.is_success() {
        return Err(FetchError::HttpStatus {
            status: status.as_u16(),
        });
    }

    tracing::debug!("{} Getting content", url);
    let body = response.text().await.map_err(FetchError::from_reqwest)?;
    tracing::debug!("{} Received content ({} bytes)", url, body.len());

    Ok(body)
}

/// Formats an error together with its sources
///
/// reqwest's top-level message is often just "error sending request"; the
/// cause chain carries the useful part.
fn error_chain(error: &dyn std::error::Error) -> String {
    let mut message = error.to_string();
    let mut source = error.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}
