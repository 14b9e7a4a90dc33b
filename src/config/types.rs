use serde::Deserialize;

/// Main configuration structure for Sumi-Harvest
///
/// Every section is optional; an empty file yields [`Config::default`].
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub input: InputConfig,
    pub output: OutputConfig,
    pub http: HttpConfig,
    pub extract: ExtractConfig,
}

/// Where seed URLs are read from
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct InputConfig {
    /// Newline-delimited list of seed URLs
    #[serde(rename = "urls-path")]
    pub urls_path: String,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            urls_path: "urls.txt".to_string(),
        }
    }
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Path to the tab-separated results file (truncated on every run)
    #[serde(rename = "results-path")]
    pub results_path: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            results_path: "found_urls.txt".to_string(),
        }
    }
}

/// HTTP client configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    /// Whole-request timeout in seconds
    #[serde(rename = "timeout-secs")]
    pub timeout_secs: u64,

    /// Connection establishment timeout in seconds
    #[serde(rename = "connect-timeout-secs")]
    pub connect_timeout_secs: u64,

    /// User-Agent header sent with every request
    #[serde(rename = "user-agent")]
    pub user_agent: String,

    /// Upper bound on requests in flight at once
    #[serde(rename = "max-concurrent-requests")]
    pub max_concurrent_requests: usize,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 30,
            connect_timeout_secs: 10,
            user_agent: format!("sumi-harvest/{}", env!("CARGO_PKG_VERSION")),
            max_concurrent_requests: 100,
        }
    }
}

/// Link extraction configuration
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ExtractConfig {
    pub mode: ExtractMode,
}

/// How `href` values are pulled out of a page
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExtractMode {
    /// Match `href="..."` / `href='...'` anywhere in the text
    #[default]
    Pattern,

    /// Parse the document and read every `href` attribute
    Markup,
}
