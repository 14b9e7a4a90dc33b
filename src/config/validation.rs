use crate::config::types::{Config, HttpConfig, InputConfig, OutputConfig};
use crate::ConfigError;

/// Largest accepted value for `max-concurrent-requests`
const MAX_CONCURRENT_REQUESTS: usize = 1000;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_input_config(&config.input)?;
    validate_output_config(&config.output)?;
    validate_http_config(&config.http)?;
    Ok(())
}

fn validate_input_config(config: &InputConfig) -> Result<(), ConfigError> {
    if config.urls_path.trim().is_empty() {
        return Err(ConfigError::Validation(
            "urls_path cannot be empty".to_string(),
        ));
    }
    Ok(())
}

fn validate_output_config(config: &OutputConfig) -> Result<(), ConfigError> {
    if config.results_path.trim().is_empty() {
        return Err(ConfigError::Validation(
            "results_path cannot be empty".to_string(),
        ));
    }
    Ok(())
}

/// Validates HTTP client configuration
fn validate_http_config(config: &HttpConfig) -> Result<(), ConfigError> {
    if config.timeout_secs < 1 {
        return Err(ConfigError::Validation(format!(
            "timeout_secs must be >= 1, got {}",
            config.timeout_secs
        )));
    }

    if config.connect_timeout_secs < 1 {
        return Err(ConfigError::Validation(format!(
            "connect_timeout_secs must be >= 1, got {}",
            config.connect_timeout_secs
        )));
    }

    if config.connect_timeout_secs > config.timeout_secs {
        return Err(ConfigError::Validation(format!(
            "connect_timeout_secs ({}) cannot exceed timeout_secs ({})",
            config.connect_timeout_secs, config.timeout_secs
        )));
    }

    if config.max_concurrent_requests < 1 || config.max_concurrent_requests > MAX_CONCURRENT_REQUESTS
    {
        return Err(ConfigError::Validation(format!(
            "max_concurrent_requests must be between 1 and {}, got {}",
            MAX_CONCURRENT_REQUESTS, config.max_concurrent_requests
        )));
    }

    if config.user_agent.is_empty() {
        return Err(ConfigError::Validation(
            "user_agent cannot be empty".to_string(),
        ));
    }

    // Header values must be visible ASCII or spaces
    if !config
        .user_agent
        .chars()
        .all(|c| c.is_ascii_graphic() || c == ' ')
    {
        return Err(ConfigError::Validation(format!(
            "user_agent must contain only printable ASCII characters, got '{}'",
            config.user_agent
        )));
    }

    Ok(())
}
