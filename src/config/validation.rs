use crate::config::types::{SearchConfig, SourceId};
use crate::fetch::FetcherOptions;
use crate::ConfigError;
use std::collections::HashSet;
use url::Url;

/// Validates the entire configuration
pub fn validate(config: &SearchConfig) -> Result<(), ConfigError> {
    validate_schedule(config)?;
    validate_groups(&config.groups)?;
    validate_fetcher_options(&config.crawler)?;
    validate_database_path(&config.database_path)?;
    Ok(())
}

/// Validates interval and page count
fn validate_schedule(config: &SearchConfig) -> Result<(), ConfigError> {
    // pages = 0 is legal: the fetcher simply requests nothing for each source
    if config.interval < 1 {
        return Err(ConfigError::Validation(format!(
            "interval must be >= 1 minute, got {}",
            config.interval
        )));
    }

    Ok(())
}

/// Validates the configured source list
///
/// Source identifiers must be non-empty and unique within the configuration.
fn validate_groups(groups: &[SourceId]) -> Result<(), ConfigError> {
    let mut seen = HashSet::new();

    for group in groups {
        if group.as_str().trim().is_empty() {
            return Err(ConfigError::Validation(
                "group identifiers cannot be empty".to_string(),
            ));
        }

        if !seen.insert(group.as_str()) {
            return Err(ConfigError::Validation(format!(
                "duplicate group identifier '{}'",
                group
            )));
        }
    }

    Ok(())
}

/// Validates the fetcher options bag
fn validate_fetcher_options(options: &FetcherOptions) -> Result<(), ConfigError> {
    let url = Url::parse(&options.base_url)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid base-url: {}", e)))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(ConfigError::InvalidUrl(format!(
            "base-url must use http or https, got '{}'",
            url.scheme()
        )));
    }

    if options.timeout_secs < 1 {
        return Err(ConfigError::Validation(format!(
            "timeout-secs must be >= 1, got {}",
            options.timeout_secs
        )));
    }

    if options.user_agent.is_empty() {
        return Err(ConfigError::Validation(
            "user-agent cannot be empty".to_string(),
        ));
    }

    if options.listing_selector.trim().is_empty() {
        return Err(ConfigError::Validation(
            "listing-selector cannot be empty".to_string(),
        ));
    }

    Ok(())
}

fn validate_database_path(path: &str) -> Result<(), ConfigError> {
    if path.is_empty() {
        return Err(ConfigError::Validation(
            "database-path cannot be empty".to_string(),
        ));
    }

    Ok(())
}
