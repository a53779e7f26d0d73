use super::models::Config;
use crate::feed::{PageType, PageTypeError};
use reqwest::Url;
use thiserror::Error;
use tokio::sync::Semaphore;

#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("Invalid page type '{0}', reference README for valid page types")]
    InvalidPageType(String),

    #[error(
        "max_concurrent_downloads must be between 1 and {}",
        Semaphore::MAX_PERMITS
    )]
    InvalidConcurrency,

    #[error("Invalid base URL '{url}': {reason}")]
    InvalidBaseUrl { url: String, reason: String },

    #[error("No feeds configured (pass at least one subreddit or enable the front page)")]
    NoFeedsConfigured,
}

impl From<PageTypeError> for ValidationError {
    fn from(value: PageTypeError) -> Self {
        ValidationError::InvalidPageType(value.0)
    }
}

/// Validate the entire configuration
pub fn validate(config: &Config) -> Result<(), ValidationError> {
    validate_page_type(config)?;
    validate_concurrency(config)?;
    validate_base_url(config)?;
    validate_feeds(config)?;
    Ok(())
}

fn validate_page_type(config: &Config) -> Result<(), ValidationError> {
    config.scrape.page_type.parse::<PageType>()?;
    Ok(())
}

fn validate_concurrency(config: &Config) -> Result<(), ValidationError> {
    let max = config.scrape.max_concurrent_downloads;
    if max == 0 || max > Semaphore::MAX_PERMITS {
        return Err(ValidationError::InvalidConcurrency);
    }
    Ok(())
}

fn validate_base_url(config: &Config) -> Result<(), ValidationError> {
    let url = &config.http.base_url;
    let parsed = Url::parse(url).map_err(|e| ValidationError::InvalidBaseUrl {
        url: url.clone(),
        reason: e.to_string(),
    })?;

    if parsed.cannot_be_a_base() {
        return Err(ValidationError::InvalidBaseUrl {
            url: url.clone(),
            reason: "not a base URL".to_string(),
        });
    }

    Ok(())
}

fn validate_feeds(config: &Config) -> Result<(), ValidationError> {
    if config.scrape.subreddits.is_empty() && !config.scrape.front_page {
        return Err(ValidationError::NoFeedsConfigured);
    }
    Ok(())
}
