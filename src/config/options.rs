use super::models::{Config, HttpConfig, normalize_limit};
use super::validation::{self, ValidationError};
use crate::feed::{FRONT_PAGE, PageType};
use crate::transfer::OutputLayout;
use reqwest::Url;
use std::path::PathBuf;

/// Validated, normalized options for a single run
///
/// Built once from [`Config`] before any task is spawned and then shared
/// read-only by every stage of the pipeline.
#[derive(Debug, Clone)]
pub struct ScrapeOptions {
    pub output_dir: PathBuf,
    pub limit: u32,
    pub page_type: PageType,
    pub root_only: bool,
    /// Feed identifiers in processing order, `frontpage` last when enabled
    pub feeds: Vec<String>,
    pub max_concurrent_downloads: usize,
    pub display_loading: bool,
    pub base_url: Url,
    pub http: HttpConfig,
}

impl ScrapeOptions {
    pub fn from_config(config: &Config) -> Result<Self, ValidationError> {
        validation::validate(config)?;

        let scrape = &config.scrape;
        let page_type = scrape.page_type.parse::<PageType>()?;
        let base_url =
            Url::parse(&config.http.base_url).map_err(|e| ValidationError::InvalidBaseUrl {
                url: config.http.base_url.clone(),
                reason: e.to_string(),
            })?;

        let mut feeds: Vec<String> = scrape
            .subreddits
            .iter()
            .map(|feed| feed.trim().to_string())
            .collect();
        if scrape.front_page {
            feeds.push(FRONT_PAGE.to_string());
        }

        Ok(Self {
            output_dir: scrape.output_dir.clone(),
            limit: normalize_limit(scrape.limit),
            page_type,
            root_only: scrape.root_only,
            feeds,
            max_concurrent_downloads: scrape.max_concurrent_downloads,
            display_loading: scrape.display_loading,
            base_url,
            http: config.http.clone(),
        })
    }

    pub fn layout(&self) -> OutputLayout {
        OutputLayout {
            root: self.output_dir.clone(),
            root_only: self.root_only,
        }
    }
}
