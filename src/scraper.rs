//! Acquisition pipeline wiring
//!
//! ```text
//! Scheduler ──items──▶ TransferPool ──status──▶ StatusReporter
//! (task per feed)      (semaphore-bounded)      (single consumer)
//! ```
//!
//! Shutdown is channel closure: the scheduler drops the item sender after
//! joining its feed tasks, the pool drops the status sender after its last
//! transfer, and the reporter returns once the status channel is empty.

use std::sync::Arc;
use thiserror::Error;
use tokio::sync::mpsc;
use tokio::task::JoinError;
use tracing::{debug, info, warn};

use crate::config::ScrapeOptions;
use crate::extract::Extractor;
use crate::feed::{FeedClient, ListingSource};
use crate::http::{HttpClient, HttpError};
use crate::observability::MetricsSnapshot;
use crate::registry::DedupRegistry;
use crate::report::{RunSummary, StatusReporter};
use crate::scheduler::{FeedReport, Scheduler};
use crate::transfer::{Transfer, TransferPool};

const ITEM_CHANNEL_CAPACITY: usize = 16;
const STATUS_CHANNEL_CAPACITY: usize = 64;

#[derive(Debug, Error)]
pub enum ScrapeError {
    #[error("HTTP client setup failed: {0}")]
    Http(#[from] HttpError),

    #[error("pipeline stage panicked: {0}")]
    Stage(#[from] JoinError),
}

/// Everything a finished run produced
#[derive(Debug)]
pub struct RunReport {
    pub summary: RunSummary,
    pub feeds: Vec<FeedReport>,
    pub transfers: MetricsSnapshot,
}

pub struct Scraper {
    options: ScrapeOptions,
    http: HttpClient,
    source: Arc<dyn ListingSource>,
}

impl Scraper {
    /// Build a scraper that fetches listings over HTTP
    pub fn new(options: ScrapeOptions) -> Result<Self, ScrapeError> {
        let http = HttpClient::new(&options.http)?;
        let source: Arc<dyn ListingSource> = Arc::new(FeedClient::new(
            http.clone(),
            options.base_url.clone(),
            options.limit,
        ));
        Ok(Self {
            options,
            http,
            source,
        })
    }

    /// Build a scraper with a custom listing source
    pub fn with_source(
        options: ScrapeOptions,
        source: Arc<dyn ListingSource>,
    ) -> Result<Self, ScrapeError> {
        let http = HttpClient::new(&options.http)?;
        Ok(Self {
            options,
            http,
            source,
        })
    }

    /// Run the pipeline to completion
    pub async fn run(&self) -> Result<RunReport, ScrapeError> {
        let options = &self.options;
        let layout = options.layout();

        let (item_tx, item_rx) = mpsc::channel(ITEM_CHANNEL_CAPACITY);
        let (status_tx, status_rx) = mpsc::channel(STATUS_CHANNEL_CAPACITY);

        let scheduler = Scheduler::new(
            Arc::clone(&self.source),
            Extractor::new(options.base_url.as_str()),
            Arc::new(DedupRegistry::new()),
            layout.clone(),
            options.page_type,
        );
        let pool = TransferPool::new(
            Transfer::new(self.http.clone(), layout),
            options.max_concurrent_downloads,
        );
        let metrics = pool.metrics();

        info!(
            feeds = ?options.feeds,
            limit = options.limit,
            page_type = %options.page_type,
            output = %options.output_dir.display(),
            "Starting scrape"
        );

        let scheduling = tokio::spawn(scheduler.run(options.feeds.clone(), item_tx));
        let transferring = tokio::spawn(pool.run(item_rx, status_tx));

        let mut summary = StatusReporter::new(options.display_loading)
            .run(status_rx)
            .await;

        let feeds = scheduling.await?;
        let dispatched = transferring.await?;

        if dispatched != summary.processed() {
            warn!(
                dispatched,
                reported = summary.processed(),
                "Some transfers did not report an outcome"
            );
        }

        summary.failed_feeds = feeds
            .iter()
            .filter(|report| report.is_failure())
            .map(|report| report.feed.clone())
            .collect();

        debug!(bytes = summary.bytes, "{}", summary);

        Ok(RunReport {
            summary,
            feeds,
            transfers: metrics.snapshot(),
        })
    }
}
