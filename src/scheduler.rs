//! Acquisition scheduler
//!
//! Runs one metadata task per feed, concurrently. Each task fetches a
//! listing page, extracts candidates, gates them through the shared
//! [`DedupRegistry`] and forwards accepted items on the item channel. The
//! channel is closed only after every feed task has been joined.

use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinSet;
use tracing::{debug, error, info, warn};

use crate::extract::Extractor;
use crate::feed::{FeedCursor, FeedError, ListingSource, PageType};
use crate::item::Item;
use crate::registry::DedupRegistry;
use crate::transfer::OutputLayout;

/// Result of one feed task
#[derive(Debug)]
pub struct FeedReport {
    pub feed: String,
    /// Candidates produced by the extractor
    pub extracted: usize,
    /// Items forwarded to the transfer pool
    pub accepted: usize,
    pub error: Option<FeedError>,
}

impl FeedReport {
    fn failed(feed: &str, error: FeedError) -> Self {
        Self {
            feed: feed.to_string(),
            extracted: 0,
            accepted: 0,
            error: Some(error),
        }
    }

    pub fn is_failure(&self) -> bool {
        self.error.is_some()
    }
}

struct FeedTask {
    source: Arc<dyn ListingSource>,
    extractor: Extractor,
    registry: Arc<DedupRegistry>,
    layout: OutputLayout,
    page_type: PageType,
}

pub struct Scheduler {
    inner: Arc<FeedTask>,
}

impl Scheduler {
    pub fn new(
        source: Arc<dyn ListingSource>,
        extractor: Extractor,
        registry: Arc<DedupRegistry>,
        layout: OutputLayout,
        page_type: PageType,
    ) -> Self {
        Self {
            inner: Arc::new(FeedTask {
                source,
                extractor,
                registry,
                layout,
                page_type,
            }),
        }
    }

    /// Process every feed, then close the item channel
    ///
    /// `items` is held until all feed tasks are joined and dropped on
    /// return, so the transfer pool only ever sees closure after the last
    /// send of the last feed.
    pub async fn run(self, feeds: Vec<String>, items: mpsc::Sender<Item>) -> Vec<FeedReport> {
        info!(feeds = feeds.len(), page_type = %self.inner.page_type, "Scheduling feeds");

        let mut tasks = JoinSet::new();
        for feed in feeds {
            let task = Arc::clone(&self.inner);
            let items = items.clone();
            tasks.spawn(async move { task.process(feed, items).await });
        }

        let mut reports = Vec::new();
        while let Some(result) = tasks.join_next().await {
            match result {
                Ok(report) => reports.push(report),
                Err(e) => error!(error = %e, "Feed task aborted"),
            }
        }

        drop(items);
        debug!(reports = reports.len(), "All feed tasks joined, item channel closed");
        reports
    }
}

impl FeedTask {
    async fn process(&self, feed: String, items: mpsc::Sender<Item>) -> FeedReport {
        self.registry.register_feed(&feed).await;

        let mut cursor = FeedCursor::start(self.page_type);
        let listing = match self.source.fetch(&feed, &cursor).await {
            Ok(listing) => listing,
            Err(e) => {
                warn!(feed, error = %e, "Skipping feed");
                return FeedReport::failed(&feed, e);
            }
        };

        if cursor.advance(&listing) {
            debug!(feed, after = ?cursor.after, "Listing has further pages");
        }

        let candidates = self.extractor.extract(&listing);
        let extracted = candidates.len();

        let dir = self.layout.feed_dir(&feed);
        if let Err(e) = tokio::fs::create_dir_all(&dir).await {
            error!(feed, path = %dir.display(), error = %e, "Failed to create output directory");
        }

        let mut accepted = 0;
        for mut item in candidates {
            if item.identity.trim().is_empty() {
                debug!(feed, url = %item.source_url, "Dropping item without identity");
                continue;
            }

            if !self.registry.accept(&feed, &item.identity).await {
                continue;
            }

            // Aggregate feed items belong to the aggregate's partition
            item.feed.clone_from(&feed);

            if items.send(item).await.is_err() {
                warn!(feed, "Item channel closed, stopping feed");
                break;
            }
            accepted += 1;
        }

        info!(feed, extracted, accepted, "Feed processed");

        FeedReport {
            feed,
            extracted,
            accepted,
            error: None,
        }
    }
}
