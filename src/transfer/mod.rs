//! Transfer pool
//!
//! Drains the item channel and runs each transfer on its own task, bounded
//! by a counting semaphore. Every transfer reports `Started` followed by a
//! single terminal [`TransferOutcome`] on the status channel.

mod outcome;
mod task;

pub use outcome::{TransferError, TransferOutcome, TransferStatus};
pub use task::{Transfer, normalize_source_url};

use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::{Semaphore, mpsc};
use tokio::task::{JoinError, JoinSet};
use tracing::{debug, error, info};

use crate::item::Item;
use crate::observability::TransferMetrics;

/// Where files for a feed are written
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputLayout {
    pub root: PathBuf,
    /// Skip the per-feed subdirectory
    pub root_only: bool,
}

impl OutputLayout {
    pub fn feed_dir(&self, feed: &str) -> PathBuf {
        if self.root_only {
            self.root.clone()
        } else {
            self.root.join(feed)
        }
    }

    pub fn destination(&self, feed: &str, filename: &str) -> PathBuf {
        self.feed_dir(feed).join(filename)
    }
}

pub struct TransferPool {
    transfer: Transfer,
    slots: Arc<Semaphore>,
    max_concurrent: usize,
    metrics: Arc<TransferMetrics>,
}

impl TransferPool {
    pub fn new(transfer: Transfer, max_concurrent: usize) -> Self {
        Self {
            transfer,
            slots: Arc::new(Semaphore::new(max_concurrent)),
            max_concurrent,
            metrics: Arc::new(TransferMetrics::new()),
        }
    }

    pub fn metrics(&self) -> Arc<TransferMetrics> {
        Arc::clone(&self.metrics)
    }

    /// Drain `items` until it closes, then wait for in-flight transfers
    ///
    /// Returns the number of transfers dispatched. The pool's status sender
    /// is dropped on return, so the status channel closes once the last
    /// transfer reports.
    pub async fn run(
        self,
        mut items: mpsc::Receiver<Item>,
        status: mpsc::Sender<TransferStatus>,
    ) -> usize {
        info!(max_concurrent = self.max_concurrent, "Transfer pool started");

        let mut tasks = JoinSet::new();
        let mut dispatched = 0usize;

        while let Some(item) = items.recv().await {
            let permit = match Arc::clone(&self.slots).acquire_owned().await {
                Ok(permit) => permit,
                Err(_) => {
                    error!(identity = %item.identity, "Transfer slots closed, stopping pool");
                    break;
                }
            };
            let slot = self.metrics.slot_acquired();

            let transfer = self.transfer.clone();
            let status = status.clone();
            tasks.spawn(async move {
                // Slot guard drops before the permit, keeping `active` within bounds
                let _permit = permit;
                let _slot = slot;
                transfer.run(item, &status).await;
            });
            dispatched += 1;

            while let Some(result) = tasks.try_join_next() {
                log_join_failure(result);
            }
        }

        debug!(dispatched, "Item channel closed, waiting for in-flight transfers");
        while let Some(result) = tasks.join_next().await {
            log_join_failure(result);
        }

        info!(dispatched, "Transfer pool drained");
        dispatched
    }
}

fn log_join_failure(result: Result<(), JoinError>) {
    if let Err(e) = result {
        error!(error = %e, "Transfer task aborted");
    }
}
