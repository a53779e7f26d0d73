//! Status reporter: consumes the status stream and aggregates outcomes

use std::fmt;
use tokio::sync::mpsc;
use tracing::warn;

use crate::transfer::{TransferOutcome, TransferStatus};

/// Per-item line at info level when `loud`, debug otherwise
macro_rules! status_line {
    ($loud:expr, $($arg:tt)+) => {
        if $loud {
            tracing::info!($($arg)+)
        } else {
            tracing::debug!($($arg)+)
        }
    };
}

/// Terminal counts for a run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub succeeded: usize,
    pub skipped: usize,
    pub failed: usize,
    pub bytes: u64,
    /// Feeds whose listing could not be fetched
    pub failed_feeds: Vec<String>,
}

impl RunSummary {
    pub fn processed(&self) -> usize {
        self.succeeded + self.skipped + self.failed
    }

    fn record(&mut self, outcome: &TransferOutcome) {
        match outcome {
            TransferOutcome::Succeeded { bytes, .. } => {
                self.succeeded += 1;
                self.bytes += bytes;
            }
            TransferOutcome::Skipped { .. } => self.skipped += 1,
            TransferOutcome::Failed { .. } => self.failed += 1,
        }
    }
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} images processed. Downloaded {}, skipped {} and failed {}.",
            self.processed(),
            self.succeeded,
            self.skipped,
            self.failed
        )?;
        if !self.failed_feeds.is_empty() {
            write!(f, " Unreachable feeds: {}.", self.failed_feeds.join(", "))?;
        }
        Ok(())
    }
}

/// Single consumer of the status channel
#[derive(Debug)]
pub struct StatusReporter {
    /// Per-item lines at info level when set, debug otherwise
    display_loading: bool,
    summary: RunSummary,
    in_flight: usize,
}

impl StatusReporter {
    pub fn new(display_loading: bool) -> Self {
        Self {
            display_loading,
            summary: RunSummary::default(),
            in_flight: 0,
        }
    }

    /// Drain `status` until every sender is gone
    pub async fn run(mut self, mut status: mpsc::Receiver<TransferStatus>) -> RunSummary {
        while let Some(event) = status.recv().await {
            self.observe(event);
        }

        if self.in_flight != 0 {
            warn!(in_flight = self.in_flight, "Status stream closed with transfers unreported");
        }

        self.summary
    }

    fn observe(&mut self, status: TransferStatus) {
        let loud = self.display_loading;

        match status {
            TransferStatus::Started(item) => {
                self.in_flight += 1;
                status_line!(loud, "Downloading image {}...", item);
            }
            TransferStatus::Finished(outcome) => {
                self.in_flight = self.in_flight.saturating_sub(1);
                self.summary.record(&outcome);
                describe(&outcome, loud);
            }
        }
    }
}

fn describe(outcome: &TransferOutcome, loud: bool) {
    let item = outcome.item();
    match outcome {
        TransferOutcome::Succeeded { path, bytes, .. } => {
            status_line!(loud, path = %path.display(), bytes, "Downloaded image {}", item);
        }
        TransferOutcome::Skipped { path, .. } => {
            status_line!(loud, path = %path.display(), "Skipped image {}", item);
        }
        // Always surfaced, with enough context to locate and re-run the item
        TransferOutcome::Failed { error, .. } => {
            warn!(
                identity = %item.identity,
                feed = %item.feed,
                host = %item.host_domain,
                url = %item.source_url,
                post = %item.origin_url,
                error = %error,
                "Failed downloading image {}",
                item
            );
        }
    }
}
