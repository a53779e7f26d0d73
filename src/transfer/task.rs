//! Single-item transfer procedure

use std::path::{Path, PathBuf};
use tokio::fs::{self, File};
use tokio::io::AsyncWriteExt;
use tokio::sync::mpsc;
use tracing::{debug, warn};

use super::outcome::{TransferError, TransferOutcome, TransferStatus};
use super::OutputLayout;
use crate::http::HttpClient;
use crate::item::{Item, final_segment};

const GIFV_SUFFIX: &str = ".gifv";
const MP4_SUFFIX: &str = ".mp4";

/// Rewrite `.gifv` links to the `.mp4` the host serves alongside them
pub fn normalize_source_url(url: &str) -> String {
    match url.strip_suffix(GIFV_SUFFIX) {
        Some(stem) => format!("{}{}", stem, MP4_SUFFIX),
        None => url.to_string(),
    }
}

enum Completed {
    Downloaded { path: PathBuf, bytes: u64 },
    Exists { path: PathBuf },
}

/// Everything a transfer needs besides the item itself
#[derive(Debug, Clone)]
pub struct Transfer {
    http: HttpClient,
    layout: OutputLayout,
}

impl Transfer {
    pub fn new(http: HttpClient, layout: OutputLayout) -> Self {
        Self { http, layout }
    }

    /// Run one transfer, emitting `Started` then exactly one terminal status
    pub async fn run(&self, item: Item, status: &mpsc::Sender<TransferStatus>) {
        if status.send(TransferStatus::Started(item.clone())).await.is_err() {
            debug!(identity = %item.identity, "Status channel closed before transfer started");
        }

        let outcome = match self.perform(&item).await {
            Ok(Completed::Downloaded { path, bytes }) => {
                TransferOutcome::Succeeded { item, path, bytes }
            }
            Ok(Completed::Exists { path }) => TransferOutcome::Skipped { item, path },
            Err(error) => TransferOutcome::Failed { item, error },
        };

        if let Err(e) = status.send(TransferStatus::Finished(outcome)).await {
            warn!(status = ?e.0, "Status channel closed, outcome dropped");
        }
    }

    async fn perform(&self, item: &Item) -> Result<Completed, TransferError> {
        let url = normalize_source_url(&item.source_url);
        let path = self.layout.destination(&item.feed, final_segment(&url));

        match fs::try_exists(&path).await {
            Ok(true) => return Ok(Completed::Exists { path }),
            Ok(false) => {}
            Err(e) => return Err(storage_unavailable(&path, e)),
        }

        let mut file = File::create(&path)
            .await
            .map_err(|e| storage_unavailable(&path, e))?;

        match self.stream_to(&url, &mut file).await {
            Ok(bytes) => {
                debug!(identity = %item.identity, path = %path.display(), bytes, "Transfer complete");
                Ok(Completed::Downloaded { path, bytes })
            }
            Err(error) => {
                drop(file);
                discard_partial(&path).await;
                Err(error)
            }
        }
    }

    async fn stream_to(&self, url: &str, file: &mut File) -> Result<u64, TransferError> {
        let mut response = self
            .http
            .get(url)
            .await
            .map_err(|e| TransferError::TransferUnreachable(e.to_string()))?;

        let mut written = 0u64;
        while let Some(chunk) = response
            .chunk()
            .await
            .map_err(|e| TransferError::StreamInterrupted(e.to_string()))?
        {
            file.write_all(&chunk)
                .await
                .map_err(|e| TransferError::StreamInterrupted(e.to_string()))?;
            written += chunk.len() as u64;
        }

        file.flush()
            .await
            .map_err(|e| TransferError::StreamInterrupted(e.to_string()))?;

        Ok(written)
    }
}

fn storage_unavailable(path: &Path, e: std::io::Error) -> TransferError {
    TransferError::StorageUnavailable {
        path: path.to_path_buf(),
        reason: e.to_string(),
    }
}

/// Remove a partially written file so the next run retries it
async fn discard_partial(path: &Path) {
    if let Err(e) = fs::remove_file(path).await {
        warn!(path = %path.display(), error = %e, "Failed to remove partial file");
    }
}
