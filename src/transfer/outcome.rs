use std::path::PathBuf;
use thiserror::Error;

use crate::item::Item;

/// Why a single transfer failed
#[derive(Debug, Error)]
pub enum TransferError {
    #[error("storage unavailable at {path}: {reason}")]
    StorageUnavailable { path: PathBuf, reason: String },

    #[error("transfer unreachable: {0}")]
    TransferUnreachable(String),

    #[error("stream interrupted: {0}")]
    StreamInterrupted(String),
}

/// Terminal result of one transfer; exactly one per accepted item
#[derive(Debug)]
pub enum TransferOutcome {
    Succeeded { item: Item, path: PathBuf, bytes: u64 },
    Skipped { item: Item, path: PathBuf },
    Failed { item: Item, error: TransferError },
}

impl TransferOutcome {
    pub fn item(&self) -> &Item {
        match self {
            TransferOutcome::Succeeded { item, .. }
            | TransferOutcome::Skipped { item, .. }
            | TransferOutcome::Failed { item, .. } => item,
        }
    }
}

/// Status stream event consumed by the reporter
#[derive(Debug)]
pub enum TransferStatus {
    /// Informational; always precedes the item's terminal outcome
    Started(Item),
    Finished(TransferOutcome),
}
