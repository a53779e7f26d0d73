//! In-memory per-feed dedup registry

use std::collections::{HashMap, HashSet};
use tokio::sync::Mutex;
use tracing::trace;

/// Item identities seen so far in this run, keyed by feed
///
/// Check-and-record happens under one lock, so two feed tasks can never
/// both accept the same `(feed, identity)` pair.
#[derive(Debug, Default)]
pub struct DedupRegistry {
    seen: Mutex<HashMap<String, HashSet<String>>>,
}

impl DedupRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make sure a feed has an entry set
    pub async fn register_feed(&self, feed: &str) {
        let mut seen = self.seen.lock().await;
        seen.entry(feed.to_string()).or_default();
    }

    /// Record `identity` for `feed`; `false` if it was already recorded
    pub async fn accept(&self, feed: &str, identity: &str) -> bool {
        let mut seen = self.seen.lock().await;
        let accepted = seen
            .entry(feed.to_string())
            .or_default()
            .insert(identity.to_string());

        if !accepted {
            trace!(feed, identity, "Duplicate identity rejected");
        }
        accepted
    }

    /// Number of identities accepted for a feed
    pub async fn accepted_count(&self, feed: &str) -> usize {
        let seen = self.seen.lock().await;
        seen.get(feed).map(HashSet::len).unwrap_or(0)
    }

    pub async fn contains_feed(&self, feed: &str) -> bool {
        self.seen.lock().await.contains_key(feed)
    }
}
