//! Feed client: fetches one listing page for a subreddit
//!
//! ## Key Components
//!
//! - [`ListingSource`] - Seam the scheduler fetches listings through
//! - [`FeedClient`] - HTTP implementation against the listing service
//! - [`FeedCursor`] - Pagination state (`after` token + page type)
//! - [`Listing`] - Absent-safe listing document

mod client;
mod listing;
mod page;

pub use client::FeedClient;
pub use listing::{Child, ChildData, Listing, ListingData};
pub use page::{PageType, PageTypeError, Sort, TimeWindow};

use async_trait::async_trait;
use thiserror::Error;

/// Synthetic feed identifier for the aggregate front page
pub const FRONT_PAGE: &str = "frontpage";

#[derive(Debug, Error)]
pub enum FeedError {
    #[error("feed identifier is required")]
    InvalidFeed,

    #[error("feed '{feed}' unreachable: {reason}")]
    FeedUnreachable { feed: String, reason: String },

    #[error("feed '{feed}' returned HTTP {status}")]
    Status { feed: String, status: u16 },
}

pub type Result<T> = std::result::Result<T, FeedError>;

/// Per-feed pagination state
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FeedCursor {
    pub after: Option<String>,
    pub page_type: PageType,
}

impl FeedCursor {
    /// Empty cursor for the first page
    pub fn start(page_type: PageType) -> Self {
        Self {
            after: None,
            page_type,
        }
    }

    /// Move past the page just fetched
    ///
    /// Returns `false` when the listing has no further pages.
    pub fn advance(&mut self, listing: &Listing) -> bool {
        self.after = listing.after().map(str::to_string);
        self.after.is_some()
    }
}

/// Source of listing pages
#[async_trait]
pub trait ListingSource: Send + Sync {
    async fn fetch(&self, feed: &str, cursor: &FeedCursor) -> Result<Listing>;
}

pub(crate) fn is_front_page(feed: &str) -> bool {
    feed == FRONT_PAGE
}
