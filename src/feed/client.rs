use async_trait::async_trait;
use reqwest::Url;
use tracing::{debug, warn};

use super::{FeedCursor, FeedError, Listing, ListingSource, Result, is_front_page};
use crate::http::{HttpClient, HttpError};

/// Listing fetcher backed by the shared [`HttpClient`]
#[derive(Debug, Clone)]
pub struct FeedClient {
    http: HttpClient,
    base_url: Url,
    limit: u32,
}

impl FeedClient {
    pub fn new(http: HttpClient, base_url: Url, limit: u32) -> Self {
        Self {
            http,
            base_url,
            limit,
        }
    }

    /// Build `<base>/[r/<feed>/]<sort>.json?limit=<n>&after=<cursor>[&t=<window>]`
    pub fn listing_url(&self, feed: &str, cursor: &FeedCursor) -> Result<Url> {
        let feed = feed.trim();
        if feed.is_empty() {
            return Err(FeedError::InvalidFeed);
        }

        let page = format!("{}.json", cursor.page_type.sort.as_str());
        let mut url = self.base_url.clone();

        {
            let mut segments = url.path_segments_mut().map_err(|_| FeedError::InvalidFeed)?;
            segments.pop_if_empty();
            if !is_front_page(feed) {
                segments.push("r").push(feed);
            }
            segments.push(&page);
        }

        {
            let mut query = url.query_pairs_mut();
            query.append_pair("limit", &self.limit.to_string());
            query.append_pair("after", cursor.after.as_deref().unwrap_or_default());
            if let Some(window) = cursor.page_type.window {
                query.append_pair("t", window.as_str());
            }
        }

        Ok(url)
    }
}

#[async_trait]
impl ListingSource for FeedClient {
    async fn fetch(&self, feed: &str, cursor: &FeedCursor) -> Result<Listing> {
        let url = self.listing_url(feed, cursor)?;
        debug!(feed, %url, "Fetching listing");

        let unreachable_err = |reason: String| FeedError::FeedUnreachable {
            feed: feed.to_string(),
            reason,
        };

        let response = self.http.get(url.as_str()).await.map_err(|e| match e {
            HttpError::Status { status, .. } => FeedError::Status {
                feed: feed.to_string(),
                status,
            },
            other => unreachable_err(other.to_string()),
        })?;

        let body = response
            .bytes()
            .await
            .map_err(|e| unreachable_err(format!("failed to read body: {}", e)))?;

        let listing = Listing::from_slice(&body);
        if listing.data.is_none() {
            warn!(feed, "Listing document carried no data");
        }

        Ok(listing)
    }
}
