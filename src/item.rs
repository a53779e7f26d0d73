//! Candidate items extracted from listings

use std::fmt;

/// A single downloadable post
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Item {
    /// Dedup key: the source filename stem (`abc123` for `.../abc123.jpg`)
    pub identity: String,
    /// Owning feed; overwritten by the scheduler for aggregate feeds
    pub feed: String,
    pub source_url: String,
    pub origin_url: String,
    pub post_id: String,
    pub title: String,
    pub author: Author,
    pub host_domain: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Author {
    pub name: String,
    pub profile_url: String,
}

impl fmt::Display for Item {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} from r/{}", self.identity, self.feed)
    }
}

/// Last `/`-delimited segment of a URL
pub fn final_segment(url: &str) -> &str {
    url.rsplit('/').next().unwrap_or(url)
}

/// Filename stem used as the dedup identity
pub fn identity_of(url: &str) -> &str {
    let segment = final_segment(url);
    segment.split('.').next().unwrap_or(segment)
}
