//! Listing document returned by `<feed>/<page>.json`
//!
//! Every field is optional so a partially populated or unexpected document
//! still deserializes; missing pieces are handled by the extractor.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct Listing {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<ListingData>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct ListingData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub after: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dist: Option<i64>,
    #[serde(default)]
    pub children: Vec<Child>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct Child {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<ChildData>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct ChildData {
    pub title: Option<String>,
    pub domain: Option<String>,
    pub id: Option<String>,
    pub author: Option<String>,
    pub permalink: Option<String>,
    pub post_hint: Option<String>,
    pub url: Option<String>,
    pub subreddit: Option<String>,
}

impl Listing {
    /// Parse a listing body, yielding an empty listing on malformed JSON
    pub fn from_slice(body: &[u8]) -> Self {
        match serde_json::from_slice(body) {
            Ok(listing) => listing,
            Err(e) => {
                tracing::warn!(error = %e, "Malformed listing document, treating as empty");
                Self::default()
            }
        }
    }

    pub fn children(&self) -> &[Child] {
        self.data
            .as_ref()
            .map(|data| data.children.as_slice())
            .unwrap_or_default()
    }

    pub fn after(&self) -> Option<&str> {
        self.data.as_ref().and_then(|data| data.after.as_deref())
    }
}
