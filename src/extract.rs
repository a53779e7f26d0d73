//! Candidate extraction: listing entries -> direct-image [`Item`]s

use tracing::trace;

use crate::feed::{ChildData, Listing};
use crate::item::{Author, Item, final_segment, identity_of};

/// Domain fragment of the image host whose posts are always candidates
const IMAGE_HOST: &str = "imgur";
/// Post hint fragment marking image posts
const IMAGE_HINT: &str = "image";

/// Turns listing documents into items
///
/// `service` is the root of the listing service used to build absolute
/// post and author profile links.
#[derive(Debug, Clone)]
pub struct Extractor {
    service: String,
}

impl Extractor {
    pub fn new(service: impl Into<String>) -> Self {
        let service = service.into();
        Self {
            service: service.trim_end_matches('/').to_string(),
        }
    }

    /// Extract every direct-image entry of a listing
    ///
    /// Entries missing any required field are dropped individually. Items
    /// can come back with an empty identity; callers must not forward them.
    pub fn extract(&self, listing: &Listing) -> Vec<Item> {
        listing
            .children()
            .iter()
            .filter_map(|child| child.data.as_ref())
            .filter(|data| is_candidate(data))
            .filter_map(|data| {
                let item = self.to_item(data);
                if item.is_none() {
                    trace!(id = ?data.id, "Skipping incomplete listing entry");
                }
                item
            })
            .collect()
    }

    fn to_item(&self, data: &ChildData) -> Option<Item> {
        let url = data.url.as_deref()?;
        let author = data.author.as_deref()?;
        let permalink = data.permalink.as_deref()?;
        data.post_hint.as_ref()?;

        Some(Item {
            identity: identity_of(url).to_string(),
            feed: data.subreddit.clone()?,
            source_url: url.to_string(),
            origin_url: format!("{}{}", self.service, permalink),
            post_id: data.id.clone().unwrap_or_default(),
            title: data.title.clone()?,
            author: Author {
                name: author.to_string(),
                profile_url: format!("{}/user/{}/", self.service, author),
            },
            host_domain: data.domain.clone()?,
        })
    }
}

/// Image host or image hint, and a final URL segment with an extension
fn is_candidate(data: &ChildData) -> bool {
    let hosted = data
        .domain
        .as_deref()
        .is_some_and(|domain| domain.contains(IMAGE_HOST));
    let hinted = data
        .post_hint
        .as_deref()
        .is_some_and(|hint| hint.contains(IMAGE_HINT));

    if !(hosted || hinted) {
        return false;
    }

    // Galleries and album pages have no extension in their last segment
    data.url
        .as_deref()
        .is_some_and(|url| final_segment(url).contains('.'))
}
