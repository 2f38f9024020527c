//! Comic listing filter.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::model::Comic;

/// Optional constraints on a comic listing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComicFilter {
    /// Only comics with this read flag.
    pub is_read: Option<bool>,
    /// Case-insensitive substring of the comic name.
    pub name: Option<String>,
    /// Only comics of this collection.
    pub collection_id: Option<Uuid>,
}

impl ComicFilter {
    /// Filter on one collection.
    pub fn in_collection(collection_id: Uuid) -> Self {
        Self {
            collection_id: Some(collection_id),
            ..Default::default()
        }
    }

    /// The name filter, trimmed, with empty treated as absent.
    pub fn name_pattern(&self) -> Option<&str> {
        self.name
            .as_deref()
            .map(str::trim)
            .filter(|name| !name.is_empty())
    }

    /// Check whether `comic` passes every supplied constraint.
    pub fn matches(&self, comic: &Comic) -> bool {
        if self.is_read.is_some_and(|is_read| comic.is_read != is_read) {
            return false;
        }
        if self.collection_id.is_some_and(|id| comic.collection_id != id) {
            return false;
        }
        match self.name_pattern() {
            Some(pattern) => comic
                .name
                .to_lowercase()
                .contains(&pattern.to_lowercase()),
            None => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;
    use crate::comic::model::NewComic;

    #[test]
    fn test_filter_matches() {
        let collection = Uuid::new_v4();
        let mut comic =
            NewComic::new("The Dark Knight Returns", "/dkr.cbz").into_comic(collection, Utc::now());
        comic.set_read(true, Utc::now());

        assert!(ComicFilter::default().matches(&comic));
        assert!(ComicFilter::in_collection(collection).matches(&comic));
        assert!(!ComicFilter::in_collection(Uuid::new_v4()).matches(&comic));

        let by_name = ComicFilter {
            name: Some("dark KNIGHT".to_string()),
            ..Default::default()
        };
        assert!(by_name.matches(&comic));

        let unread = ComicFilter {
            is_read: Some(false),
            ..Default::default()
        };
        assert!(!unread.matches(&comic));
    }

    #[test]
    fn test_blank_name_is_ignored() {
        let filter = ComicFilter {
            name: Some("  ".to_string()),
            ..Default::default()
        };
        assert_eq!(filter.name_pattern(), None);
    }
}
