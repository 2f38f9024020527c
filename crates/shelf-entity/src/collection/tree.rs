//! Collection views for listing and hierarchical display.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::model::Collection;

/// A collection annotated with its derived read status.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CollectionSummary {
    /// The collection record.
    #[serde(flatten)]
    pub collection: Collection,
    /// Derived "fully read" flag under the requested scope.
    pub fully_read: bool,
    /// Number of comics owned directly by the collection.
    pub comic_count: u64,
    /// Number of direct child collections.
    pub child_count: u64,
}

/// A node in a collection tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CollectionNode {
    /// Collection ID.
    pub id: Uuid,
    /// Collection name.
    pub name: String,
    /// Depth level (0 for the top of the built tree).
    pub depth: u32,
    /// Number of comics owned directly by this collection.
    pub comic_count: u64,
    /// Child collection nodes.
    pub children: Vec<CollectionNode>,
}

impl CollectionNode {
    /// Builds trees from a flat list of one user's collections.
    ///
    /// With `root = None` every root collection starts a tree; otherwise the
    /// single tree under `root` is returned (empty if `root` is not in the
    /// list). Siblings are ordered by name.
    pub fn build_forest(
        collections: &[Collection],
        comic_counts: &HashMap<Uuid, u64>,
        root: Option<Uuid>,
    ) -> Vec<CollectionNode> {
        let mut by_parent: HashMap<Option<Uuid>, Vec<&Collection>> = HashMap::new();
        for collection in collections {
            by_parent
                .entry(collection.parent_id)
                .or_default()
                .push(collection);
        }
        for siblings in by_parent.values_mut() {
            siblings.sort_by(|a, b| a.name.cmp(&b.name).then(a.id.cmp(&b.id)));
        }

        let tops: Vec<&Collection> = match root {
            Some(id) => collections.iter().filter(|c| c.id == id).collect(),
            None => by_parent.get(&None).cloned().unwrap_or_default(),
        };

        tops.into_iter()
            .map(|top| Self::build_node(top, 0, &by_parent, comic_counts))
            .collect()
    }

    fn build_node(
        collection: &Collection,
        depth: u32,
        by_parent: &HashMap<Option<Uuid>, Vec<&Collection>>,
        comic_counts: &HashMap<Uuid, u64>,
    ) -> CollectionNode {
        let children = by_parent
            .get(&Some(collection.id))
            .map(|kids| {
                kids.iter()
                    .map(|kid| Self::build_node(kid, depth + 1, by_parent, comic_counts))
                    .collect()
            })
            .unwrap_or_default();

        CollectionNode {
            id: collection.id,
            name: collection.name.clone(),
            depth,
            comic_count: comic_counts.get(&collection.id).copied().unwrap_or(0),
            children,
        }
    }

    /// Total number of nodes in this tree, including `self`.
    pub fn node_count(&self) -> usize {
        1 + self.children.iter().map(Self::node_count).sum::<usize>()
    }

    /// Total number of comics in this tree.
    pub fn total_comics(&self) -> u64 {
        self.comic_count + self.children.iter().map(Self::total_comics).sum::<u64>()
    }
}
