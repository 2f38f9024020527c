//! Read-status aggregation over a user's collection forest.

use std::collections::HashMap;

use uuid::Uuid;

use shelf_core::types::ReadScope;
use shelf_entity::{Collection, CollectionSummary, ReadTally};

/// Derives "fully read" flags and counts from one flat fetch of a user's
/// collections and their per-collection comic tallies.
#[derive(Debug, Clone, Default)]
pub struct ReadAggregator {
    tallies: HashMap<Uuid, ReadTally>,
    children: HashMap<Uuid, Vec<Uuid>>,
}

impl ReadAggregator {
    /// Build from the user's collections and their direct tallies.
    pub fn new(collections: &[Collection], tallies: HashMap<Uuid, ReadTally>) -> Self {
        let mut children: HashMap<Uuid, Vec<Uuid>> = HashMap::new();
        for collection in collections {
            if let Some(parent_id) = collection.parent_id {
                children.entry(parent_id).or_default().push(collection.id);
            }
        }
        Self { tallies, children }
    }

    /// Tally of comics owned directly by `id`.
    pub fn direct_tally(&self, id: Uuid) -> ReadTally {
        self.tallies.get(&id).copied().unwrap_or_default()
    }

    /// Tally of comics anywhere in the subtree rooted at `id`.
    pub fn subtree_tally(&self, id: Uuid) -> ReadTally {
        let mut tally = ReadTally::default();
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            tally += self.direct_tally(current);
            if let Some(kids) = self.children.get(&current) {
                stack.extend(kids.iter().copied());
            }
        }
        tally
    }

    /// Tally under `scope`.
    pub fn tally(&self, id: Uuid, scope: ReadScope) -> ReadTally {
        match scope {
            ReadScope::Direct => self.direct_tally(id),
            ReadScope::Recursive => self.subtree_tally(id),
        }
    }

    /// Whether `id` is fully read under `scope`.
    pub fn fully_read(&self, id: Uuid, scope: ReadScope) -> bool {
        self.tally(id, scope).is_fully_read()
    }

    /// Number of direct child collections of `id`.
    pub fn child_count(&self, id: Uuid) -> u64 {
        self.children.get(&id).map_or(0, |kids| kids.len() as u64)
    }

    /// Direct comic counts keyed by collection id.
    pub fn comic_counts(&self) -> HashMap<Uuid, u64> {
        self.tallies
            .iter()
            .map(|(id, tally)| (*id, tally.total))
            .collect()
    }

    /// Annotate `collection` for display.
    pub fn summarize(&self, collection: Collection, scope: ReadScope) -> CollectionSummary {
        let id = collection.id;
        CollectionSummary {
            fully_read: self.fully_read(id, scope),
            comic_count: self.direct_tally(id).total,
            child_count: self.child_count(id),
            collection,
        }
    }
}
