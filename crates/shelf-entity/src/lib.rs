//! # shelf-entity
//!
//! Domain entity models for comic-shelf. `Collection` and `Comic` are flat
//! records linked by foreign keys (`parent_id`, `collection_id`); the tree
//! is never held as a nested object graph except in the read-only views
//! built by [`collection::CollectionNode`]. Database records additionally
//! derive `sqlx::FromRow`.

pub mod collection;
pub mod comic;
pub mod stats;
pub mod structure;

pub use collection::{
    Collection, CollectionNode, CollectionSummary, CreateCollection, ParentFilter,
    UpdateCollection,
};
pub use comic::{Comic, ComicFilter, NewComic, ReadState, ReadTally, UpdateComic};
pub use stats::{ReadingStats, ReadingWindows};
pub use structure::{ScannedComic, StructureNode};
