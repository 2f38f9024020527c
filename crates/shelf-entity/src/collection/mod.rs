//! Collection domain entities.

pub mod model;
pub mod tree;

pub use model::{Collection, CreateCollection, ParentFilter, UpdateCollection};
pub use tree::{CollectionNode, CollectionSummary};
