//! Externally supplied collection structures for bulk ingestion.

pub mod builder;
pub mod node;

pub use builder::ScannedComic;
pub use node::StructureNode;
