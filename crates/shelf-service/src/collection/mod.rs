//! Collection management and tree operations.

pub mod aggregate;
pub mod service;
pub mod tree;

pub use aggregate::ReadAggregator;
pub use service::{CollectionService, CreateCollectionRequest};
pub use tree::{DeleteSummary, IngestSummary, TreeService};
