//! Shared enums that select tree-operation behaviour.

pub mod ingest_mode;
pub mod read_scope;

pub use ingest_mode::IngestMode;
pub use read_scope::ReadScope;
