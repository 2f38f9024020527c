//! # shelf-service
//!
//! Business logic service layer for comic-shelf. Each service works against
//! a [`StoreProvider`](shelf_database::StoreProvider) and takes the caller's
//! [`RequestContext`] on every operation, so ownership is always scoped to
//! the authenticated user.
//!
//! Services follow constructor injection; all dependencies are provided at
//! construction time via `Arc` references.

pub mod collection;
pub mod comic;
pub mod context;
pub mod listing;
pub mod stats;

mod unit;

#[cfg(test)]
pub(crate) mod testing;

pub use collection::{
    CollectionService, CreateCollectionRequest, DeleteSummary, IngestSummary, TreeService,
};
pub use comic::{ComicService, CreateComicRequest};
pub use context::RequestContext;
pub use listing::{CollectionDetail, ListingService};
pub use stats::StatsService;
