//! Read-side collection views.

pub mod service;

pub use service::{CollectionDetail, ListingService};
