//! Comic operations.

pub mod service;

pub use service::{ComicService, CreateComicRequest};
