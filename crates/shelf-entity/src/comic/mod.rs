//! Comic entity and related types.

pub mod filter;
pub mod model;
pub mod read;

pub use filter::ComicFilter;
pub use model::{Comic, NewComic, UpdateComic};
pub use read::{ReadState, ReadTally};
