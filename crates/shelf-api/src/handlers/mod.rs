//! Route handlers organized by domain.

pub mod collection;
pub mod comic;
pub mod health;
