//! # shelf-core
//!
//! Core crate for comic-shelf. Contains the configuration schema, the
//! shared enums that steer tree operations (`ReadScope`, `IngestMode`),
//! and the unified error system.
//!
//! This crate has **no** internal dependencies on other comic-shelf crates.

pub mod config;
pub mod error;
pub mod result;
pub mod types;

pub use error::{AppError, ErrorKind};
pub use result::AppResult;
