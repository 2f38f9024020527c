//! Convenience result type alias for comic-shelf.

use crate::error::AppError;

/// A specialized `Result` type for comic-shelf operations.
pub type AppResult<T> = Result<T, AppError>;
