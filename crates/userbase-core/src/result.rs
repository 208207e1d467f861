//! Convenience result type alias for userbase.

use crate::error::AppError;

/// A specialized `Result` type for userbase operations.
pub type AppResult<T> = Result<T, AppError>;
