//! Convenience result type alias for Docflow.

use crate::error::AppError;

/// A specialized `Result` type for Docflow operations.
pub type AppResult<T> = Result<T, AppError>;
