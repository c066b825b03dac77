//! Crate-level errors (wraps domain errors)

use thiserror::Error;

use crate::domain::RangeError;

/// Errors surfaced outside the domain layer, e.g. while loading settings.
#[derive(Error, Debug)]
pub enum Error {
    #[error("{0}")]
    Range(#[from] RangeError),

    #[error("config error: {message}")]
    Config { message: String },
}

/// Result type for crate-level operations.
pub type Result<T> = std::result::Result<T, Error>;
