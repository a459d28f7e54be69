//! Reference data error types.

use thiserror::Error;

use crate::coord::CoordError;

/// Failure to obtain a reference dataset.
///
/// Cloneable so a single failed fetch can be handed to every caller that was
/// waiting on it.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FetchError {
    /// The request failed or returned a non-success status
    #[error("HTTP error: {0}")]
    Http(String),

    /// The payload was not a usable dataset
    #[error("Invalid dataset: {0}")]
    InvalidData(String),
}

/// Errors returned by the resolvers and the dataset cache.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ReferenceError {
    #[error("Reference data unavailable: {0}")]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    InvalidCoordinate(#[from] CoordError),

    /// Search radius that is negative or not a finite number
    #[error("Invalid search radius: {0} km")]
    InvalidRadius(f64),

    #[error("Operation cancelled")]
    Cancelled,
}
