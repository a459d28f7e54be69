//! Service error types.

use thiserror::Error;

use crate::reference::ReferenceError;
use crate::store::StoreError;

/// Errors returned by [`GeoService`](super::GeoService) operations.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ServiceError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Reference(ReferenceError),

    /// No country contains the entity's location
    #[error("No country found at ({latitude}, {longitude})")]
    LocationUnresolved { latitude: f64, longitude: f64 },

    #[error("Operation cancelled")]
    Cancelled,
}

impl From<ReferenceError> for ServiceError {
    fn from(e: ReferenceError) -> Self {
        match e {
            ReferenceError::Cancelled => Self::Cancelled,
            other => Self::Reference(other),
        }
    }
}
