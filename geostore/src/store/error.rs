//! Store error types.

use thiserror::Error;

use crate::coord::CoordError;

/// Errors returned by container, registry and document operations.
///
/// Not-found and duplicate conditions are expected outcomes and are reported
/// through this type rather than by panicking.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum StoreError {
    /// Input failed validation (blank identifier, out-of-range coordinate)
    #[error("Validation failed: {0}")]
    Validation(String),

    /// The addressed entity or container does not exist
    #[error("{what} '{key}' not found")]
    NotFound { what: &'static str, key: String },

    /// An entity with the same id already exists in the container
    #[error("Entity '{id}' already exists in container '{container}'")]
    Duplicate { container: String, id: String },

    /// A document could not be parsed or does not have the expected shape
    #[error("Serialization failed: {0}")]
    Serialization(String),

    /// Reading or writing a document file failed
    #[error("I/O error at '{path}': {message}")]
    Io { path: String, message: String },
}

impl StoreError {
    pub(crate) fn entity_not_found(id: &str) -> Self {
        Self::NotFound {
            what: "Entity",
            key: id.to_string(),
        }
    }

    pub(crate) fn container_not_found(name: &str) -> Self {
        Self::NotFound {
            what: "Container",
            key: name.to_string(),
        }
    }

    /// Returns true for [`StoreError::NotFound`].
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Returns true for [`StoreError::Duplicate`].
    pub fn is_duplicate(&self) -> bool {
        matches!(self, Self::Duplicate { .. })
    }
}

impl From<CoordError> for StoreError {
    fn from(e: CoordError) -> Self {
        Self::Validation(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_not_found() {
        let err = StoreError::entity_not_found("p1");
        assert_eq!(err.to_string(), "Entity 'p1' not found");
        assert!(err.is_not_found());
    }

    #[test]
    fn test_display_duplicate() {
        let err = StoreError::Duplicate {
            container: "east".to_string(),
            id: "p1".to_string(),
        };
        assert!(err.to_string().contains("p1"));
        assert!(err.to_string().contains("east"));
        assert!(err.is_duplicate());
    }

    #[test]
    fn test_from_coord_error() {
        let err: StoreError = CoordError::InvalidLatitude(91.0).into();
        assert!(matches!(err, StoreError::Validation(msg) if msg.contains("91")));
    }
}
