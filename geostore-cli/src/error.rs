//! CLI error handling with user-friendly messages.
//!
//! Centralizes error handling for the CLI, providing consistent formatting
//! and appropriate exit codes.

use std::fmt;
use std::process;

use geostore::config::ConfigFileError;
use geostore::reference::ReferenceError;
use geostore::service::ServiceError;
use geostore::store::StoreError;

/// CLI-specific errors with user-friendly messages.
#[derive(Debug)]
pub enum CliError {
    /// Failed to initialize logging
    LoggingInit(String),
    /// Configuration file could not be read or written
    Config(ConfigFileError),
    /// Failed to start the async runtime
    Runtime(std::io::Error),
    /// Reading, parsing or writing an entity document failed
    Document(StoreError),
    /// Reference data lookup failed
    Lookup(ServiceError),
}

impl CliError {
    /// Exit the process with an appropriate error message and code.
    pub fn exit(&self) -> ! {
        eprintln!("Error: {}", self);

        match self {
            CliError::Lookup(ServiceError::Reference(ReferenceError::Fetch(_))) => {
                eprintln!();
                eprintln!("The reference datasets could not be downloaded. Check that:");
                eprintln!("  1. This machine has network access");
                eprintln!("  2. countries_url and cities_url in config.ini are correct");
                eprintln!("  3. `geostore probe` reports the source as reachable");
            }
            CliError::Config(ConfigFileError::InvalidValue { .. }) => {
                eprintln!();
                eprintln!("Fix the value in config.ini or delete the file to use defaults.");
            }
            _ => {}
        }

        process::exit(1)
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::LoggingInit(msg) => write!(f, "Failed to initialize logging: {}", msg),
            CliError::Config(e) => write!(f, "Configuration error: {}", e),
            CliError::Runtime(e) => write!(f, "Failed to start runtime: {}", e),
            CliError::Document(e) => write!(f, "Document error: {}", e),
            CliError::Lookup(e) => write!(f, "Lookup failed: {}", e),
        }
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CliError::Config(e) => Some(e),
            CliError::Runtime(e) => Some(e),
            CliError::Document(e) => Some(e),
            CliError::Lookup(e) => Some(e),
            CliError::LoggingInit(_) => None,
        }
    }
}

impl From<ConfigFileError> for CliError {
    fn from(e: ConfigFileError) -> Self {
        CliError::Config(e)
    }
}

impl From<StoreError> for CliError {
    fn from(e: StoreError) -> Self {
        CliError::Document(e)
    }
}

impl From<ServiceError> for CliError {
    fn from(e: ServiceError) -> Self {
        match e {
            ServiceError::Store(inner) => CliError::Document(inner),
            other => CliError::Lookup(other),
        }
    }
}

impl From<ReferenceError> for CliError {
    fn from(e: ReferenceError) -> Self {
        CliError::Lookup(ServiceError::from(e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use geostore::reference::FetchError;

    #[test]
    fn test_store_errors_surface_as_document_errors() {
        let err = CliError::from(ServiceError::Store(StoreError::Serialization(
            "bad".to_string(),
        )));
        assert!(matches!(err, CliError::Document(_)));
        assert!(err.to_string().starts_with("Document error"));
    }

    #[test]
    fn test_reference_error_display() {
        let err = CliError::from(ReferenceError::Fetch(FetchError::Http(
            "HTTP 404 Not Found".to_string(),
        )));
        assert_eq!(
            err.to_string(),
            "Lookup failed: Reference data unavailable: HTTP error: HTTP 404 Not Found"
        );
    }
}
