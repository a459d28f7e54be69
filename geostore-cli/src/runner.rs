//! CLI runner for common setup and operations.
//!
//! Encapsulates configuration loading, logging initialization and the tokio
//! runtime so command handlers only deal with their own work.

use std::future::Future;
use std::path::Path;
use std::sync::Arc;

use geostore::config::{config_directory, ConfigFile};
use geostore::logging::{init_logging, LoggingGuard, DEFAULT_LOG_DIR, DEFAULT_LOG_FILE};
use geostore::reference::HttpReferenceProvider;
use geostore::service::GeoService;
use geostore::store::ContainerRegistry;
use tokio::runtime::Runtime;
use tokio_util::sync::CancellationToken;
use tracing::info;

use crate::error::CliError;

/// Runner that manages CLI lifecycle and common operations.
pub struct CliRunner {
    /// Keeps logging active while the runner exists
    _logging_guard: LoggingGuard,
    config: ConfigFile,
    runtime: Runtime,
    cancel: CancellationToken,
}

impl CliRunner {
    /// Load configuration (defaults if the file is absent), start logging
    /// and build the runtime.
    pub fn new(config_path: Option<&Path>) -> Result<Self, CliError> {
        let config = match config_path {
            Some(path) => ConfigFile::load_from(path)?,
            None => ConfigFile::load()?,
        };

        let log_dir = config_directory().join(DEFAULT_LOG_DIR);
        let logging_guard = init_logging(&log_dir, DEFAULT_LOG_FILE)
            .map_err(|e| CliError::LoggingInit(e.to_string()))?;

        let runtime = Runtime::new().map_err(CliError::Runtime)?;

        Ok(Self {
            _logging_guard: logging_guard,
            config,
            runtime,
            cancel: CancellationToken::new(),
        })
    }

    /// Get the loaded configuration.
    pub fn config(&self) -> &ConfigFile {
        &self.config
    }

    /// Token passed to every library call made by this run.
    pub fn cancel_token(&self) -> &CancellationToken {
        &self.cancel
    }

    /// Log startup information for a command.
    pub fn log_startup(&self) {
        info!(version = geostore::VERSION, "geostore CLI starting");
    }

    /// Run a future to completion on the runner's runtime.
    pub fn block_on<F: Future>(&self, future: F) -> F::Output {
        self.runtime.block_on(future)
    }

    /// Create a service backed by a fresh registry and the configured
    /// reference source.
    pub fn create_service(&self) -> Result<GeoService<HttpReferenceProvider>, CliError> {
        let service = GeoService::from_config(
            Arc::new(ContainerRegistry::new()),
            &self.config.reference_config(),
        )?;
        info!(
            countries = %self.config.reference.countries_url,
            cities = %self.config.reference.cities_url,
            "Reference service created"
        );
        Ok(service)
    }
}
