//! Configuration types for geostore components.
//!
//! [`ReferenceConfig`] groups the parameters of the reference dataset layer
//! (sources, cache lifetime, HTTP timeout, locale). [`ConfigFile`] is the
//! user-editable `~/.geostore/config.ini` it is usually built from.
//!
//! # Example
//!
//! ```
//! use std::time::Duration;
//! use geostore::config::ReferenceConfig;
//!
//! let config = ReferenceConfig::default()
//!     .with_cache_ttl(Duration::from_secs(3600))
//!     .with_locale("de");
//!
//! assert_eq!(config.locale(), "de");
//! assert_eq!(config.timeout(), Duration::from_secs(30));
//! ```

mod defaults;
mod file;
mod parser;
mod reference;
mod settings;
mod writer;

pub use defaults::*;
pub use file::{config_directory, config_file_path, ConfigFileError};
pub use reference::ReferenceConfig;
pub use settings::{ConfigFile, ReferenceSettings, StorageSettings};
