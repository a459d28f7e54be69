//! Settings structs for each configuration file section.

use std::path::{Path, PathBuf};
use std::time::Duration;

use super::defaults::*;
use super::file::config_directory;
use super::reference::ReferenceConfig;

/// Complete application configuration loaded from config.ini.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConfigFile {
    pub reference: ReferenceSettings,
    pub storage: StorageSettings,
}

/// `[reference]` section.
#[derive(Debug, Clone, PartialEq)]
pub struct ReferenceSettings {
    pub countries_url: String,
    pub cities_url: String,
    pub cache_ttl_hours: u64,
    pub timeout_secs: u64,
    pub locale: String,
    pub city_radius_km: f64,
}

/// `[storage]` section.
#[derive(Debug, Clone, PartialEq)]
pub struct StorageSettings {
    /// Where container documents are saved by default
    pub data_dir: PathBuf,
}

impl StorageSettings {
    /// Resolve a document path: relative paths are taken from `data_dir`,
    /// absolute paths are returned unchanged.
    pub fn document_path(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.data_dir.join(path)
        }
    }

    /// Default document location for a container: `<data_dir>/<name>.json`.
    pub fn container_document(&self, container: &str) -> PathBuf {
        self.data_dir.join(format!("{container}.json"))
    }
}

impl ConfigFile {
    /// Build the runtime reference configuration from the file settings.
    pub fn reference_config(&self) -> ReferenceConfig {
        let r = &self.reference;
        ReferenceConfig::new()
            .with_countries_url(r.countries_url.clone())
            .with_cities_url(r.cities_url.clone())
            .with_cache_ttl(Duration::from_secs(r.cache_ttl_hours.saturating_mul(3600)))
            .with_timeout(Duration::from_secs(r.timeout_secs))
            .with_locale(r.locale.clone())
            .with_city_radius_km(r.city_radius_km)
    }
}

impl Default for ReferenceSettings {
    fn default() -> Self {
        Self {
            countries_url: DEFAULT_COUNTRIES_URL.to_string(),
            cities_url: DEFAULT_CITIES_URL.to_string(),
            cache_ttl_hours: DEFAULT_CACHE_TTL_HOURS,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            locale: DEFAULT_LOCALE.to_string(),
            city_radius_km: DEFAULT_CITY_RADIUS_KM,
        }
    }
}

impl Default for StorageSettings {
    fn default() -> Self {
        Self {
            data_dir: config_directory().join(DEFAULT_DATA_DIR_NAME),
        }
    }
}
