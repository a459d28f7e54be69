//! INI serialization logic for converting `ConfigFile` → INI string.

use std::path::Path;

use super::settings::ConfigFile;

/// Convert a `ConfigFile` to a commented INI string for saving.
pub(super) fn to_config_string(config: &ConfigFile) -> String {
    let r = &config.reference;

    format!(
        r#"[reference]
; GeoJSON FeatureCollection with country polygons
countries_url = {}
; GeoJSON FeatureCollection with populated places (points)
cities_url = {}
; Hours a downloaded dataset is reused before it is fetched again (default: 24)
cache_ttl_hours = {}
; HTTP timeout for a dataset download, in seconds (default: 30)
timeout_secs = {}
; Language used for localized country names, e.g. en, de, fr (default: en)
locale = {}
; Search radius in km when attaching the nearest city to an entity (default: 50)
city_radius_km = {}

[storage]
; Directory where container documents are saved
data_dir = {}
"#,
        r.countries_url,
        r.cities_url,
        r.cache_ttl_hours,
        r.timeout_secs,
        r.locale,
        r.city_radius_km,
        path_to_string(&config.storage.data_dir),
    )
}

/// Render a path, abbreviating the home directory as `~`.
fn path_to_string(path: &Path) -> String {
    if let Some(home) = dirs::home_dir() {
        if let Ok(stripped) = path.strip_prefix(&home) {
            return format!("~/{}", stripped.display());
        }
    }
    path.display().to_string()
}
