//! INI parsing logic for converting `Ini` → `ConfigFile`.
//!
//! This is the single place where INI key names are mapped to struct fields.

use std::path::PathBuf;

use ini::Ini;

use super::file::ConfigFileError;
use super::settings::ConfigFile;

/// Parse an `Ini` object into a `ConfigFile`.
///
/// Starts from `ConfigFile::default()` and overlays any values found in the INI.
pub(super) fn parse_ini(ini: &Ini) -> Result<ConfigFile, ConfigFileError> {
    let mut config = ConfigFile::default();

    // [reference] section
    if let Some(section) = ini.section(Some("reference")) {
        if let Some(v) = section.get("countries_url") {
            config.reference.countries_url = parse_url("countries_url", v)?;
        }
        if let Some(v) = section.get("cities_url") {
            config.reference.cities_url = parse_url("cities_url", v)?;
        }
        if let Some(v) = section.get("cache_ttl_hours") {
            config.reference.cache_ttl_hours =
                v.trim().parse().map_err(|_| ConfigFileError::InvalidValue {
                    section: "reference".to_string(),
                    key: "cache_ttl_hours".to_string(),
                    value: v.to_string(),
                    reason: "must be a non-negative integer (hours)".to_string(),
                })?;
        }
        if let Some(v) = section.get("timeout_secs") {
            config.reference.timeout_secs = v
                .trim()
                .parse()
                .ok()
                .filter(|secs: &u64| *secs > 0)
                .ok_or_else(|| ConfigFileError::InvalidValue {
                    section: "reference".to_string(),
                    key: "timeout_secs".to_string(),
                    value: v.to_string(),
                    reason: "must be a positive integer (seconds)".to_string(),
                })?;
        }
        if let Some(v) = section.get("locale") {
            let locale = v.trim();
            if locale.is_empty() || !locale.chars().all(|c| c.is_ascii_alphabetic()) {
                return Err(ConfigFileError::InvalidValue {
                    section: "reference".to_string(),
                    key: "locale".to_string(),
                    value: v.to_string(),
                    reason: "must be a language code such as 'en' or 'de'".to_string(),
                });
            }
            config.reference.locale = locale.to_lowercase();
        }
        if let Some(v) = section.get("city_radius_km") {
            config.reference.city_radius_km = v
                .trim()
                .parse()
                .ok()
                .filter(|km: &f64| km.is_finite() && *km >= 0.0)
                .ok_or_else(|| ConfigFileError::InvalidValue {
                    section: "reference".to_string(),
                    key: "city_radius_km".to_string(),
                    value: v.to_string(),
                    reason: "must be a non-negative number (kilometres)".to_string(),
                })?;
        }
    }

    // [storage] section
    if let Some(section) = ini.section(Some("storage")) {
        if let Some(v) = section.get("data_dir") {
            let v = v.trim();
            if !v.is_empty() {
                config.storage.data_dir = expand_tilde(v);
            }
        }
    }

    Ok(config)
}

fn parse_url(key: &str, value: &str) -> Result<String, ConfigFileError> {
    let url = value.trim();
    if url.starts_with("http://") || url.starts_with("https://") {
        Ok(url.to_string())
    } else {
        Err(ConfigFileError::InvalidValue {
            section: "reference".to_string(),
            key: key.to_string(),
            value: value.to_string(),
            reason: "must be an http:// or https:// URL".to_string(),
        })
    }
}

/// Expand a leading `~/` to the user's home directory.
pub(super) fn expand_tilde(path: &str) -> PathBuf {
    if let Some(stripped) = path.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(stripped);
        }
    }
    PathBuf::from(path)
}
