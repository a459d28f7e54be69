//! Reference dataset configuration.

use std::time::Duration;

use super::defaults::{
    DEFAULT_CACHE_TTL_HOURS, DEFAULT_CITIES_URL, DEFAULT_CITY_RADIUS_KM, DEFAULT_COUNTRIES_URL,
    DEFAULT_LOCALE, DEFAULT_TIMEOUT_SECS,
};

/// Configuration for reference dataset fetching, caching and enrichment.
///
/// # Example
///
/// ```
/// use geostore::config::ReferenceConfig;
///
/// let config = ReferenceConfig::new()
///     .with_countries_url("https://example.com/countries.geojson")
///     .with_city_radius_km(25.0);
///
/// assert_eq!(config.countries_url(), "https://example.com/countries.geojson");
/// assert_eq!(config.city_radius_km(), 25.0);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct ReferenceConfig {
    countries_url: String,
    cities_url: String,
    cache_ttl: Duration,
    timeout: Duration,
    locale: String,
    city_radius_km: f64,
}

impl ReferenceConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_countries_url(mut self, url: impl Into<String>) -> Self {
        self.countries_url = url.into();
        self
    }

    pub fn with_cities_url(mut self, url: impl Into<String>) -> Self {
        self.cities_url = url.into();
        self
    }

    /// Set how long a fetched dataset is served before it is refetched.
    ///
    /// Default: 24 hours.
    pub fn with_cache_ttl(mut self, ttl: Duration) -> Self {
        self.cache_ttl = ttl;
        self
    }

    /// Set the HTTP timeout for a single dataset download. Default: 30 seconds.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the locale used to pick localized country names (`NAME_<LOCALE>`).
    pub fn with_locale(mut self, locale: impl Into<String>) -> Self {
        self.locale = locale.into();
        self
    }

    /// Set the nearest-city search radius used when enriching entities.
    pub fn with_city_radius_km(mut self, radius_km: f64) -> Self {
        self.city_radius_km = radius_km;
        self
    }

    pub fn countries_url(&self) -> &str {
        &self.countries_url
    }

    pub fn cities_url(&self) -> &str {
        &self.cities_url
    }

    pub fn cache_ttl(&self) -> Duration {
        self.cache_ttl
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn locale(&self) -> &str {
        &self.locale
    }

    pub fn city_radius_km(&self) -> f64 {
        self.city_radius_km
    }
}

impl Default for ReferenceConfig {
    fn default() -> Self {
        Self {
            countries_url: DEFAULT_COUNTRIES_URL.to_string(),
            cities_url: DEFAULT_CITIES_URL.to_string(),
            cache_ttl: Duration::from_secs(DEFAULT_CACHE_TTL_HOURS * 3600),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            locale: DEFAULT_LOCALE.to_string(),
            city_radius_km: DEFAULT_CITY_RADIUS_KM,
        }
    }
}
