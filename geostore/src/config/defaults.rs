//! Default configuration values.

/// Natural Earth 1:110m admin-0 country boundaries.
pub const DEFAULT_COUNTRIES_URL: &str = "https://raw.githubusercontent.com/nvkelso/natural-earth-vector/master/geojson/ne_110m_admin_0_countries.geojson";

/// Natural Earth 1:110m populated places.
pub const DEFAULT_CITIES_URL: &str = "https://raw.githubusercontent.com/nvkelso/natural-earth-vector/master/geojson/ne_110m_populated_places_simple.geojson";

/// How long a fetched dataset stays fresh (24 hours).
pub const DEFAULT_CACHE_TTL_HOURS: u64 = 24;

/// HTTP timeout for dataset downloads.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

pub const DEFAULT_LOCALE: &str = "en";

/// Radius used when attaching the nearest city to a registered entity.
pub const DEFAULT_CITY_RADIUS_KM: f64 = 50.0;

/// Name of the per-user configuration directory under `$HOME`.
pub const CONFIG_DIR_NAME: &str = ".geostore";

pub const CONFIG_FILE_NAME: &str = "config.ini";

/// Subdirectory of the configuration directory holding saved documents.
pub const DEFAULT_DATA_DIR_NAME: &str = "data";
