//! Reference geography: datasets, caching and resolution.
//!
//! A [`ReferenceProvider`] supplies country polygons and populated places,
//! a [`ReferenceCache`] keeps them for a time-to-live with single-flight
//! refreshes, and a [`GeoResolver`] answers containment and proximity
//! queries on top.
//!
//! ```no_run
//! use geostore::config::ReferenceConfig;
//! use geostore::reference::{GeoResolver, HttpReferenceProvider, ReferenceCache};
//! use tokio_util::sync::CancellationToken;
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let config = ReferenceConfig::default();
//! let provider = HttpReferenceProvider::new(config.clone())?;
//! let resolver = GeoResolver::new(ReferenceCache::new(provider, config.cache_ttl()));
//!
//! let cancel = CancellationToken::new();
//! if let Some(country) = resolver.resolve_country(48.85, 2.35, &cancel).await? {
//!     println!("{}", country.name);
//! }
//! # Ok(())
//! # }
//! ```

mod cache;
mod error;
mod features;
mod geojson;
mod provider;
mod resolver;

pub use cache::{CacheStats, ReferenceCache};
pub use error::{FetchError, ReferenceError};
pub use features::{CityFeature, CityInfo, CountryFeature, CountryInfo};
pub use geojson::{parse_cities, parse_countries};
pub use provider::{DatasetKind, HttpReferenceProvider, ReferenceProvider};
pub use resolver::GeoResolver;
