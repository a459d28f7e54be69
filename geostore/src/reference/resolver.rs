//! Country and city resolution over the cached reference datasets.

use tokio_util::sync::CancellationToken;
use tracing::debug;

use super::cache::ReferenceCache;
use super::error::ReferenceError;
use super::features::{CityFeature, CityInfo, CountryInfo};
use super::provider::ReferenceProvider;
use crate::coord::GeoPoint;
use crate::geometry::Position;

/// Resolves coordinates against reference datasets.
///
/// Both halves are full scans in dataset order: containment returns the
/// first country whose geometry contains the point, proximity keeps the
/// closest city within the radius (earliest wins on ties).
pub struct GeoResolver<P> {
    cache: ReferenceCache<P>,
}

impl<P: ReferenceProvider> GeoResolver<P> {
    pub fn new(cache: ReferenceCache<P>) -> Self {
        Self { cache }
    }

    pub fn cache(&self) -> &ReferenceCache<P> {
        &self.cache
    }

    /// The country containing the coordinate, if any.
    pub async fn resolve_country(
        &self,
        latitude: f64,
        longitude: f64,
        cancel: &CancellationToken,
    ) -> Result<Option<CountryInfo>, ReferenceError> {
        if cancel.is_cancelled() {
            return Err(ReferenceError::Cancelled);
        }
        let point = GeoPoint::new(latitude, longitude)?;
        let countries = self.cache.countries(cancel).await?;

        let probe = Position::new(point.longitude(), point.latitude());
        let found = countries
            .iter()
            .find(|country| country.geometry.contains(probe))
            .map(CountryInfo::from);

        debug!(
            latitude,
            longitude,
            country = found.as_ref().map(|c| c.name.as_str()),
            "Resolved country"
        );
        Ok(found)
    }

    /// The closest city no further than `max_km` from the coordinate.
    ///
    /// Cities exactly `max_km` away qualify. The result carries
    /// [`CityInfo::distance_km`]. A negative or non-finite `max_km` fails
    /// with [`ReferenceError::InvalidRadius`] before any fetch.
    pub async fn resolve_nearest_city(
        &self,
        latitude: f64,
        longitude: f64,
        max_km: f64,
        cancel: &CancellationToken,
    ) -> Result<Option<CityInfo>, ReferenceError> {
        if cancel.is_cancelled() {
            return Err(ReferenceError::Cancelled);
        }
        let point = GeoPoint::new(latitude, longitude)?;
        if !max_km.is_finite() || max_km < 0.0 {
            return Err(ReferenceError::InvalidRadius(max_km));
        }
        let cities = self.cache.cities(cancel).await?;

        let nearest = nearest_city(&cities, &point, max_km).map(|(city, distance)| CityInfo {
            distance_km: Some(distance),
            ..CityInfo::from(city)
        });

        debug!(
            latitude,
            longitude,
            max_km,
            city = nearest.as_ref().map(|c| c.name.as_str()),
            "Resolved nearest city"
        );
        Ok(nearest)
    }

    /// Cities whose name contains `query`, ignoring case, in dataset order.
    ///
    /// A blank query or a zero limit yields no results without touching the
    /// dataset.
    pub async fn search_cities_by_name(
        &self,
        query: &str,
        limit: usize,
        cancel: &CancellationToken,
    ) -> Result<Vec<CityInfo>, ReferenceError> {
        if cancel.is_cancelled() {
            return Err(ReferenceError::Cancelled);
        }
        let needle = query.trim().to_lowercase();
        if needle.is_empty() || limit == 0 {
            return Ok(Vec::new());
        }

        let cities = self.cache.cities(cancel).await?;
        Ok(cities
            .iter()
            .filter(|city| city.name.to_lowercase().contains(&needle))
            .take(limit)
            .map(CityInfo::from)
            .collect())
    }

    /// Drop the cached datasets so the next lookup refetches them.
    pub fn invalidate_reference_cache(&self) {
        self.cache.invalidate();
    }

    /// Advisory probe of the reference source.
    pub async fn is_reachable(&self) -> bool {
        self.cache.provider().is_reachable().await
    }
}

fn nearest_city<'a>(
    cities: &'a [CityFeature],
    point: &GeoPoint,
    max_km: f64,
) -> Option<(&'a CityFeature, f64)> {
    let mut best: Option<(&CityFeature, f64)> = None;
    for city in cities {
        let distance = point.distance_km(&city.location);
        if distance > max_km || distance.is_nan() {
            continue;
        }
        if best.map_or(true, |(_, d)| distance < d) {
            best = Some((city, distance));
        }
    }
    best
}
