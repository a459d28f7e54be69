//! Store + resolver composition.

use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use super::error::ServiceError;
use crate::config::ReferenceConfig;
use crate::reference::{
    GeoResolver, HttpReferenceProvider, ReferenceCache, ReferenceError, ReferenceProvider,
};
use crate::store::{ContainerRegistry, GeoEntity, StoreError};

/// Attribute holding the resolved country name.
pub const COUNTRY_ATTRIBUTE: &str = "country";
/// Attribute holding the resolved ISO country code.
pub const COUNTRY_CODE_ATTRIBUTE: &str = "countryCode";
/// Attribute holding the nearest city name.
pub const CITY_ATTRIBUTE: &str = "city";

/// High-level entry point combining the container registry with the
/// reference resolvers.
///
/// Every operation takes a [`CancellationToken`] that is checked before any
/// work starts.
pub struct GeoService<P> {
    registry: Arc<ContainerRegistry>,
    resolver: GeoResolver<P>,
    city_radius_km: f64,
}

impl GeoService<HttpReferenceProvider> {
    /// Build a service that downloads reference data over HTTP.
    pub fn from_config(
        registry: Arc<ContainerRegistry>,
        config: &ReferenceConfig,
    ) -> Result<Self, ServiceError> {
        let provider =
            HttpReferenceProvider::new(config.clone()).map_err(ReferenceError::from)?;
        let resolver = GeoResolver::new(ReferenceCache::new(provider, config.cache_ttl()));
        Ok(Self::new(registry, resolver, config.city_radius_km()))
    }
}

impl<P: ReferenceProvider> GeoService<P> {
    pub fn new(
        registry: Arc<ContainerRegistry>,
        resolver: GeoResolver<P>,
        city_radius_km: f64,
    ) -> Self {
        Self {
            registry,
            resolver,
            city_radius_km,
        }
    }

    pub fn registry(&self) -> &Arc<ContainerRegistry> {
        &self.registry
    }

    pub fn resolver(&self) -> &GeoResolver<P> {
        &self.resolver
    }

    /// Resolve an entity's location and add it to the named container.
    ///
    /// Sets the `country` and `countryCode` attributes, plus `city` when a
    /// city lies within the configured radius. Fails with
    /// [`ServiceError::LocationUnresolved`] if no country contains the
    /// location; nothing is stored in that case.
    pub async fn register_entity(
        &self,
        container: &str,
        mut entity: GeoEntity,
        cancel: &CancellationToken,
    ) -> Result<GeoEntity, ServiceError> {
        if cancel.is_cancelled() {
            return Err(ServiceError::Cancelled);
        }

        let Some(location) = self.resolve_location(&entity, cancel).await? else {
            return Err(ServiceError::LocationUnresolved {
                latitude: entity.location.latitude(),
                longitude: entity.location.longitude(),
            });
        };
        location.apply(&mut entity);

        let target = self.registry.get_or_create(container)?;
        target.add(entity.clone())?;
        info!(container, id = %entity.id, "Entity registered");
        Ok(entity)
    }

    /// Resolve every entity in the container that has no `country` yet.
    ///
    /// Only the location attributes are written, onto the entity as it is
    /// stored when resolution finishes. Entities outside every country, and
    /// entities moved, resolved or removed meanwhile, are left as they are.
    /// Returns the number of entities updated.
    pub async fn enrich_container(
        &self,
        container: &str,
        cancel: &CancellationToken,
    ) -> Result<usize, ServiceError> {
        if cancel.is_cancelled() {
            return Err(ServiceError::Cancelled);
        }
        let target = self
            .registry
            .get(container)
            .ok_or_else(|| StoreError::container_not_found(container))?;

        let mut updated = 0;
        for entity in target.get_all() {
            if entity.attribute(COUNTRY_ATTRIBUTE).is_some() {
                continue;
            }
            let Some(location) = self.resolve_location(&entity, cancel).await? else {
                continue;
            };

            let mut applied = false;
            let result = target.modify(&entity.id, |current| {
                if current.location == entity.location
                    && current.attribute(COUNTRY_ATTRIBUTE).is_none()
                {
                    location.apply(current);
                    applied = true;
                }
            });
            match result {
                Ok(()) if applied => updated += 1,
                Ok(()) => debug!(container, id = %entity.id, "Entity changed while resolving"),
                // Removed while we were resolving
                Err(e) if e.is_not_found() => {}
                Err(e) => return Err(e.into()),
            }
        }

        info!(container, updated, "Container enriched");
        Ok(updated)
    }

    /// All entities of the named container; empty if it does not exist.
    pub fn container_snapshot(
        &self,
        container: &str,
        cancel: &CancellationToken,
    ) -> Result<Vec<GeoEntity>, ServiceError> {
        if cancel.is_cancelled() {
            return Err(ServiceError::Cancelled);
        }
        Ok(self
            .registry
            .get(container)
            .map(|c| c.get_all())
            .unwrap_or_default())
    }

    /// Advisory check that reference data can currently be fetched.
    pub async fn reference_available(&self) -> bool {
        self.resolver.is_reachable().await
    }

    /// Resolve the country and nearest city for an entity's location.
    /// Returns `None` if no country contains it.
    async fn resolve_location(
        &self,
        entity: &GeoEntity,
        cancel: &CancellationToken,
    ) -> Result<Option<ResolvedLocation>, ServiceError> {
        let (latitude, longitude) = (entity.location.latitude(), entity.location.longitude());

        let Some(country) = self
            .resolver
            .resolve_country(latitude, longitude, cancel)
            .await?
        else {
            debug!(id = %entity.id, latitude, longitude, "No country for entity");
            return Ok(None);
        };

        let city = self
            .resolver
            .resolve_nearest_city(latitude, longitude, self.city_radius_km, cancel)
            .await?;

        Ok(Some(ResolvedLocation {
            country: country.display_name().to_string(),
            country_code: country.iso_code,
            city: city.map(|c| c.name),
        }))
    }
}

/// Location attributes resolved for one entity.
struct ResolvedLocation {
    country: String,
    country_code: String,
    city: Option<String>,
}

impl ResolvedLocation {
    fn apply(&self, entity: &mut GeoEntity) {
        entity.set_attribute(COUNTRY_ATTRIBUTE, self.country.as_str());
        if !self.country_code.is_empty() {
            entity.set_attribute(COUNTRY_CODE_ATTRIBUTE, self.country_code.as_str());
        }
        if let Some(city) = &self.city {
            entity.set_attribute(CITY_ATTRIBUTE, city.as_str());
        }
    }
}
