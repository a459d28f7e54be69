//! High-level service facade.
//!
//! [`GeoService`] composes a shared [`ContainerRegistry`](crate::store::ContainerRegistry)
//! with a [`GeoResolver`](crate::reference::GeoResolver) so callers can
//! store entities already tagged with their country and nearest city.

mod error;
mod facade;

pub use error::ServiceError;
pub use facade::{GeoService, CITY_ATTRIBUTE, COUNTRY_ATTRIBUTE, COUNTRY_CODE_ATTRIBUTE};
