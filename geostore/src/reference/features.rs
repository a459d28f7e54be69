//! Reference dataset records.

use serde::Serialize;

use crate::coord::GeoPoint;
use crate::geometry::Geometry;

/// A country boundary from the countries dataset.
#[derive(Debug, Clone, PartialEq)]
pub struct CountryFeature {
    pub name: String,
    /// ISO 3166 code; empty when the dataset has none
    pub iso_code: String,
    /// Name in the configured locale, when the dataset provides one
    pub localized_name: Option<String>,
    pub geometry: Geometry,
}

/// A populated place from the cities dataset.
#[derive(Debug, Clone, PartialEq)]
pub struct CityFeature {
    pub name: String,
    pub country: String,
    pub location: GeoPoint,
    pub population: Option<u64>,
}

/// Result of a country lookup.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CountryInfo {
    pub name: String,
    pub iso_code: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub localized_name: Option<String>,
}

impl CountryInfo {
    /// The localized name if present, otherwise the dataset name.
    pub fn display_name(&self) -> &str {
        self.localized_name.as_deref().unwrap_or(&self.name)
    }
}

impl From<&CountryFeature> for CountryInfo {
    fn from(feature: &CountryFeature) -> Self {
        Self {
            name: feature.name.clone(),
            iso_code: feature.iso_code.clone(),
            localized_name: feature.localized_name.clone(),
        }
    }
}

/// Result of a city lookup.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CityInfo {
    pub name: String,
    pub country: String,
    pub location: GeoPoint,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub population: Option<u64>,
    /// Distance from the query point, set by nearest-city lookups
    #[serde(skip_serializing_if = "Option::is_none")]
    pub distance_km: Option<f64>,
}

impl From<&CityFeature> for CityInfo {
    fn from(feature: &CityFeature) -> Self {
        Self {
            name: feature.name.clone(),
            country: feature.country.clone(),
            location: feature.location,
            population: feature.population,
            distance_km: None,
        }
    }
}
