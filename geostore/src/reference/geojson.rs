//! GeoJSON FeatureCollection parsing for reference datasets.
//!
//! Property names are matched case-insensitively since published datasets
//! disagree on casing (`NAME` vs `name`). Features that cannot be used
//! (missing name, unsupported or malformed geometry) are skipped with a
//! warning rather than failing the whole dataset.

use serde::Deserialize;
use serde_json::{Map, Value};
use tracing::{debug, warn};

use super::error::FetchError;
use super::features::{CityFeature, CountryFeature};
use crate::coord::GeoPoint;
use crate::geometry::Geometry;

const COUNTRY_NAME_KEYS: &[&str] = &["NAME", "ADMIN"];
const COUNTRY_CODE_KEYS: &[&str] = &["ISO_A2", "ISO_A3", "ADM0_A3"];
const CITY_NAME_KEYS: &[&str] = &["NAME"];
const CITY_COUNTRY_KEYS: &[&str] = &["ADM0NAME", "COUNTRY"];
const POPULATION_KEYS: &[&str] = &["POP_MAX", "POPULATION"];

/// Placeholder Natural Earth uses for "no code".
const MISSING_CODE: &str = "-99";

#[derive(Deserialize)]
struct FeatureCollection {
    features: Vec<RawFeature>,
}

#[derive(Deserialize)]
struct RawFeature {
    #[serde(default)]
    properties: Option<Map<String, Value>>,
    #[serde(default)]
    geometry: Option<Value>,
}

impl RawFeature {
    fn text(&self, keys: &[&str]) -> Option<String> {
        let properties = self.properties.as_ref()?;
        keys.iter().find_map(|wanted| {
            properties
                .iter()
                .find(|(key, _)| key.eq_ignore_ascii_case(wanted))
                .and_then(|(_, value)| value.as_str())
                .map(str::trim)
                .filter(|s| !s.is_empty() && *s != MISSING_CODE)
                .map(str::to_string)
        })
    }

    fn number(&self, keys: &[&str]) -> Option<f64> {
        let properties = self.properties.as_ref()?;
        keys.iter().find_map(|wanted| {
            properties
                .iter()
                .find(|(key, _)| key.eq_ignore_ascii_case(wanted))
                .and_then(|(_, value)| value.as_f64())
        })
    }

    fn geometry(&self) -> Option<Geometry> {
        let value = self.geometry.clone()?;
        serde_json::from_value(value).ok()
    }
}

fn parse_collection(text: &str) -> Result<FeatureCollection, FetchError> {
    serde_json::from_str(text)
        .map_err(|e| FetchError::InvalidData(format!("Not a GeoJSON FeatureCollection: {e}")))
}

/// Parse a countries dataset.
///
/// `locale` selects the `NAME_<LOCALE>` property used for
/// [`CountryFeature::localized_name`].
pub fn parse_countries(text: &str, locale: &str) -> Result<Vec<CountryFeature>, FetchError> {
    let collection = parse_collection(text)?;
    let localized_key = format!("NAME_{}", locale.trim().to_uppercase());
    let total = collection.features.len();

    let countries: Vec<CountryFeature> = collection
        .features
        .iter()
        .enumerate()
        .filter_map(|(index, raw)| {
            let Some(name) = raw.text(COUNTRY_NAME_KEYS) else {
                warn!(index, "Skipping country feature without a name");
                return None;
            };
            let geometry = match raw.geometry() {
                Some(g @ (Geometry::Polygon(_) | Geometry::MultiPolygon(_))) => g,
                _ => {
                    warn!(
                        index,
                        country = %name,
                        "Skipping country feature without polygon geometry"
                    );
                    return None;
                }
            };
            Some(CountryFeature {
                iso_code: raw.text(COUNTRY_CODE_KEYS).unwrap_or_default(),
                localized_name: raw.text(&[localized_key.as_str()]),
                name,
                geometry,
            })
        })
        .collect();

    debug!(total, parsed = countries.len(), "Parsed countries dataset");
    Ok(countries)
}

/// Parse a populated places dataset.
pub fn parse_cities(text: &str) -> Result<Vec<CityFeature>, FetchError> {
    let collection = parse_collection(text)?;
    let total = collection.features.len();

    let cities: Vec<CityFeature> = collection
        .features
        .iter()
        .enumerate()
        .filter_map(|(index, raw)| {
            let Some(name) = raw.text(CITY_NAME_KEYS) else {
                warn!(index, "Skipping city feature without a name");
                return None;
            };
            let location = raw
                .geometry()
                .as_ref()
                .and_then(Geometry::as_point)
                .and_then(|p| GeoPoint::new(p.y, p.x).ok());
            let Some(location) = location else {
                warn!(index, city = %name, "Skipping city feature without a valid point");
                return None;
            };
            Some(CityFeature {
                name,
                country: raw.text(CITY_COUNTRY_KEYS).unwrap_or_default(),
                location,
                population: raw
                    .number(POPULATION_KEYS)
                    .filter(|p| p.is_finite() && *p >= 0.0)
                    .map(|p| p as u64),
            })
        })
        .collect();

    debug!(total, parsed = cities.len(), "Parsed cities dataset");
    Ok(cities)
}
