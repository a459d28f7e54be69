//! Document export.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::store::{AttributeValue, GeoEntity, StoreError};

const RESERVED: &[&str] = &["id", "name", "latitude", "longitude"];

#[derive(Serialize)]
struct Record<'a> {
    id: &'a str,
    name: &'a str,
    latitude: f64,
    longitude: f64,
    #[serde(flatten)]
    attributes: BTreeMap<&'a str, &'a AttributeValue>,
}

impl<'a> From<&'a GeoEntity> for Record<'a> {
    fn from(entity: &'a GeoEntity) -> Self {
        Self {
            id: &entity.id,
            name: &entity.name,
            latitude: entity.location.latitude(),
            longitude: entity.location.longitude(),
            attributes: entity
                .attributes
                .iter()
                .filter(|(key, _)| !RESERVED.iter().any(|r| key.eq_ignore_ascii_case(r)))
                .map(|(key, value)| (key.as_str(), value))
                .collect(),
        }
    }
}

/// Render entities as a pretty-printed JSON document, ordered by id.
///
/// Timestamps are written as RFC 3339 strings so the document imports back
/// to the same attribute types.
pub fn to_json_text(entities: &[GeoEntity]) -> Result<String, StoreError> {
    let mut records: Vec<Record<'_>> = entities.iter().map(Record::from).collect();
    records.sort_by(|a, b| a.id.cmp(b.id));

    serde_json::to_string_pretty(&records).map_err(|e| StoreError::Serialization(e.to_string()))
}
