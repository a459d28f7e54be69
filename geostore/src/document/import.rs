//! Document import.

use chrono::{DateTime, Utc};
use serde_json::{Map, Value};
use uuid::Uuid;

use super::keys::to_lower_camel_case;
use crate::coord::GeoPoint;
use crate::store::{AttributeValue, GeoEntity, StoreError};

const LATITUDE_KEYS: &[&str] = &["latitude", "lat"];
const LONGITUDE_KEYS: &[&str] = &["longitude", "lon", "lng"];

/// Parse a JSON document into entities.
///
/// The whole document is rejected if any record is malformed: non-JSON or
/// non-array input and records without usable coordinates fail with
/// [`StoreError::Serialization`], out-of-range coordinates with
/// [`StoreError::Validation`].
pub fn parse_entities(text: &str) -> Result<Vec<GeoEntity>, StoreError> {
    let document: Value = serde_json::from_str(text)
        .map_err(|e| StoreError::Serialization(format!("Invalid JSON document: {e}")))?;

    let Value::Array(records) = document else {
        return Err(StoreError::Serialization(
            "Document root must be a JSON array".to_string(),
        ));
    };

    records
        .iter()
        .enumerate()
        .map(|(index, record)| match record {
            Value::Object(fields) => parse_record(index, fields),
            _ => Err(StoreError::Serialization(format!(
                "Record {index} is not a JSON object"
            ))),
        })
        .collect()
}

fn parse_record(index: usize, fields: &Map<String, Value>) -> Result<GeoEntity, StoreError> {
    let latitude = coordinate(index, fields, LATITUDE_KEYS, "latitude")?;
    let longitude = coordinate(index, fields, LONGITUDE_KEYS, "longitude")?;
    let location = GeoPoint::new(latitude, longitude)
        .map_err(|e| StoreError::Validation(format!("Record {index}: {e}")))?;

    let id = match field(fields, &["id"]) {
        Some(Value::String(s)) if !s.trim().is_empty() => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        _ => Uuid::new_v4().to_string(),
    };

    let name = match field(fields, &["name"]) {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    };

    let mut entity = GeoEntity::new(id, name, location);
    for (key, value) in fields {
        if is_reserved(key) {
            continue;
        }
        let Some(value) = attribute_value(value) else {
            continue;
        };
        let normalized = to_lower_camel_case(key);
        let key = if normalized.is_empty() {
            key.clone()
        } else {
            normalized
        };
        entity.set_attribute(key, value);
    }

    Ok(entity)
}

/// Case-insensitive lookup; the first alias present wins.
fn field<'a>(fields: &'a Map<String, Value>, aliases: &[&str]) -> Option<&'a Value> {
    aliases.iter().find_map(|alias| {
        fields
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(alias))
            .map(|(_, value)| value)
    })
}

fn coordinate(
    index: usize,
    fields: &Map<String, Value>,
    aliases: &[&str],
    label: &str,
) -> Result<f64, StoreError> {
    let parsed = match field(fields, aliases) {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    parsed.ok_or_else(|| {
        StoreError::Serialization(format!("Record {index}: missing or invalid {label}"))
    })
}

fn is_reserved(key: &str) -> bool {
    ["id", "name"]
        .iter()
        .chain(LATITUDE_KEYS)
        .chain(LONGITUDE_KEYS)
        .any(|reserved| key.eq_ignore_ascii_case(reserved))
}

fn attribute_value(value: &Value) -> Option<AttributeValue> {
    match value {
        Value::Null => None,
        Value::Number(n) => n.as_f64().map(AttributeValue::Number),
        Value::String(s) => Some(match DateTime::parse_from_rfc3339(s) {
            Ok(ts) => AttributeValue::Timestamp(ts.with_timezone(&Utc)),
            Err(_) => AttributeValue::Text(s.clone()),
        }),
        Value::Bool(b) => Some(AttributeValue::Text(b.to_string())),
        Value::Array(_) | Value::Object(_) => Some(AttributeValue::Text(value.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_basic_record() {
        let entities =
            parse_entities(r#"[{"id": "p1", "name": "Alice", "latitude": 10.5, "longitude": -3}]"#)
                .unwrap();

        assert_eq!(entities.len(), 1);
        assert_eq!(entities[0].id, "p1");
        assert_eq!(entities[0].name, "Alice");
        assert_eq!(entities[0].location.latitude(), 10.5);
        assert_eq!(entities[0].location.longitude(), -3.0);
        assert!(entities[0].attributes.is_empty());
    }

    #[test]
    fn test_case_insensitive_fields_and_aliases() {
        let entities =
            parse_entities(r#"[{"Id": "p1", "NAME": "Alice", "LAT": "1.5", "Lng": " 2.5 "}]"#)
                .unwrap();

        assert_eq!(entities[0].id, "p1");
        assert_eq!(entities[0].name, "Alice");
        assert_eq!(entities[0].location.latitude(), 1.5);
        assert_eq!(entities[0].location.longitude(), 2.5);
    }

    #[test]
    fn test_numeric_id_kept_as_text() {
        let entities = parse_entities(r#"[{"id": 42, "lat": 0, "lon": 0}]"#).unwrap();
        assert_eq!(entities[0].id, "42");
    }

    #[test]
    fn test_missing_or_blank_id_generates_uuid() {
        let entities = parse_entities(
            r#"[{"lat": 0, "lon": 0}, {"id": "  ", "lat": 0, "lon": 0}, {"id": true, "lat": 0, "lon": 0}]"#,
        )
        .unwrap();

        for entity in &entities {
            assert!(Uuid::parse_str(&entity.id).is_ok(), "{}", entity.id);
        }
        assert_ne!(entities[0].id, entities[1].id);
    }

    #[test]
    fn test_name_defaults_to_empty() {
        let entities = parse_entities(r#"[{"id": "p1", "lat": 0, "lon": 0}]"#).unwrap();
        assert_eq!(entities[0].name, "");
    }

    #[test]
    fn test_attribute_conversion() {
        let entities = parse_entities(
            r#"[{
                "id": "p1", "lat": 0, "lon": 0,
                "Population": 1200,
                "seen_at": "2024-03-01T12:00:00Z",
                "Status": "active",
                "verified": true,
                "tags": ["a", "b"],
                "extra": {"k": 1},
                "ignored": null
            }]"#,
        )
        .unwrap();
        let entity = &entities[0];

        assert_eq!(
            entity.attribute("population"),
            Some(&AttributeValue::Number(1200.0))
        );
        assert_eq!(
            entity.attribute("seenAt"),
            Some(&AttributeValue::Timestamp(
                Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap()
            ))
        );
        assert_eq!(entity.attribute("status").unwrap().as_text(), Some("active"));
        assert_eq!(entity.attribute("verified").unwrap().as_text(), Some("true"));
        assert_eq!(entity.attribute("tags").unwrap().as_text(), Some(r#"["a","b"]"#));
        assert_eq!(entity.attribute("extra").unwrap().as_text(), Some(r#"{"k":1}"#));
        assert!(entity.attribute("ignored").is_none());
        assert_eq!(entity.attributes.len(), 6);
    }

    #[test]
    fn test_not_json() {
        let err = parse_entities("not json").unwrap_err();
        assert!(matches!(err, StoreError::Serialization(_)));
    }

    #[test]
    fn test_not_an_array() {
        let err = parse_entities(r#"{"id": "p1"}"#).unwrap_err();
        assert!(matches!(err, StoreError::Serialization(_)));
    }

    #[test]
    fn test_record_not_an_object() {
        let err = parse_entities(r#"[{"lat": 0, "lon": 0}, 5]"#).unwrap_err();
        assert!(matches!(err, StoreError::Serialization(_)));
    }

    #[test]
    fn test_missing_coordinates() {
        let err = parse_entities(r#"[{"id": "p1", "lat": 10}]"#).unwrap_err();
        assert!(matches!(err, StoreError::Serialization(_)));

        let err = parse_entities(r#"[{"id": "p1", "lat": "north", "lon": 1}]"#).unwrap_err();
        assert!(matches!(err, StoreError::Serialization(_)));
    }

    #[test]
    fn test_out_of_range_coordinates() {
        let err = parse_entities(r#"[{"id": "p1", "lat": 91, "lon": 0}]"#).unwrap_err();
        assert!(matches!(err, StoreError::Validation(_)));
    }

    #[test]
    fn test_empty_array() {
        assert!(parse_entities("[]").unwrap().is_empty());
    }
}
