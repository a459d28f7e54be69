//! Geometry type definitions
//!
//! Shapes follow the GeoJSON layout: positions are `[x, y]` pairs where `x` is
//! longitude and `y` is latitude. Any extra components (altitude) are dropped.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised when raw coordinate arrays do not describe a usable shape.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GeometryError {
    /// A position had fewer than two components
    #[error("Malformed position: expected at least 2 components, found {0}")]
    MalformedPosition(usize),
    /// A position component was NaN or infinite
    #[error("Malformed position: non-finite component")]
    NonFinite,
}

/// A single planar vertex.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<f64>", into = "[f64; 2]")]
pub struct Position {
    /// Longitude for geographic data
    pub x: f64,
    /// Latitude for geographic data
    pub y: f64,
}

impl Position {
    #[inline]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

impl TryFrom<Vec<f64>> for Position {
    type Error = GeometryError;

    fn try_from(components: Vec<f64>) -> Result<Self, Self::Error> {
        match components.as_slice() {
            [x, y, ..] if x.is_finite() && y.is_finite() => Ok(Self::new(*x, *y)),
            [_, _, ..] => Err(GeometryError::NonFinite),
            other => Err(GeometryError::MalformedPosition(other.len())),
        }
    }
}

impl From<Position> for [f64; 2] {
    fn from(position: Position) -> Self {
        [position.x, position.y]
    }
}

impl From<(f64, f64)> for Position {
    fn from((x, y): (f64, f64)) -> Self {
        Self::new(x, y)
    }
}

/// An implicitly closed sequence of vertices.
///
/// The last vertex connects back to the first whether or not the caller
/// repeated it.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Ring {
    points: Vec<Position>,
}

impl Ring {
    pub fn new(points: Vec<Position>) -> Self {
        Self { points }
    }

    /// Builds a ring from `(x, y)` tuples.
    pub fn from_pairs(pairs: &[(f64, f64)]) -> Self {
        Self {
            points: pairs.iter().copied().map(Position::from).collect(),
        }
    }

    pub fn points(&self) -> &[Position] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

/// A list of rings. The first ring is conventionally the outer boundary,
/// the rest are holes.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Polygon {
    rings: Vec<Ring>,
}

impl Polygon {
    pub fn new(rings: Vec<Ring>) -> Self {
        Self { rings }
    }

    pub fn rings(&self) -> &[Ring] {
        &self.rings
    }
}

/// Tagged geometry union, deserialized from GeoJSON geometry objects
/// (`{"type": "...", "coordinates": ...}`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "coordinates")]
pub enum Geometry {
    Point(Position),
    LineString(Vec<Position>),
    Polygon(Polygon),
    MultiPolygon(Vec<Polygon>),
}

impl Geometry {
    /// Returns the GeoJSON type name of this geometry.
    pub fn kind(&self) -> &'static str {
        match self {
            Geometry::Point(_) => "Point",
            Geometry::LineString(_) => "LineString",
            Geometry::Polygon(_) => "Polygon",
            Geometry::MultiPolygon(_) => "MultiPolygon",
        }
    }

    /// Returns the point position for `Point` geometries.
    pub fn as_point(&self) -> Option<Position> {
        match self {
            Geometry::Point(position) => Some(*position),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_position_drops_altitude() {
        let position: Position = serde_json::from_str("[10.5, 20.25, 300.0]").unwrap();
        assert_eq!(position, Position::new(10.5, 20.25));
    }

    #[test]
    fn test_position_rejects_single_component() {
        let result: Result<Position, _> = serde_json::from_str("[10.5]");
        assert!(result.is_err());
    }

    #[test]
    fn test_position_try_from_errors() {
        assert_eq!(
            Position::try_from(vec![]),
            Err(GeometryError::MalformedPosition(0))
        );
        assert_eq!(
            Position::try_from(vec![f64::NAN, 1.0]),
            Err(GeometryError::NonFinite)
        );
    }

    #[test]
    fn test_deserialize_polygon() {
        let json = r#"{"type": "Polygon", "coordinates": [[[0,0],[0,10],[10,10],[10,0],[0,0]]]}"#;
        let geometry: Geometry = serde_json::from_str(json).unwrap();

        match geometry {
            Geometry::Polygon(polygon) => {
                assert_eq!(polygon.rings().len(), 1);
                assert_eq!(polygon.rings()[0].len(), 5);
            }
            other => panic!("Expected polygon, got {}", other.kind()),
        }
    }

    #[test]
    fn test_deserialize_multipolygon() {
        let json = r#"{
            "type": "MultiPolygon",
            "coordinates": [
                [[[0,0],[0,1],[1,1],[1,0]]],
                [[[5,5],[5,6],[6,6],[6,5]]]
            ]
        }"#;
        let geometry: Geometry = serde_json::from_str(json).unwrap();
        assert!(matches!(&geometry, Geometry::MultiPolygon(polygons) if polygons.len() == 2));
    }

    #[test]
    fn test_deserialize_point() {
        let geometry: Geometry =
            serde_json::from_str(r#"{"type": "Point", "coordinates": [37.6, 55.75]}"#).unwrap();
        assert_eq!(geometry.as_point(), Some(Position::new(37.6, 55.75)));
    }

    #[test]
    fn test_unknown_geometry_type_fails() {
        let result: Result<Geometry, _> =
            serde_json::from_str(r#"{"type": "MultiPoint", "coordinates": [[1,2]]}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_serialize_uses_geojson_shape() {
        let geometry = Geometry::Point(Position::new(1.0, 2.0));
        let json = serde_json::to_value(&geometry).unwrap();
        assert_eq!(json["type"], "Point");
        assert_eq!(json["coordinates"], serde_json::json!([1.0, 2.0]));
    }
}
