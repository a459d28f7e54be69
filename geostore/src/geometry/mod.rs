//! Planar geometry and point-in-polygon containment.
//!
//! Geometries use a tagged union ([`Geometry`]) mirroring GeoJSON geometry
//! objects, and containment is decided with even-odd ray casting.
//!
//! # Usage
//!
//! ```
//! use geostore::geometry::{Position, Ring};
//!
//! let ring = Ring::from_pairs(&[(0.0, 0.0), (0.0, 10.0), (10.0, 10.0), (10.0, 0.0)]);
//! assert!(ring.contains(Position::new(5.0, 5.0)));
//! assert!(!ring.contains(Position::new(15.0, 15.0)));
//! ```

mod containment;
mod types;

pub use containment::MIN_RING_POINTS;
pub use types::{Geometry, GeometryError, Polygon, Position, Ring};
