//! Even-odd ray casting.
//!
//! A horizontal ray is cast from the query point toward +x. Every edge whose
//! endpoints straddle the query's y coordinate and lies to the right of the
//! point toggles the inside flag. Points exactly on an edge may be classified
//! either way.
//!
//! Polygons are tested ring by ring and report containment when any ring does;
//! hole rings are not subtracted from their outer ring.

use super::types::{Geometry, Polygon, Position, Ring};

/// Minimum number of vertices for a ring to enclose any area.
pub const MIN_RING_POINTS: usize = 3;

impl Ring {
    /// Returns true if `point` lies inside this ring.
    ///
    /// Rings with fewer than [`MIN_RING_POINTS`] vertices contain nothing.
    pub fn contains(&self, point: Position) -> bool {
        let points = self.points();
        if points.len() < MIN_RING_POINTS {
            return false;
        }

        let mut inside = false;
        let mut j = points.len() - 1;
        for i in 0..points.len() {
            let (pi, pj) = (points[i], points[j]);
            if (pi.y > point.y) != (pj.y > point.y) {
                let crossing_x = (pj.x - pi.x) * (point.y - pi.y) / (pj.y - pi.y) + pi.x;
                if point.x < crossing_x {
                    inside = !inside;
                }
            }
            j = i;
        }
        inside
    }
}

impl Polygon {
    /// Returns true if any ring of this polygon contains `point`.
    pub fn contains(&self, point: Position) -> bool {
        self.rings().iter().any(|ring| ring.contains(point))
    }
}

impl Geometry {
    /// Returns true if this geometry encloses `point`.
    ///
    /// Only areal geometries can contain a point; `Point` and `LineString`
    /// always return false.
    pub fn contains(&self, point: Position) -> bool {
        match self {
            Geometry::Polygon(polygon) => polygon.contains(point),
            Geometry::MultiPolygon(polygons) => polygons.iter().any(|p| p.contains(point)),
            Geometry::Point(_) | Geometry::LineString(_) => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square() -> Ring {
        Ring::from_pairs(&[(0.0, 0.0), (0.0, 10.0), (10.0, 10.0), (10.0, 0.0)])
    }

    #[test]
    fn test_square_contains_center() {
        assert!(square().contains(Position::new(5.0, 5.0)));
    }

    #[test]
    fn test_square_excludes_outside_points() {
        assert!(!square().contains(Position::new(15.0, 15.0)));
        assert!(!square().contains(Position::new(-1.0, -1.0)));
    }

    #[test]
    fn test_explicitly_closed_ring_matches_implicit() {
        let closed = Ring::from_pairs(&[
            (0.0, 0.0),
            (0.0, 10.0),
            (10.0, 10.0),
            (10.0, 0.0),
            (0.0, 0.0),
        ]);
        for (x, y) in [(5.0, 5.0), (15.0, 15.0), (-1.0, -1.0), (9.9, 0.1)] {
            let p = Position::new(x, y);
            assert_eq!(closed.contains(p), square().contains(p), "at ({x}, {y})");
        }
    }

    #[test]
    fn test_degenerate_rings_contain_nothing() {
        let origin = Position::new(0.0, 0.0);
        assert!(!Ring::default().contains(origin));
        assert!(!Ring::from_pairs(&[(-1.0, -1.0)]).contains(origin));
        assert!(!Ring::from_pairs(&[(-1.0, -1.0), (1.0, 1.0)]).contains(origin));
    }

    #[test]
    fn test_concave_ring() {
        // U shape opening upward
        let ring = Ring::from_pairs(&[
            (0.0, 0.0),
            (10.0, 0.0),
            (10.0, 10.0),
            (7.0, 10.0),
            (7.0, 3.0),
            (3.0, 3.0),
            (3.0, 10.0),
            (0.0, 10.0),
        ]);
        assert!(ring.contains(Position::new(1.5, 8.0)));
        assert!(ring.contains(Position::new(8.5, 8.0)));
        assert!(!ring.contains(Position::new(5.0, 8.0)), "inside the notch");
        assert!(ring.contains(Position::new(5.0, 1.0)));
    }

    #[test]
    fn test_polygon_hole_is_not_subtracted() {
        let outer = square();
        let hole = Ring::from_pairs(&[(4.0, 4.0), (4.0, 6.0), (6.0, 6.0), (6.0, 4.0)]);
        let polygon = Polygon::new(vec![outer, hole]);

        // Any ring matching counts as containment
        assert!(polygon.contains(Position::new(5.0, 5.0)));
        assert!(polygon.contains(Position::new(2.0, 2.0)));
        assert!(!polygon.contains(Position::new(20.0, 20.0)));
    }

    #[test]
    fn test_multipolygon_any_member() {
        let a = Polygon::new(vec![square()]);
        let b = Polygon::new(vec![Ring::from_pairs(&[
            (20.0, 20.0),
            (20.0, 30.0),
            (30.0, 30.0),
            (30.0, 20.0),
        ])]);
        let geometry = Geometry::MultiPolygon(vec![a, b]);

        assert!(geometry.contains(Position::new(5.0, 5.0)));
        assert!(geometry.contains(Position::new(25.0, 25.0)));
        assert!(!geometry.contains(Position::new(15.0, 15.0)));
    }

    #[test]
    fn test_non_areal_geometries_contain_nothing() {
        let p = Position::new(1.0, 1.0);
        assert!(!Geometry::Point(p).contains(p));
        assert!(!Geometry::LineString(vec![Position::new(0.0, 0.0), Position::new(2.0, 2.0)])
            .contains(p));
    }

    #[test]
    fn test_negative_coordinates() {
        // Box around Buenos Aires (lon -59..-57, lat -36..-34)
        let ring = Ring::from_pairs(&[
            (-59.0, -36.0),
            (-59.0, -34.0),
            (-57.0, -34.0),
            (-57.0, -36.0),
        ]);
        assert!(ring.contains(Position::new(-58.38, -34.60)));
        assert!(!ring.contains(Position::new(-56.0, -34.60)));
    }
}
