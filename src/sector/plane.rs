//! Double-precision plane equations for sector polygons.

use crate::float_types::Real;
use nalgebra::{Point3, Vector3};

/// Coordinate axis, used to pick a planar mapping basis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    X,
    Y,
    Z,
}

/// A plane `n·p = w` with unit normal `n`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Plane {
    /// Unit normal vector of the plane
    pub normal: Vector3<Real>,
    /// Distance from origin along normal (plane equation: n·p = w)
    pub w: Real,
}

impl Default for Plane {
    fn default() -> Self {
        Plane {
            normal: Vector3::z(),
            w: 0.0,
        }
    }
}

impl Plane {
    /// Create a new plane from normal vector and distance
    pub fn from_normal(normal: Vector3<Real>, w: Real) -> Self {
        Plane {
            normal: normal.normalize(),
            w,
        }
    }

    /// Create a plane through three points.
    /// The normal direction follows the right-hand rule: (p2-p1) × (p3-p1)
    pub fn from_points(p1: Point3<Real>, p2: Point3<Real>, p3: Point3<Real>) -> Self {
        let normal = (p2 - p1).cross(&(p3 - p1));

        if !(normal.norm_squared() >= Real::EPSILON * Real::EPSILON) {
            // Degenerate or non-finite triangle, return default plane
            return Plane::default();
        }

        let normal = normal.normalize();
        let w = normal.dot(&p1.coords);
        Plane { normal, w }
    }

    pub const fn normal(&self) -> Vector3<Real> {
        self.normal
    }

    pub const fn offset(&self) -> Real {
        self.w
    }

    pub fn signed_distance(&self, point: &Point3<Real>) -> Real {
        self.normal.dot(&point.coords) - self.w
    }

    /// Orthogonal projection of `point` onto the plane
    pub fn project_point(&self, point: &Point3<Real>) -> Point3<Real> {
        point - self.normal * self.signed_distance(point)
    }

    /// The axis along which the normal has its largest component
    pub fn dominant_axis(&self) -> Axis {
        let n = self.normal.abs();
        if n.x >= n.y && n.x >= n.z {
            Axis::X
        } else if n.y >= n.z {
            Axis::Y
        } else {
            Axis::Z
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_points_follows_right_hand_rule() {
        let plane = Plane::from_points(
            Point3::new(0.0, 0.0, 2.0),
            Point3::new(1.0, 0.0, 2.0),
            Point3::new(0.0, 1.0, 2.0),
        );
        assert_eq!(plane.normal(), Vector3::z());
        assert_eq!(plane.offset(), 2.0);
        assert_eq!(plane.dominant_axis(), Axis::Z);
    }

    #[test]
    fn degenerate_triangle_gives_default_plane() {
        let p = Point3::new(1.0, 1.0, 1.0);
        assert_eq!(Plane::from_points(p, p, p), Plane::default());

        let nan = Point3::new(Real::NAN, 0.0, 0.0);
        assert_eq!(
            Plane::from_points(nan, Point3::new(1.0, 0.0, 0.0), Point3::new(0.0, 1.0, 0.0)),
            Plane::default()
        );
    }

    #[test]
    fn projection_lands_on_plane() {
        let plane = Plane::from_normal(Vector3::new(1.0, 1.0, 0.0), 1.0);
        let projected = plane.project_point(&Point3::new(3.0, -1.0, 4.0));
        assert!(plane.signed_distance(&projected).abs() < 1e-12);
        assert_eq!(plane.dominant_axis(), Axis::X);
    }
}
