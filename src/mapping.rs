//! Texture mapping for planar polygons.
//!
//! Every polygon owns a default planar basis ([`MappingVectors`]) derived from
//! its plane. A [`MappingDefinition`] is the affine transform from that basis
//! to texture space. [`mapping_from_reference_to_target`] solves it from three
//! point correspondences.

use crate::float_types::{Real, tolerance};
use crate::sector::plane::{Axis, Plane};
use nalgebra::{Matrix3, Point2, Point3, Vector2, Vector3};

/// Three corners in 2D. Corner 0 is the origin of the basis, `c2 - c0` the
/// first axis and `c1 - c0` the second.
pub type UvBasis = [Point2<Real>; 3];

/// Affine transform from a polygon's planar coordinates `(s, t)` to texture space.
///
/// Coefficients are stored in the engine convention: offsets are subtracted,
/// so an imported UV is reproduced as
/// `u = UoS·s + UoT·t − UOffset`, `v = VoS·s + VoT·t − VOffset`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MappingDefinition {
    pub u_over_s: Real,
    pub u_over_t: Real,
    pub v_over_s: Real,
    pub v_over_t: Real,
    pub u_offset: Real,
    pub v_offset: Real,
}

impl Default for MappingDefinition {
    fn default() -> Self {
        MappingDefinition {
            u_over_s: 1.0,
            u_over_t: 0.0,
            v_over_s: 0.0,
            v_over_t: 1.0,
            u_offset: 0.0,
            v_offset: 0.0,
        }
    }
}

impl MappingDefinition {
    /// Encode an affine map into Y-down target texture space.
    ///
    /// The V row and the U offset are negated; see [`MappingDefinition`].
    pub fn from_affine(affine: &Matrix3<Real>) -> Self {
        MappingDefinition {
            u_over_s: affine[(0, 0)],
            u_over_t: affine[(0, 1)],
            v_over_s: -affine[(1, 0)],
            v_over_t: -affine[(1, 1)],
            u_offset: -affine[(0, 2)],
            v_offset: affine[(1, 2)],
        }
    }

    /// Inverse of [`from_affine`](Self::from_affine).
    pub fn to_affine(&self) -> Matrix3<Real> {
        Matrix3::new(
            self.u_over_s, self.u_over_t, -self.u_offset,
            -self.v_over_s, -self.v_over_t, self.v_offset,
            0.0, 0.0, 1.0,
        )
    }

    /// Map planar coordinates into the solver's target space.
    pub fn target_coordinates(&self, planar: &Point2<Real>) -> Point2<Real> {
        self.to_affine().transform_point(planar)
    }

    /// Map planar coordinates `(s, t)` to the texture coordinate they were imported with.
    pub fn texture_coordinates(&self, planar: &Point2<Real>) -> Point2<Real> {
        Point2::new(
            self.u_over_s * planar.x + self.u_over_t * planar.y - self.u_offset,
            self.v_over_s * planar.x + self.v_over_t * planar.y - self.v_offset,
        )
    }
}

/// Default planar basis of a polygon: an origin on the plane and two unit in-plane axes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MappingVectors {
    pub origin: Point3<Real>,
    pub u: Vector3<Real>,
    pub v: Vector3<Real>,
    pub normal: Vector3<Real>,
}

impl MappingVectors {
    /// Build the basis for `plane`.
    ///
    /// The origin is the plane point nearest the world origin. For mostly
    /// horizontal planes `u` is derived from the Z axis, otherwise from Y, so an
    /// XY-facing plane maps `s` to +X and `t` to +Y.
    pub fn from_plane(plane: &Plane) -> Self {
        let normal = plane.normal;
        let helper = match plane.dominant_axis() {
            Axis::Y => Vector3::z(),
            Axis::X | Axis::Z => Vector3::y(),
        };
        let u = helper.cross(&normal).normalize();
        let v = normal.cross(&u).normalize();
        MappingVectors {
            origin: plane.project_point(&Point3::origin()),
            u,
            v,
            normal,
        }
    }

    /// Planar `(s, t)` coordinates of a point
    pub fn project(&self, point: &Point3<Real>) -> Point2<Real> {
        let offset = point - self.origin;
        Point2::new(self.u.dot(&offset), self.v.dot(&offset))
    }
}

/// Homogeneous matrix mapping the canonical basis `{(0,0),(1,0),(0,1)}` onto `basis`.
fn basis_matrix(basis: &UvBasis) -> Matrix3<Real> {
    let x: Vector2<Real> = basis[2] - basis[0];
    let y: Vector2<Real> = basis[1] - basis[0];
    let t = basis[0];
    Matrix3::new(
        x.x, y.x, t.x,
        x.y, y.y, t.y,
        0.0, 0.0, 1.0,
    )
}

/// `true` if the corners of `basis` are (nearly) collinear or not finite.
pub fn is_degenerate(basis: &UvBasis) -> bool {
    let x = basis[2] - basis[0];
    let y = basis[1] - basis[0];
    let area = x.perp(&y).abs();
    // written so that NaN anywhere counts as degenerate
    !(area > tolerance() * x.norm() * y.norm())
}

/// Solve the affine map taking `reference` corners to `target` corners.
///
/// Returns `None` when the reference corners are collinear or the result is
/// not finite.
pub fn solve_affine(reference: &UvBasis, target: &UvBasis) -> Option<Matrix3<Real>> {
    if is_degenerate(reference) {
        return None;
    }
    let to_identity = basis_matrix(reference).try_inverse()?;
    let affine = basis_matrix(target) * to_identity;
    affine.iter().all(|c| c.is_finite()).then_some(affine)
}

/// Mapping definition that takes a polygon's reference (planar) corners to
/// target texture corners given in Y-down texture space.
pub fn mapping_from_reference_to_target(
    reference: &UvBasis,
    target: &UvBasis,
) -> Option<MappingDefinition> {
    solve_affine(reference, target).map(|affine| MappingDefinition::from_affine(&affine))
}
