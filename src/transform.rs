//! Import transform and orientation detection.

use crate::float_types::ImportReal;
use nalgebra::{Matrix3, Matrix4, Point3, Vector3};

/// Caller-supplied transform applied to every imported position.
///
/// Built from either a 3x3 linear matrix or a 4x4 affine matrix. Only the
/// 3x3 linear part decides orientation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ImportTransform {
    matrix: Matrix4<ImportReal>,
}

impl Default for ImportTransform {
    fn default() -> Self {
        Self::identity()
    }
}

impl From<Matrix3<ImportReal>> for ImportTransform {
    fn from(linear: Matrix3<ImportReal>) -> Self {
        ImportTransform {
            matrix: linear.to_homogeneous(),
        }
    }
}

impl From<Matrix4<ImportReal>> for ImportTransform {
    fn from(matrix: Matrix4<ImportReal>) -> Self {
        ImportTransform { matrix }
    }
}

impl ImportTransform {
    pub fn identity() -> Self {
        ImportTransform {
            matrix: Matrix4::identity(),
        }
    }

    /// Uniform or non-uniform scale along the axes.
    pub fn scaling(x: ImportReal, y: ImportReal, z: ImportReal) -> Self {
        Matrix3::from_diagonal(&Vector3::new(x, y, z)).into()
    }

    /// The 3x3 linear part.
    pub fn linear_part(&self) -> Matrix3<ImportReal> {
        self.matrix.fixed_view::<3, 3>(0, 0).into_owned()
    }

    pub fn determinant(&self) -> ImportReal {
        self.linear_part().determinant()
    }

    /// `true` when the transform mirrors space, so triangle winding has to be reversed
    /// to keep faces pointing outward.
    pub fn is_mirroring(&self) -> bool {
        self.determinant() < 0.0
    }

    /// Transform a position, then flip Y and Z into the destination axis convention.
    pub fn to_destination(&self, position: &Vector3<ImportReal>) -> Vector3<ImportReal> {
        let p = self
            .matrix
            .transform_point(&Point3::from(*position))
            .coords;
        Vector3::new(p.x, -p.y, -p.z)
    }
}

/// Corner order for every emitted triangle, decided once per conversion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Winding {
    Preserve,
    Reverse,
}

impl Winding {
    pub fn for_transform(transform: &ImportTransform) -> Self {
        if transform.is_mirroring() {
            Winding::Reverse
        } else {
            Winding::Preserve
        }
    }

    /// Apply this winding to a corner triple.
    #[inline]
    pub fn order<T: Copy>(self, corners: [T; 3]) -> [T; 3] {
        match self {
            Winding::Preserve => corners,
            Winding::Reverse => [corners[2], corners[1], corners[0]],
        }
    }
}
