// Output geometry is double precision; imported scene data is single precision.
pub type Real = f64;
pub type ImportReal = f32;

use core::str::FromStr;
use std::sync::OnceLock;

/// Maximum number of UV channels a polygon can carry a mapping for.
pub const MAX_UV_CHANNELS: usize = 3;

/// Lazily-initialized tolerance used for degenerate mapping-basis detection.
/// Can be overridden:
///  1) **Build-time**: set env var `O3D_TOLERANCE` (e.g. `O3D_TOLERANCE=1e-9 cargo build`)
///  2) **Runtime**: call [`set_tolerance`] once before converting anything
static TOLERANCE_CELL: OnceLock<Real> = OnceLock::new();

#[inline]
const fn default_tolerance() -> Real {
    1e-6
}

/// Returns the current tolerance value.
/// If not set yet, it tries `O3D_TOLERANCE` (parsed as `Real`) and
/// falls back to a sensible default.
pub fn tolerance() -> Real {
    *TOLERANCE_CELL.get_or_init(|| {
        if let Some(environment_variable) = option_env!("O3D_TOLERANCE") {
            if let Ok(value) = Real::from_str(environment_variable) {
                return value.max(Real::EPSILON);
            }
        }
        default_tolerance()
    })
}

/// Set the tolerance programmatically once (subsequent calls are ignored).
pub fn set_tolerance(value: Real) {
    let _ = TOLERANCE_CELL.set(value.max(Real::EPSILON));
}
