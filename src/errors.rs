//! Conversion errors

use std::path::PathBuf;

/// Boxed error returned by a [`SceneImporter`](crate::scene::SceneImporter).
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Everything that can abort a conversion.
///
/// A conversion either produces a whole sector or fails with one of these;
/// there is no partial result.
#[derive(Debug, thiserror::Error)]
pub enum ConversionError {
    /// The importer produced no usable scene for the file
    #[error("Unable to load 3D object: {}", .path.display())]
    Load {
        path: PathBuf,
        #[source]
        source: Option<BoxError>,
    },

    /// A mesh with faces has no UV coordinates in channel 0, or no mesh has faces at all
    #[error("UV map must be in channel 0")]
    MissingPrimaryUv,

    /// Unwrapped export was requested for a scene without any UV coordinates
    #[error("Unwrapped export requires UV coordinates, but the scene has none")]
    NoUvData,

    /// The scene contradicts itself (bad indices, mismatched channel lengths)
    #[error("Mesh {mesh} is malformed: {reason}")]
    InvalidScene { mesh: usize, reason: String },

    /// The planar projection of a triangle is collinear, so no UV mapping exists for it
    #[error("Triangle {triangle} has a degenerate mapping basis in UV channel {channel}")]
    DegenerateMapping { triangle: usize, channel: usize },
}

impl ConversionError {
    pub(crate) fn invalid_scene(mesh: usize, reason: impl Into<String>) -> Self {
        ConversionError::InvalidScene {
            mesh,
            reason: reason.into(),
        }
    }
}
