//! Scene checks run before any conversion work.

use crate::errors::ConversionError;
use crate::float_types::ImportReal;
use crate::options::{ConversionOptions, ExportMode};
use crate::scene::Scene;
use nalgebra::Vector3;

/// Reject scenes the pipeline cannot convert.
///
/// In order: unwrapped mode without any UV data, structurally broken meshes,
/// then a scene where not every mesh with faces has channel-0 UVs (or no mesh
/// has faces at all).
pub fn validate_scene(scene: &Scene, options: &ConversionOptions) -> Result<(), ConversionError> {
    if options.mode == ExportMode::Unwrapped && !scene.has_any_uv_data() {
        return Err(ConversionError::NoUvData);
    }

    for (index, mesh) in scene.meshes.iter().enumerate() {
        if mesh.has_faces() && mesh.material_index >= scene.materials.len() {
            return Err(ConversionError::invalid_scene(
                index,
                format!(
                    "material index {} out of range ({} materials)",
                    mesh.material_index,
                    scene.materials.len()
                ),
            ));
        }
        if let Some(face) = mesh
            .faces
            .iter()
            .find(|face| face.iter().any(|&i| i as usize >= mesh.positions.len()))
        {
            return Err(ConversionError::invalid_scene(
                index,
                format!("face {face:?} references a missing vertex ({} vertices)", mesh.positions.len()),
            ));
        }
        if let Some(vertex) = first_non_finite(&mesh.positions) {
            return Err(ConversionError::invalid_scene(
                index,
                format!("position {vertex} is not finite"),
            ));
        }
        for (channel, uvs) in mesh.uv_channels.iter().enumerate() {
            if let Some(uvs) = uvs {
                if uvs.len() != mesh.positions.len() {
                    return Err(ConversionError::invalid_scene(
                        index,
                        format!(
                            "UV channel {channel} has {} coordinates for {} vertices",
                            uvs.len(),
                            mesh.positions.len()
                        ),
                    ));
                }
                if let Some(vertex) = first_non_finite(uvs) {
                    return Err(ConversionError::invalid_scene(
                        index,
                        format!("UV channel {channel} coordinate {vertex} is not finite"),
                    ));
                }
            }
        }
    }

    let with_faces = scene.meshes.iter().filter(|mesh| mesh.has_faces());
    let mut non_empty = 0;
    for mesh in with_faces {
        if !mesh.has_uv_channel(0) {
            return Err(ConversionError::MissingPrimaryUv);
        }
        non_empty += 1;
    }
    if non_empty == 0 {
        return Err(ConversionError::MissingPrimaryUv);
    }
    Ok(())
}

/// Index of the first coordinate with a NaN or infinite component.
pub(crate) fn first_non_finite(coords: &[Vector3<ImportReal>]) -> Option<usize> {
    coords.iter().position(|c| !c.iter().all(|x| x.is_finite()))
}
