//! Per-material vertex re-indexing for opened and unwrapped export.
//!
//! Each material group gets its own dense block of vertices, numbered in
//! first-use order inside the group and placed after the blocks of earlier
//! groups. A position used by two groups ends up in two slots.

use super::ConversionContext;
use crate::errors::ConversionError;
use crate::float_types::ImportReal;
use crate::options::ExportMode;
use hashbrown::HashMap;
use nalgebra::Vector3;

/// Apply the re-indexing selected by `mode`; [`ExportMode::Normal`] leaves the context alone.
pub fn remap_surfaces(context: &mut ConversionContext, mode: ExportMode) -> Result<(), ConversionError> {
    match mode {
        ExportMode::Normal => Ok(()),
        ExportMode::Opened => {
            open_surfaces(context);
            Ok(())
        }
        ExportMode::Unwrapped => unwrap_surfaces(context),
    }
}

/// Give every material group its own copy of the vertices it uses.
pub fn open_surfaces(context: &mut ConversionContext) {
    let source = std::mem::take(&mut context.vertices);
    let vertices = reindex(context, |triangle| triangle.vertices, |index| source[index]);
    context.vertices = vertices;
    log::debug!(
        "Opened {} material surfaces into {} vertices",
        context.materials.len(),
        context.vertices.len()
    );
}

/// Replace geometry with the UV layout: one vertex per UV coordinate used by a
/// group, positioned at `(u, -v, 0)`.
///
/// Uses the first channel with data. Triangles without data in that channel
/// keep their corners in place.
pub fn unwrap_surfaces(context: &mut ConversionContext) -> Result<(), ConversionError> {
    let channel = context.active_channels().next().ok_or(ConversionError::NoUvData)?;
    let uvs = std::mem::take(&mut context.tex_vertices[channel]);
    let positions = std::mem::take(&mut context.vertices);

    // Tex indices and vertex indices live in different spaces, so keys are tagged.
    let vertices = reindex(
        context,
        |triangle| match triangle.tex_vertices[channel] {
            Some(tex) => tex.map(UnwrapKey::Uv),
            None => triangle.vertices.map(UnwrapKey::Position),
        },
        |key| match key {
            UnwrapKey::Uv(index) => {
                let uv = uvs[index];
                Vector3::new(uv.x, -uv.y, 0.0)
            }
            UnwrapKey::Position(index) => positions[index],
        },
    );

    context.vertices = vertices;
    context.tex_vertices[channel] = uvs;
    log::debug!(
        "Unwrapped UV channel {channel} into {} vertices",
        context.vertices.len()
    );
    Ok(())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum UnwrapKey {
    Uv(usize),
    Position(usize),
}

/// Shared two-pass re-indexing.
///
/// Pass one numbers the keys each group references; pass two writes the new
/// vertex values and rewrites triangle corners to `local index + group offset`.
fn reindex<K, F, V>(context: &mut ConversionContext, corner_keys: F, value_of: V) -> Vec<Vector3<ImportReal>>
where
    K: Copy + Eq + std::hash::Hash,
    F: Fn(&super::ConversionTriangle) -> [K; 3],
    V: Fn(K) -> Vector3<ImportReal>,
{
    let mut destination = Vec::new();

    for material in &context.materials {
        let offset = destination.len();
        let mut local: HashMap<K, usize> = HashMap::new();
        let mut ordered_keys = Vec::new();

        for &triangle in &material.triangles {
            for key in corner_keys(&context.triangles[triangle]) {
                local.entry(key).or_insert_with(|| {
                    ordered_keys.push(key);
                    ordered_keys.len() - 1
                });
            }
        }

        destination.extend(ordered_keys.iter().map(|&key| value_of(key)));

        for &triangle in &material.triangles {
            let keys = corner_keys(&context.triangles[triangle]);
            context.triangles[triangle].vertices = keys.map(|key| local[&key] + offset);
        }
    }

    destination
}
