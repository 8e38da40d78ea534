//! Triangle emission and material grouping.

use super::{ConversionMaterial, ConversionTriangle};
use crate::float_types::MAX_UV_CHANNELS;
use crate::options::ConversionOptions;
use crate::scene::Scene;
use crate::sector::Color;
use crate::transform::Winding;
use hashbrown::HashMap;

/// Name given to materials whose source name is empty or a single character
pub const DEFAULT_MATERIAL_NAME: &str = "Default";

/// Per-mesh lookup from source indices to deduplicated indices.
#[derive(Debug, Clone, Default)]
pub struct SceneRemap {
    /// `vertices[mesh][vertex]` is the unique vertex index
    pub vertices: Vec<Vec<usize>>,
    /// `tex_vertices[channel][mesh]` maps mesh vertices to unique UV indices,
    /// `None` if the mesh has no data in the channel
    pub tex_vertices: [Vec<Option<Vec<usize>>>; MAX_UV_CHANNELS],
}

/// Color for a material first seen on mesh `mesh_index` of `mesh_count`,
/// spread over the whole color range.
pub fn synthetic_color(mesh_index: usize, mesh_count: usize) -> Color {
    let coefficient = (mesh_index + 1) as f64 / mesh_count.max(1) as f64;
    Color((u32::MAX as f64 * coefficient) as u32)
}

/// Emit one triangle per face and assign each to a material group.
///
/// Groups are created on the first triangle that uses a new source material
/// index and keep first-seen order.
pub fn group_triangles(
    scene: &Scene,
    remap: &SceneRemap,
    winding: Winding,
    options: &ConversionOptions,
) -> (Vec<ConversionTriangle>, Vec<ConversionMaterial>) {
    let mut triangles = Vec::with_capacity(scene.total_faces());
    let mut materials: Vec<ConversionMaterial> = Vec::new();
    let mut group_of_tag: HashMap<usize, usize> = HashMap::new();

    for (mesh_index, mesh) in scene.meshes.iter().enumerate() {
        let vertex_remap = &remap.vertices[mesh_index];

        for &face in &mesh.faces {
            let corners = winding.order(face.map(|i| i as usize));

            let mut tex_vertices = [None; MAX_UV_CHANNELS];
            for (channel, slot) in tex_vertices.iter_mut().enumerate() {
                let Some(Some(tex_remap)) = remap.tex_vertices[channel].get(mesh_index) else {
                    continue;
                };
                *slot = Some(corners.map(|corner| tex_remap[corner]));
            }

            let triangle_index = triangles.len();
            let material = *group_of_tag.entry(mesh.material_index).or_insert_with(|| {
                materials.push(new_material(scene, mesh_index, options));
                materials.len() - 1
            });
            materials[material].triangles.push(triangle_index);

            triangles.push(ConversionTriangle {
                vertices: corners.map(|corner| vertex_remap[corner]),
                tex_vertices,
                material,
            });
        }
    }

    (triangles, materials)
}

fn new_material(scene: &Scene, mesh_index: usize, options: &ConversionOptions) -> ConversionMaterial {
    let tag = scene.meshes[mesh_index].material_index;
    let source = &scene.materials[tag];

    let (name, color) = if source.name.len() > 1 {
        let color = match source.diffuse {
            Some(diffuse) if options.variant.uses_diffuse_color() => Color::from_rgba_f32(diffuse),
            _ => synthetic_color(mesh_index, scene.meshes.len()),
        };
        (source.name.clone(), color)
    } else {
        (DEFAULT_MATERIAL_NAME.to_owned(), Color::GRAY)
    };

    log::trace!("New material group {name:?} for source material {tag}");

    ConversionMaterial {
        tag,
        name,
        color,
        triangles: Vec::new(),
    }
}
