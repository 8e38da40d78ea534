//! Scene → sector conversion pipeline.
//!
//! A [`ConversionContext`] holds all intermediate state of one conversion and
//! is dropped when the sector is built, so conversions never share state.
//!
//! Stages, in order:
//! 1. [`validate_scene`]
//! 2. [`Winding`] from the transform determinant
//! 3. unique positions, then unique UV coordinates per channel ([`dedup`])
//! 4. triangles grouped per material ([`grouper`])
//! 5. optional per-material re-indexing ([`remap`])
//! 6. [`SectorBuilder`]

use crate::errors::ConversionError;
use crate::float_types::{ImportReal, MAX_UV_CHANNELS};
use crate::options::ConversionOptions;
use crate::scene::Scene;
use crate::sector::{Color, Sector, SectorBuilder};
use crate::transform::{ImportTransform, Winding};
use nalgebra::{Point2, Vector3};

pub mod dedup;
pub mod grouper;
pub mod remap;
pub mod validate;

pub use dedup::UniqueCoords;
pub use validate::validate_scene;

/// One output triangle, as indices into the context's arrays.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConversionTriangle {
    /// Indices into [`ConversionContext::vertices`]
    pub vertices: [usize; 3],
    /// Per channel, indices into [`ConversionContext::tex_vertices`];
    /// `None` when the source mesh has no data in that channel
    pub tex_vertices: [Option<[usize; 3]>; MAX_UV_CHANNELS],
    /// Index into [`ConversionContext::materials`]
    pub material: usize,
}

/// A material group: every triangle whose source mesh used the same material index.
#[derive(Debug, Clone, PartialEq)]
pub struct ConversionMaterial {
    /// Source material index this group was created for
    pub tag: usize,
    pub name: String,
    pub color: Color,
    /// Triangle indices, in scene traversal order
    pub triangles: Vec<usize>,
}

/// Intermediate arrays of one conversion.
#[derive(Debug, Clone, Default)]
pub struct ConversionContext {
    /// Transformed unique positions
    pub vertices: Vec<Vector3<ImportReal>>,
    /// Unique UV coordinates per channel; empty when no mesh has the channel
    pub tex_vertices: [Vec<Point2<ImportReal>>; MAX_UV_CHANNELS],
    pub triangles: Vec<ConversionTriangle>,
    pub materials: Vec<ConversionMaterial>,
}

impl ConversionContext {
    /// Run validation, deduplication and grouping over `scene`.
    pub fn fill(
        scene: &Scene,
        transform: &ImportTransform,
        options: &ConversionOptions,
    ) -> Result<Self, ConversionError> {
        validate_scene(scene, options)?;

        let winding = Winding::for_transform(transform);
        if winding == Winding::Reverse {
            log::debug!("Transform mirrors space, reversing triangle winding");
        }

        let mut unique_vertices = UniqueCoords::new();
        let vertex_remap = scene
            .meshes
            .iter()
            .map(|mesh| {
                mesh.positions
                    .iter()
                    .map(|position| unique_vertices.insert(position))
                    .collect::<Vec<_>>()
            })
            .collect::<Vec<_>>();
        let vertices = unique_vertices
            .as_slice()
            .iter()
            .map(|position| transform.to_destination(position))
            .collect::<Vec<_>>();
        if let Some(unique) = validate::first_non_finite(&vertices) {
            let mesh = vertex_remap
                .iter()
                .position(|remap| remap.contains(&unique))
                .unwrap_or_default();
            return Err(ConversionError::invalid_scene(
                mesh,
                format!("position overflows under the import transform (vertex {unique})"),
            ));
        }

        let mut tex_remap: [Vec<Option<Vec<usize>>>; MAX_UV_CHANNELS] = Default::default();
        let mut tex_vertices: [Vec<Point2<ImportReal>>; MAX_UV_CHANNELS] = Default::default();
        let v_offset = options.variant.v_offset();
        for channel in 0..options.variant.uv_channels() {
            let mut unique = UniqueCoords::new();
            tex_remap[channel] = scene
                .meshes
                .iter()
                .map(|mesh| {
                    mesh.uv_channel(channel)
                        .map(|uvs| uvs.iter().map(|uv| unique.insert(uv)).collect::<Vec<_>>())
                })
                .collect();
            tex_vertices[channel] = unique
                .as_slice()
                .iter()
                .map(|uv| Point2::new(uv.x, uv.y + v_offset))
                .collect();
        }

        log::debug!(
            "Deduplicated {} unique vertices, UV coordinates per channel {:?}",
            vertices.len(),
            tex_vertices.each_ref().map(Vec::len)
        );

        let remap = grouper::SceneRemap {
            vertices: vertex_remap,
            tex_vertices: tex_remap,
        };
        let (triangles, materials) = grouper::group_triangles(scene, &remap, winding, options);

        log::debug!(
            "Grouped {} triangles into {} materials",
            triangles.len(),
            materials.len()
        );

        Ok(ConversionContext {
            vertices,
            tex_vertices,
            triangles,
            materials,
        })
    }

    /// Channels that received any UV coordinates.
    pub fn active_channels(&self) -> impl Iterator<Item = usize> + '_ {
        (0..MAX_UV_CHANNELS).filter(|&channel| !self.tex_vertices[channel].is_empty())
    }
}

/// Convert one scene into a new sector.
pub fn convert_scene(
    scene: &Scene,
    transform: &ImportTransform,
    options: &ConversionOptions,
) -> Result<Sector, ConversionError> {
    let mut context = ConversionContext::fill(scene, transform, options)?;
    remap::remap_surfaces(&mut context, options.mode)?;
    SectorBuilder::new(options.degenerate_mappings).build(&context)
}
