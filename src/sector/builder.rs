//! Materializes a [`Sector`] from a filled [`ConversionContext`].

use super::{Color, Edge, Material, Plane, Polygon, Sector, SectorLock, Vertex};
use crate::convert::{ConversionContext, ConversionTriangle};
use crate::errors::ConversionError;
use crate::float_types::{MAX_UV_CHANNELS, Real};
use crate::mapping::{MappingDefinition, MappingVectors, UvBasis, mapping_from_reference_to_target};
use crate::options::DegenerateMappingPolicy;
use nalgebra::{Point2, Point3};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Plane and per-channel mappings of one triangle, computed independently of the others.
type TriangleSurface = (Plane, [Option<MappingDefinition>; MAX_UV_CHANNELS]);

#[derive(Debug, Clone, Copy, Default)]
pub struct SectorBuilder {
    degenerate_mappings: DegenerateMappingPolicy,
}

impl SectorBuilder {
    pub const fn new(degenerate_mappings: DegenerateMappingPolicy) -> Self {
        SectorBuilder {
            degenerate_mappings,
        }
    }

    /// Build a new sector: vertices, materials, then per triangle three
    /// unshared edges, a plane, a polygon and its UV mappings.
    pub fn build(&self, context: &ConversionContext) -> Result<Sector, ConversionError> {
        let mut sector = Sector::new();
        self.build_into(context, &mut sector)?;
        log::debug!(
            "Built sector: {} vertices, {} edges, {} polygons, {} materials",
            sector.vertices.len(),
            sector.edges.len(),
            sector.polygons.len(),
            sector.materials.len()
        );
        Ok(sector)
    }

    /// Replace the contents of `sector` with the converted geometry.
    ///
    /// Everything is computed before the sector is touched, so on error
    /// `sector` keeps its previous contents. The arrays are written under a
    /// [`SectorLock`].
    pub fn build_into(&self, context: &ConversionContext, sector: &mut Sector) -> Result<(), ConversionError> {
        let vertices: Vec<Vertex> = context
            .vertices
            .iter()
            .map(|v| Vertex::new(v.cast::<Real>().into()))
            .collect();

        let materials: Vec<Material> = context
            .materials
            .iter()
            .map(|material| Material {
                name: material.name.clone(),
                color: material.color,
            })
            .collect();

        let surfaces = self.triangle_surfaces(context, &vertices)?;

        let triangle_count = context.triangles.len();
        let mut edges = Vec::with_capacity(triangle_count * 3);
        let mut planes = Vec::with_capacity(triangle_count);
        let mut polygons = Vec::with_capacity(triangle_count);

        for (triangle, (plane, mappings)) in context.triangles.iter().zip(surfaces) {
            let [a, b, c] = triangle.vertices;
            let first_edge = edges.len();
            edges.extend([Edge::new(a, b), Edge::new(b, c), Edge::new(c, a)]);

            let plane_index = planes.len();
            planes.push(plane);

            let color = materials
                .get(triangle.material)
                .map_or(Color::GRAY, |material| material.color);
            polygons.push(Polygon {
                edges: [first_edge, first_edge + 1, first_edge + 2],
                plane: plane_index,
                material: triangle.material,
                color,
                mappings,
            });
        }

        let mut sector = SectorLock::new(sector);
        sector.vertices = vertices;
        sector.materials = materials;
        sector.edges = edges;
        sector.planes = planes;
        sector.polygons = polygons;
        Ok(())
    }

    #[cfg(not(feature = "parallel"))]
    fn triangle_surfaces(
        &self,
        context: &ConversionContext,
        vertices: &[Vertex],
    ) -> Result<Vec<TriangleSurface>, ConversionError> {
        context
            .triangles
            .iter()
            .enumerate()
            .map(|(index, triangle)| self.triangle_surface(context, vertices, index, triangle))
            .collect()
    }

    #[cfg(feature = "parallel")]
    fn triangle_surfaces(
        &self,
        context: &ConversionContext,
        vertices: &[Vertex],
    ) -> Result<Vec<TriangleSurface>, ConversionError> {
        context
            .triangles
            .par_iter()
            .enumerate()
            .map(|(index, triangle)| self.triangle_surface(context, vertices, index, triangle))
            .collect()
    }

    fn triangle_surface(
        &self,
        context: &ConversionContext,
        vertices: &[Vertex],
        index: usize,
        triangle: &ConversionTriangle,
    ) -> Result<TriangleSurface, ConversionError> {
        let corners: [Point3<Real>; 3] = triangle.vertices.map(|v| vertices[v].pos);
        let plane = Plane::from_points(corners[0], corners[1], corners[2]);

        // default planar projection of the corners is the reference basis
        let vectors = MappingVectors::from_plane(&plane);
        let reference: UvBasis = corners.map(|corner| vectors.project(&corner));

        let mut mappings = [None; MAX_UV_CHANNELS];
        for channel in context.active_channels() {
            let Some(tex) = triangle.tex_vertices[channel] else {
                continue;
            };
            let uvs = &context.tex_vertices[channel];
            let target: UvBasis = tex.map(|t| {
                let uv = uvs[t];
                Point2::new(uv.x as Real, -(uv.y as Real))
            });

            mappings[channel] = match mapping_from_reference_to_target(&reference, &target) {
                Some(mapping) => Some(mapping),
                None => match self.degenerate_mappings {
                    DegenerateMappingPolicy::Reject => {
                        return Err(ConversionError::DegenerateMapping {
                            triangle: index,
                            channel,
                        });
                    }
                    DegenerateMappingPolicy::Identity => {
                        log::warn!(
                            "Triangle {index} has no UV mapping basis in channel {channel}, using identity"
                        );
                        Some(MappingDefinition::default())
                    }
                },
            };
        }

        Ok((plane, mappings))
    }
}
