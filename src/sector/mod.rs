//! `Sector`: the destination geometry storage of one converted object.
//!
//! A sector owns flat arrays of vertices, edges, planes, polygons and
//! materials. Cross references are indices into those arrays.

use crate::float_types::{MAX_UV_CHANNELS, Real};
use crate::mapping::MappingDefinition;
use nalgebra::Point3;
use std::ops::{Deref, DerefMut};

pub mod builder;
pub mod plane;

pub use builder::SectorBuilder;
pub use plane::Plane;

/// Packed `0xRRGGBBAA` display color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Color(pub u32);

impl Color {
    /// Engine gray used for unnamed materials
    pub const GRAY: Color = Color(0x8080_8000);

    pub const fn from_rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Color(((r as u32) << 24) | ((g as u32) << 16) | ((b as u32) << 8) | a as u32)
    }

    /// Pack normalized RGBA components, clamping each to `0.0..=1.0`.
    pub fn from_rgba_f32(rgba: [f32; 4]) -> Self {
        let [r, g, b, a] = rgba.map(|c| (c.clamp(0.0, 1.0) * 255.0).round() as u8);
        Color::from_rgba(r, g, b, a)
    }

    pub const fn rgba(self) -> [u8; 4] {
        self.0.to_be_bytes()
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Vertex {
    pub pos: Point3<Real>,
}

impl Vertex {
    pub const fn new(pos: Point3<Real>) -> Self {
        Vertex { pos }
    }
}

/// Directed edge between two vertices of the same sector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Edge {
    pub start: usize,
    pub end: usize,
}

impl Edge {
    pub const fn new(start: usize, end: usize) -> Self {
        Edge { start, end }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Material {
    pub name: String,
    pub color: Color,
}

/// A triangular polygon of a sector.
#[derive(Debug, Clone, PartialEq)]
pub struct Polygon {
    /// Indices into [`Sector::edges`], in winding order
    pub edges: [usize; 3],
    /// Index into [`Sector::planes`]
    pub plane: usize,
    /// Index into [`Sector::materials`]
    pub material: usize,
    /// Inherited from the material
    pub color: Color,
    /// Per UV channel; `None` when the channel has no data
    pub mappings: [Option<MappingDefinition>; MAX_UV_CHANNELS],
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Sector {
    pub vertices: Vec<Vertex>,
    pub edges: Vec<Edge>,
    pub planes: Vec<Plane>,
    pub polygons: Vec<Polygon>,
    pub materials: Vec<Material>,
    lock_depth: usize,
}

impl Sector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pin all arrays; the matching [`unlock_all`](Self::unlock_all) releases them.
    pub fn lock_all(&mut self) {
        self.lock_depth += 1;
    }

    pub fn unlock_all(&mut self) {
        debug_assert!(self.lock_depth > 0, "unbalanced sector unlock");
        self.lock_depth = self.lock_depth.saturating_sub(1);
    }

    pub const fn is_locked(&self) -> bool {
        self.lock_depth > 0
    }

    /// Vertex indices of a polygon, taken from the start of each of its edges.
    pub fn polygon_vertex_indices(&self, polygon: usize) -> Option<[usize; 3]> {
        let polygon = self.polygons.get(polygon)?;
        let mut corners = [0; 3];
        for (corner, &edge) in corners.iter_mut().zip(polygon.edges.iter()) {
            *corner = self.edges.get(edge)?.start;
        }
        Some(corners)
    }

    /// Vertex positions of a polygon.
    pub fn polygon_positions(&self, polygon: usize) -> Option<[Point3<Real>; 3]> {
        let [a, b, c] = self.polygon_vertex_indices(polygon)?;
        Some([
            self.vertices.get(a)?.pos,
            self.vertices.get(b)?.pos,
            self.vertices.get(c)?.pos,
        ])
    }
}

/// Scope guard holding a sector's arrays locked; unlocks on drop, including unwinding.
pub struct SectorLock<'a> {
    sector: &'a mut Sector,
}

impl<'a> SectorLock<'a> {
    pub fn new(sector: &'a mut Sector) -> Self {
        sector.lock_all();
        SectorLock { sector }
    }
}

impl Deref for SectorLock<'_> {
    type Target = Sector;

    fn deref(&self) -> &Sector {
        self.sector
    }
}

impl DerefMut for SectorLock<'_> {
    fn deref_mut(&mut self) -> &mut Sector {
        self.sector
    }
}

impl Drop for SectorLock<'_> {
    fn drop(&mut self) {
        self.sector.unlock_all();
    }
}

/// Container of converted sectors.
#[derive(Debug, Default)]
pub struct Object3D {
    pub sectors: Vec<Sector>,
}

impl Object3D {
    pub fn new() -> Self {
        Self::default()
    }
}
