//! Imported scene model and the importer collaborator.
//!
//! The converter never parses a file format itself. A [`SceneImporter`]
//! reads the file and hands back a [`Scene`]: meshes of single-precision
//! positions, up to [`MAX_UV_CHANNELS`] UV channels, triangle faces and a
//! material index, plus the material table.

use crate::errors::BoxError;
use crate::float_types::{ImportReal, MAX_UV_CHANNELS};
use nalgebra::Vector3;
use std::path::PathBuf;

/// A loaded 3D asset as delivered by the importer.
#[derive(Debug, Clone, Default)]
pub struct Scene {
    pub meshes: Vec<SceneMesh>,
    pub materials: Vec<SceneMaterial>,
}

/// One mesh of a [`Scene`].
#[derive(Debug, Clone, Default)]
pub struct SceneMesh {
    /// Vertex positions
    pub positions: Vec<Vector3<ImportReal>>,
    /// Per-channel UV coordinates, one per vertex. `z` is carried but ignored.
    pub uv_channels: [Option<Vec<Vector3<ImportReal>>>; MAX_UV_CHANNELS],
    /// Triangulated faces, as indices into `positions`
    pub faces: Vec<[u32; 3]>,
    /// Index into [`Scene::materials`]
    pub material_index: usize,
}

impl SceneMesh {
    pub fn new(positions: Vec<Vector3<ImportReal>>, faces: Vec<[u32; 3]>, material_index: usize) -> Self {
        SceneMesh {
            positions,
            uv_channels: Default::default(),
            faces,
            material_index,
        }
    }

    /// Attach UV coordinates to `channel`.
    pub fn with_uv_channel(mut self, channel: usize, uvs: Vec<Vector3<ImportReal>>) -> Self {
        self.uv_channels[channel] = Some(uvs);
        self
    }

    pub fn has_faces(&self) -> bool {
        !self.faces.is_empty()
    }

    pub fn has_uv_channel(&self, channel: usize) -> bool {
        self.uv_channels
            .get(channel)
            .is_some_and(|uvs| uvs.is_some())
    }

    pub fn uv_channel(&self, channel: usize) -> Option<&[Vector3<ImportReal>]> {
        self.uv_channels.get(channel)?.as_deref()
    }
}

/// A material of a [`Scene`]. Only name and diffuse color are captured.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SceneMaterial {
    pub name: String,
    /// Diffuse RGBA in `0.0..=1.0`, when the source format carries one
    pub diffuse: Option<[ImportReal; 4]>,
}

impl SceneMaterial {
    pub fn named(name: impl Into<String>) -> Self {
        SceneMaterial {
            name: name.into(),
            diffuse: None,
        }
    }

    pub fn with_diffuse(mut self, rgba: [ImportReal; 4]) -> Self {
        self.diffuse = Some(rgba);
        self
    }
}

impl Scene {
    pub fn total_faces(&self) -> usize {
        self.meshes.iter().map(|mesh| mesh.faces.len()).sum()
    }

    /// `true` if at least one mesh carries UV coordinates in any channel.
    pub fn has_any_uv_data(&self) -> bool {
        self.meshes
            .iter()
            .flat_map(|mesh| mesh.uv_channels.iter())
            .any(|channel| channel.as_ref().is_some_and(|uvs| !uvs.is_empty()))
    }
}

/// Post-processing the converter relies on the importer to perform.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PostProcess {
    pub join_identical_vertices: bool,
    pub triangulate: bool,
    pub pre_transform_vertices: bool,
    pub generate_uv_coords: bool,
    /// Normals are recomputed from planes, so the importer should not read them
    pub remove_normals: bool,
    pub flip_uvs: bool,
}

impl Default for PostProcess {
    fn default() -> Self {
        PostProcess {
            join_identical_vertices: true,
            triangulate: true,
            pre_transform_vertices: true,
            generate_uv_coords: true,
            remove_normals: true,
            flip_uvs: true,
        }
    }
}

/// What the converter asks the importer to load.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportRequest {
    pub path: PathBuf,
    pub post_process: PostProcess,
}

/// A file format the importer understands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImporterDescription {
    pub name: String,
    /// Whitespace-separated extensions without dots, e.g. `"obj 3ds"`
    pub extensions: String,
}

/// External 3D file importer.
pub trait SceneImporter {
    /// Reads and post-processes one file.
    fn read_scene(&self, request: &ImportRequest) -> Result<Scene, BoxError>;

    /// Formats this importer can read.
    fn importers(&self) -> Vec<ImporterDescription>;

    /// Called once when an [`ImportSession`](crate::session::ImportSession) opens.
    fn begin_batch(&self) {}

    /// Called once when an [`ImportSession`](crate::session::ImportSession) closes.
    fn end_batch(&self) {}
}

/// File-dialog filter entry: `label` is `"Name (*.a;*.b)"`, `pattern` is `"*.a;*.b"`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormatDescriptor {
    pub label: String,
    pub pattern: String,
}

/// List the formats of `importer`, sorted by label.
pub fn supported_formats<I: SceneImporter + ?Sized>(importer: &I) -> Vec<FormatDescriptor> {
    let mut formats: Vec<FormatDescriptor> = importer
        .importers()
        .into_iter()
        .map(|description| {
            let pattern = description
                .extensions
                .split_whitespace()
                .map(|extension| format!("*.{extension}"))
                .collect::<Vec<_>>()
                .join(";");
            FormatDescriptor {
                label: format!("{} ({})", description.name, pattern),
                pattern,
            }
        })
        .collect();
    formats.sort_by(|lhs, rhs| lhs.label.cmp(&rhs.label));
    formats
}
