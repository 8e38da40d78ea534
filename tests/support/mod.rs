//! Test support library
//! Scene builders, a scripted importer and float comparison helpers.
#![allow(dead_code)]

use nalgebra::Vector3;
use o3d_convert::errors::BoxError;
use o3d_convert::float_types::Real;
use o3d_convert::scene::{ImportRequest, ImporterDescription, Scene, SceneImporter, SceneMaterial, SceneMesh};
use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::path::PathBuf;

/// Quick helper to compare floating-point results with an acceptable tolerance.
pub fn approx_eq(a: Real, b: Real, eps: Real) -> bool {
    (a - b).abs() < eps
}

pub fn v3(x: f32, y: f32, z: f32) -> Vector3<f32> {
    Vector3::new(x, y, z)
}

/// UV coordinate as the importer stores it (z unused).
pub fn uv(u: f32, v: f32) -> Vector3<f32> {
    Vector3::new(u, v, 0.0)
}

/// A mesh of independent triangles: every face gets three fresh vertex slots.
pub fn triangle_soup(
    triangles: &[[Vector3<f32>; 3]],
    uvs: &[[Vector3<f32>; 3]],
    material_index: usize,
) -> SceneMesh {
    let positions: Vec<_> = triangles.iter().flatten().copied().collect();
    let faces = (0..triangles.len() as u32)
        .map(|t| [t * 3, t * 3 + 1, t * 3 + 2])
        .collect();
    let coords: Vec<_> = uvs.iter().flatten().copied().collect();
    SceneMesh::new(positions, faces, material_index).with_uv_channel(0, coords)
}

/// Two triangles forming the unit square in the XY plane, sharing the 1-2 diagonal.
pub fn unit_quad(material_index: usize) -> SceneMesh {
    SceneMesh::new(
        vec![v3(0.0, 0.0, 0.0), v3(1.0, 0.0, 0.0), v3(0.0, 1.0, 0.0), v3(1.0, 1.0, 0.0)],
        vec![[0, 1, 2], [2, 1, 3]],
        material_index,
    )
    .with_uv_channel(0, vec![uv(0.0, 0.0), uv(1.0, 0.0), uv(0.0, 1.0), uv(1.0, 1.0)])
}

pub fn scene(meshes: Vec<SceneMesh>, material_names: &[&str]) -> Scene {
    Scene {
        meshes,
        materials: material_names.iter().map(|name| SceneMaterial::named(*name)).collect(),
    }
}

/// Importer serving scenes from memory and recording how it was driven.
#[derive(Default)]
pub struct ScriptedImporter {
    pub scenes: HashMap<PathBuf, Scene>,
    pub requests: RefCell<Vec<ImportRequest>>,
    pub batches_started: Cell<usize>,
    pub batches_ended: Cell<usize>,
}

impl ScriptedImporter {
    pub fn with_scene(mut self, path: impl Into<PathBuf>, scene: Scene) -> Self {
        self.scenes.insert(path.into(), scene);
        self
    }
}

impl SceneImporter for ScriptedImporter {
    fn read_scene(&self, request: &ImportRequest) -> Result<Scene, BoxError> {
        self.requests.borrow_mut().push(request.clone());
        self.scenes
            .get(&request.path)
            .cloned()
            .ok_or_else(|| format!("no such file: {}", request.path.display()).into())
    }

    fn importers(&self) -> Vec<ImporterDescription> {
        vec![ImporterDescription {
            name: "Scripted".into(),
            extensions: "mem".into(),
        }]
    }

    fn begin_batch(&self) {
        self.batches_started.set(self.batches_started.get() + 1);
    }

    fn end_batch(&self) {
        self.batches_ended.set(self.batches_ended.get() + 1);
    }
}
