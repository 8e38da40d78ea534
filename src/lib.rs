//! Converts imported triangle scenes into **Object3D sectors**: deduplicated
//! vertices, per-triangle edges, planar polygons with affine UV
//! [mapping definitions](mapping::MappingDefinition), and materials.
//!
//! File parsing is delegated to a [`SceneImporter`](scene::SceneImporter).
//! The crate takes the [`Scene`](scene::Scene) it returns through validation,
//! deduplication, material grouping, an optional per-material re-indexing
//! ([`ExportMode`](options::ExportMode)) and finally builds a
//! [`Sector`](sector::Sector).
//!
//! ```
//! use o3d_convert::prelude::*;
//! use nalgebra::Vector3;
//!
//! let mesh = SceneMesh::new(
//!     vec![Vector3::zeros(), Vector3::x(), Vector3::y()],
//!     vec![[0, 1, 2]],
//!     0,
//! )
//! .with_uv_channel(0, vec![Vector3::zeros(), Vector3::x(), Vector3::y()]);
//! let scene = Scene { meshes: vec![mesh], materials: vec![SceneMaterial::named("wall")] };
//!
//! let sector = convert_scene(&scene, &ImportTransform::identity(), &ConversionOptions::default())?;
//! assert_eq!(sector.polygons.len(), 1);
//! assert_eq!(sector.edges.len(), 3);
//! # Ok::<(), o3d_convert::errors::ConversionError>(())
//! ```
//!
//! # Features
//! - **parallel**: use rayon to compute polygon planes and UV mappings

#![forbid(unsafe_code)]
#![deny(unused)]
#![warn(clippy::missing_const_for_fn, clippy::all)]

pub mod convert;
pub mod errors;
pub mod float_types;
pub mod mapping;
pub mod options;
pub mod scene;
pub mod sector;
pub mod session;
pub mod transform;

pub use convert::convert_scene;
pub use errors::ConversionError;
pub use sector::{Object3D, Sector};
pub use session::ImportSession;

pub mod prelude {
    pub use crate::convert::convert_scene;
    pub use crate::errors::ConversionError;
    pub use crate::options::{ConversionOptions, ConversionVariant, DegenerateMappingPolicy, ExportMode};
    pub use crate::scene::{Scene, SceneImporter, SceneMaterial, SceneMesh};
    pub use crate::sector::{Object3D, Sector};
    pub use crate::session::ImportSession;
    pub use crate::transform::ImportTransform;
}
