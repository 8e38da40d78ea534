//! Batch import sessions.
//!
//! An [`ImportSession`] brackets any number of conversions: the importer's
//! batch setup runs when the session opens and its teardown when the session
//! is dropped, whatever happened in between.
//!
//! Sessions nest. Only the outermost session of an importer on a thread calls
//! [`SceneImporter::begin_batch`] and [`SceneImporter::end_batch`]; inner ones,
//! such as the one opened by [`Object3D::load_any_3d_format`], join the batch
//! already in progress.

use crate::convert::convert_scene;
use crate::errors::ConversionError;
use crate::options::ConversionOptions;
use crate::scene::{ImportRequest, PostProcess, Scene, SceneImporter};
use crate::sector::Object3D;
use crate::transform::ImportTransform;
use hashbrown::HashMap;
use std::cell::RefCell;
use std::path::{Path, PathBuf};

thread_local! {
    /// Open session count per importer, keyed by importer address.
    static OPEN_SESSIONS: RefCell<HashMap<usize, usize>> = RefCell::new(HashMap::new());
}

fn importer_key<I: ?Sized>(importer: &I) -> usize {
    importer as *const I as *const () as usize
}

/// Count a new session on `key`; `true` if no other session is open.
fn enter_session(key: usize) -> bool {
    OPEN_SESSIONS.with_borrow_mut(|open| {
        let depth = open.entry(key).or_insert(0);
        *depth += 1;
        *depth == 1
    })
}

/// Close a session on `key`; `true` if it was the last one open.
fn leave_session(key: usize) -> bool {
    OPEN_SESSIONS.with_borrow_mut(|open| {
        let remaining = open.get(&key).map_or(0, |depth| depth.saturating_sub(1));
        if remaining == 0 {
            open.remove(&key);
        } else {
            open.insert(key, remaining);
        }
        remaining == 0
    })
}

pub struct ImportSession<'a, I: SceneImporter + ?Sized> {
    importer: &'a I,
    root: PathBuf,
    options: ConversionOptions,
    loaded: usize,
}

impl<'a, I: SceneImporter + ?Sized> ImportSession<'a, I> {
    /// Open a session. Relative file names are resolved against `root`.
    pub fn begin(importer: &'a I, root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        if enter_session(importer_key(importer)) {
            log::debug!("Starting import batch in {}", root.display());
            importer.begin_batch();
        } else {
            log::trace!("Joining open import batch from {}", root.display());
        }
        ImportSession {
            importer,
            root,
            options: ConversionOptions::default(),
            loaded: 0,
        }
    }

    pub fn with_options(mut self, options: ConversionOptions) -> Self {
        self.options = options;
        self
    }

    pub const fn options(&self) -> &ConversionOptions {
        &self.options
    }

    /// Number of files converted so far.
    pub const fn loaded(&self) -> usize {
        self.loaded
    }

    pub fn resolve(&self, file: &Path) -> PathBuf {
        self.root.join(file)
    }

    /// Import `file`, convert it and append the result to `object` as a new sector.
    ///
    /// Returns the index of the new sector. On error `object` is unchanged.
    pub fn load(
        &mut self,
        object: &mut Object3D,
        file: &Path,
        transform: &ImportTransform,
    ) -> Result<usize, ConversionError> {
        let scene = self.read(file)?;
        let sector = convert_scene(&scene, transform, &self.options)?;
        object.sectors.push(sector);
        self.loaded += 1;
        log::info!(
            "Loaded {} as sector {}",
            file.display(),
            object.sectors.len() - 1
        );
        Ok(object.sectors.len() - 1)
    }

    fn read(&self, file: &Path) -> Result<Scene, ConversionError> {
        let request = ImportRequest {
            path: self.resolve(file),
            post_process: PostProcess::default(),
        };
        let scene = self
            .importer
            .read_scene(&request)
            .map_err(|source| ConversionError::Load {
                path: file.to_path_buf(),
                source: Some(source),
            })?;
        if scene.meshes.is_empty() || scene.materials.is_empty() {
            return Err(ConversionError::Load {
                path: file.to_path_buf(),
                source: None,
            });
        }
        Ok(scene)
    }
}

impl<I: SceneImporter + ?Sized> Drop for ImportSession<'_, I> {
    fn drop(&mut self) {
        if leave_session(importer_key(self.importer)) {
            self.importer.end_batch();
            log::debug!("Finished import batch, {} files loaded", self.loaded);
        }
    }
}

impl Object3D {
    /// One-shot import of a single file in its own session. Inside an open
    /// session of the same importer the batch hooks are not called again.
    pub fn load_any_3d_format<I: SceneImporter + ?Sized>(
        &mut self,
        importer: &I,
        root: impl Into<PathBuf>,
        file: &Path,
        transform: &ImportTransform,
        options: ConversionOptions,
    ) -> Result<usize, ConversionError> {
        ImportSession::begin(importer, root)
            .with_options(options)
            .load(self, file, transform)
    }
}
