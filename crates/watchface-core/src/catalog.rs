//! Face catalog: the ordered set of installed faces and the last one shown.

use crate::input::Direction;
use crate::store::{ConfigStore, StoreError};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use thiserror::Error;

/// Store key of the persisted last-face record.
pub const LAST_FACE_KEY: &str = "digital-face.config";

#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("no faces found under {0}")]
    NoFaces(PathBuf),
    #[error("cannot scan faces root {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Face names found under the faces root, sorted and fixed for a session.
#[derive(Debug, Clone)]
pub struct Catalog {
    root: PathBuf,
    names: Vec<String>,
}

impl Catalog {
    /// Scan `root` for face directories.
    ///
    /// Only directories (or symlinks to directories) whose name starts with
    /// a letter or digit are faces; `_previews`, `.git` and the like are
    /// skipped.
    pub fn scan(root: &Path) -> Result<Self, CatalogError> {
        let io_err = |source| CatalogError::Io {
            path: root.to_path_buf(),
            source,
        };

        let mut names = Vec::new();
        for entry in std::fs::read_dir(root).map_err(io_err)? {
            let entry = entry.map_err(io_err)?;
            // `DirEntry::file_type` does not follow symlinks.
            if !entry.path().is_dir() {
                continue;
            }
            let Ok(name) = entry.file_name().into_string() else {
                tracing::debug!(path = %entry.path().display(), "skipping non-UTF-8 face directory");
                continue;
            };
            if is_face_name(&name) {
                names.push(name);
            }
        }

        let catalog = Self::from_names(root, names)?;
        tracing::info!(root = %root.display(), faces = catalog.len(), "face catalog scanned");
        Ok(catalog)
    }

    /// Build a catalog from known names. Sorts and de-duplicates.
    pub fn from_names(
        root: impl Into<PathBuf>,
        names: impl IntoIterator<Item = String>,
    ) -> Result<Self, CatalogError> {
        let root = root.into();
        let mut names: Vec<String> = names.into_iter().filter(|n| is_face_name(n)).collect();
        names.sort();
        names.dedup();
        if names.is_empty() {
            return Err(CatalogError::NoFaces(root));
        }
        Ok(Self { root, names })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index_of(name).is_some()
    }

    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.names.binary_search_by(|n| n.as_str().cmp(name)).ok()
    }

    pub fn first(&self) -> &str {
        &self.names[0]
    }

    /// Directory holding `name`'s descriptor and assets.
    pub fn face_dir(&self, name: &str) -> PathBuf {
        self.root.join(name)
    }

    /// The entry adjacent to `current`, wrapping at both ends.
    ///
    /// A name not in the catalog navigates from the first entry.
    pub fn neighbor(&self, current: &str, direction: Direction) -> &str {
        let len = self.names.len();
        let idx = self.index_of(current).unwrap_or(0);
        let next = match direction {
            Direction::Next => (idx + 1) % len,
            Direction::Previous => (idx + len - 1) % len,
        };
        &self.names[next]
    }
}

fn is_face_name(name: &str) -> bool {
    name.chars().next().is_some_and(char::is_alphanumeric)
}

#[derive(Deserialize)]
struct LastFaceRecord {
    face: String,
}

/// Persisted name of the last face the user looked at.
#[derive(Clone)]
pub struct LastFace {
    store: Arc<dyn ConfigStore>,
}

impl LastFace {
    pub fn new(store: Arc<dyn ConfigStore>) -> Self {
        Self { store }
    }

    /// `None` if never saved or the record is unreadable.
    pub fn get(&self) -> Option<String> {
        match self.store.load(LAST_FACE_KEY) {
            Ok(Some(value)) => match serde_json::from_value::<LastFaceRecord>(value) {
                Ok(record) => Some(record.face),
                Err(e) => {
                    tracing::warn!(error = %e, "last face record malformed; ignoring");
                    None
                }
            },
            Ok(None) => None,
            Err(e) => {
                tracing::warn!(error = %e, "last face record unreadable; ignoring");
                None
            }
        }
    }

    pub fn set(&self, name: &str) -> Result<(), StoreError> {
        let record = serde_json::json!({ "face": name });
        self.store.save(LAST_FACE_KEY, &record)?;
        tracing::debug!(face = name, "last face persisted");
        Ok(())
    }
}
