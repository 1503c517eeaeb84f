//! Per-face font cache.
//!
//! Fonts are expensive to load on the watch, and a face typically uses the
//! same font for several labels. The cache loads each path once per face and
//! hands out the same [`FontHandle`] to every label that asks for it.
//! [`FontCache::release_all`] frees them all between faces.

use crate::surface::ResourceError;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Opaque reference to a font held by a [`FontLoader`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FontHandle(pub u64);

/// Font loading service of the graphics toolkit.
pub trait FontLoader {
    fn load(&mut self, path: &Path) -> Result<FontHandle, ResourceError>;

    /// Free a handle previously returned by [`load`](Self::load).
    fn free(&mut self, handle: FontHandle);
}

/// Loads font files into memory. Glyph parsing belongs to the toolkit;
/// this loader only checks the file is present and non-empty.
#[derive(Default)]
pub struct FsFontLoader {
    next_id: u64,
    fonts: HashMap<FontHandle, Vec<u8>>,
}

impl FsFontLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of fonts currently held in memory.
    pub fn live(&self) -> usize {
        self.fonts.len()
    }
}

impl FontLoader for FsFontLoader {
    fn load(&mut self, path: &Path) -> Result<FontHandle, ResourceError> {
        let data = std::fs::read(path).map_err(|e| ResourceError::io(path, e))?;
        if data.is_empty() {
            return Err(ResourceError::FontLoad {
                path: path.to_path_buf(),
                reason: "empty font file".into(),
            });
        }
        self.next_id += 1;
        let handle = FontHandle(self.next_id);
        tracing::debug!(path = %path.display(), bytes = data.len(), ?handle, "font loaded");
        self.fonts.insert(handle, data);
        Ok(handle)
    }

    fn free(&mut self, handle: FontHandle) {
        if self.fonts.remove(&handle).is_none() {
            tracing::warn!(?handle, "free of unknown font handle");
        }
    }
}

/// Font handles for the current face, keyed by font path.
pub struct FontCache<L: FontLoader> {
    loader: L,
    fonts: HashMap<PathBuf, FontHandle>,
}

impl<L: FontLoader> FontCache<L> {
    pub fn new(loader: L) -> Self {
        Self {
            loader,
            fonts: HashMap::new(),
        }
    }

    /// Return the cached handle for `path`, loading it on first use.
    pub fn acquire(&mut self, path: &Path) -> Result<FontHandle, ResourceError> {
        if let Some(handle) = self.fonts.get(path) {
            return Ok(*handle);
        }
        let handle = self.loader.load(path)?;
        self.fonts.insert(path.to_path_buf(), handle);
        Ok(handle)
    }

    /// Free every cached handle exactly once and empty the cache.
    /// Calling this on an empty cache does nothing.
    pub fn release_all(&mut self) {
        if self.fonts.is_empty() {
            return;
        }
        let count = self.fonts.len();
        for (_, handle) in self.fonts.drain() {
            self.loader.free(handle);
        }
        tracing::debug!(count, "font cache released");
    }

    pub fn len(&self) -> usize {
        self.fonts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fonts.is_empty()
    }

    pub fn loader(&self) -> &L {
        &self.loader
    }
}
