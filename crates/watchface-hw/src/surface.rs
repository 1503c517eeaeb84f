//! Render surface interface.
//!
//! The face session only ever talks to the graphics toolkit through
//! [`RenderSurface`]: set a background, create labels, update their text
//! and wipe everything between faces.

use crate::fonts::FontHandle;
use std::path::{Path, PathBuf};
use thiserror::Error;
use watchface_core::{Align, Color, Position, TextAlign};

/// Missing or corrupt asset. Always local to the element that needed it.
#[derive(Error, Debug)]
pub enum ResourceError {
    #[error("resource not found: {0}")]
    NotFound(PathBuf),
    #[error("failed to load font {path}: {reason}")]
    FontLoad { path: PathBuf, reason: String },
    #[error("failed to decode image {path}: {source}")]
    ImageDecode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
    #[error("I/O error reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl ResourceError {
    pub(crate) fn io(path: &Path, source: std::io::Error) -> Self {
        if source.kind() == std::io::ErrorKind::NotFound {
            ResourceError::NotFound(path.to_path_buf())
        } else {
            ResourceError::Io {
                path: path.to_path_buf(),
                source,
            }
        }
    }
}

/// A widget that can parent labels (the screen root or a background image).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ContainerId(pub u32);

/// A label widget owned by the surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LabelHandle(pub u32);

/// Visual style of a label. `font: None` means the surface's default font.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LabelStyle {
    pub color: Color,
    pub font: Option<FontHandle>,
    pub align: Align,
    pub text_align: TextAlign,
}

pub trait RenderSurface {
    /// Surface size in pixels (width, height).
    fn size(&self) -> (u32, u32);

    /// The top-level container every face starts from.
    fn root(&self) -> ContainerId;

    fn set_background_color(&mut self, color: Color);

    /// Show `path` centered as the background and return it as a container.
    ///
    /// On failure the background is left as it was.
    fn set_background_image(&mut self, path: &Path) -> Result<ContainerId, ResourceError>;

    /// Create an empty label under `parent`, offset `position` from its anchor.
    fn create_label(
        &mut self,
        parent: ContainerId,
        style: &LabelStyle,
        position: Position,
    ) -> LabelHandle;

    fn set_label_text(&mut self, label: LabelHandle, text: &str);

    /// Remove every child widget, reset the background and drop any cached
    /// decoded images.
    fn clear(&mut self);
}
