//! In-memory render surface.
//!
//! Keeps the widget tree as plain data so the daemon can run without a
//! panel attached and the CLI can render previews. Backgrounds can be
//! rasterized with [`HeadlessSurface::snapshot`]; label glyphs are the
//! toolkit's job and are not drawn.

use crate::surface::{ContainerId, LabelHandle, LabelStyle, RenderSurface, ResourceError};
use image::{Rgba, RgbaImage};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use watchface_core::{Color, Position};

const ROOT: ContainerId = ContainerId(0);

/// Screen background before any face sets one.
pub const DEFAULT_BACKGROUND: Color = Color::WHITE;

/// A label as it currently exists on the surface.
#[derive(Debug, Clone, PartialEq)]
pub struct LabelWidget {
    pub handle: LabelHandle,
    pub parent: ContainerId,
    pub style: LabelStyle,
    pub position: Position,
    pub text: String,
}

struct BackgroundImage {
    container: ContainerId,
    path: PathBuf,
}

pub struct HeadlessSurface {
    width: u32,
    height: u32,
    next_id: u32,
    background_color: Color,
    background_image: Option<BackgroundImage>,
    labels: Vec<LabelWidget>,
    image_cache: HashMap<PathBuf, RgbaImage>,
    text_updates: usize,
}

impl HeadlessSurface {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            next_id: ROOT.0,
            background_color: DEFAULT_BACKGROUND,
            background_image: None,
            labels: Vec::new(),
            image_cache: HashMap::new(),
            text_updates: 0,
        }
    }

    pub fn labels(&self) -> &[LabelWidget] {
        &self.labels
    }

    pub fn label(&self, handle: LabelHandle) -> Option<&LabelWidget> {
        self.labels.iter().find(|l| l.handle == handle)
    }

    pub fn background_color(&self) -> Color {
        self.background_color
    }

    /// Path of the background image currently shown, if any.
    pub fn background_image(&self) -> Option<&Path> {
        self.background_image.as_ref().map(|b| b.path.as_path())
    }

    /// Total `set_label_text` calls since creation.
    pub fn text_updates(&self) -> usize {
        self.text_updates
    }

    /// Number of decoded images currently cached.
    pub fn cached_images(&self) -> usize {
        self.image_cache.len()
    }

    /// True when no face content is on the surface.
    pub fn is_blank(&self) -> bool {
        self.labels.is_empty() && self.background_image.is_none()
    }

    fn alloc_id(&mut self) -> u32 {
        self.next_id += 1;
        self.next_id
    }

    fn is_container(&self, id: ContainerId) -> bool {
        id == ROOT || self.background_image.as_ref().is_some_and(|b| b.container == id)
    }

    /// Area of a container in surface coordinates: (x, y, width, height).
    /// The background image container is the image's centered footprint.
    fn container_rect(&self, id: ContainerId) -> (i32, i32, i32, i32) {
        let (w, h) = self.size();
        let (w, h) = (w as i32, h as i32);
        let image = self
            .background_image
            .as_ref()
            .filter(|b| b.container == id)
            .and_then(|b| self.image_cache.get(&b.path));
        match image {
            Some(img) => {
                let (iw, ih) = (img.width() as i32, img.height() as i32);
                ((w - iw) / 2, (h - ih) / 2, iw, ih)
            }
            None => (0, 0, w, h),
        }
    }

    /// Absolute point a label is placed at: its alignment anchor inside the
    /// parent container plus the label's offset.
    pub fn label_origin(&self, handle: LabelHandle) -> Option<(i32, i32)> {
        let label = self.label(handle)?;
        let (x0, y0, cw, ch) = self.container_rect(label.parent);
        let (ax, ay) = label.style.align.anchor(cw, ch);
        Some((x0 + ax + label.position.x, y0 + ay + label.position.y))
    }

    /// Rasterize the background: color fill, then the image centered on top.
    pub fn snapshot(&self) -> RgbaImage {
        let c = self.background_color;
        let mut canvas = RgbaImage::from_pixel(self.width, self.height, Rgba([c.r, c.g, c.b, 0xFF]));
        if let Some(img) = self
            .background_image
            .as_ref()
            .and_then(|b| self.image_cache.get(&b.path))
        {
            let x = (i64::from(self.width) - i64::from(img.width())) / 2;
            let y = (i64::from(self.height) - i64::from(img.height())) / 2;
            image::imageops::overlay(&mut canvas, img, x, y);
        }
        canvas
    }
}

impl RenderSurface for HeadlessSurface {
    fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn root(&self) -> ContainerId {
        ROOT
    }

    fn set_background_color(&mut self, color: Color) {
        self.background_color = color;
    }

    fn set_background_image(&mut self, path: &Path) -> Result<ContainerId, ResourceError> {
        if !self.image_cache.contains_key(path) {
            let decoded = image::open(path).map_err(|e| match e {
                image::ImageError::IoError(io) => ResourceError::io(path, io),
                source => ResourceError::ImageDecode {
                    path: path.to_path_buf(),
                    source,
                },
            })?;
            let rgba = decoded.to_rgba8();
            tracing::debug!(
                path = %path.display(),
                width = rgba.width(),
                height = rgba.height(),
                "background image decoded"
            );
            self.image_cache.insert(path.to_path_buf(), rgba);
        }

        let container = ContainerId(self.alloc_id());
        self.background_image = Some(BackgroundImage {
            container,
            path: path.to_path_buf(),
        });
        Ok(container)
    }

    fn create_label(
        &mut self,
        parent: ContainerId,
        style: &LabelStyle,
        position: Position,
    ) -> LabelHandle {
        let parent = if self.is_container(parent) {
            parent
        } else {
            tracing::warn!(?parent, "unknown label parent; attaching to root");
            ROOT
        };
        let handle = LabelHandle(self.alloc_id());
        self.labels.push(LabelWidget {
            handle,
            parent,
            style: *style,
            position,
            text: String::new(),
        });
        handle
    }

    fn set_label_text(&mut self, label: LabelHandle, text: &str) {
        self.text_updates += 1;
        match self.labels.iter_mut().find(|l| l.handle == label) {
            Some(widget) => {
                tracing::debug!(?label, text, "label text set");
                widget.text.clear();
                widget.text.push_str(text);
            }
            None => tracing::warn!(?label, "text update for unknown label"),
        }
    }

    fn clear(&mut self) {
        self.labels.clear();
        self.background_image = None;
        self.background_color = DEFAULT_BACKGROUND;
        self.image_cache.clear();
    }
}
