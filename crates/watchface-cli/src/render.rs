//! One-shot face rendering onto a headless surface.

use anyhow::{Context, Result};
use image::RgbaImage;
use std::path::Path;
use watchface_core::{FaceDescriptor, Sample};
use watchface_hw::{
    build_background, build_label, FontCache, FsFontLoader, HeadlessSurface, LabelInstance,
};

/// A face built at a single instant.
pub struct RenderedFace {
    pub surface: HeadlessSurface,
    pub labels: Vec<LabelInstance>,
}

impl RenderedFace {
    pub fn snapshot(&self) -> RgbaImage {
        self.surface.snapshot()
    }
}

/// Parse and build the face in `face_dir`, then resolve every label once.
pub fn render_face(
    face_dir: &Path,
    fonts_dir: &Path,
    sample: &Sample,
    size: (u32, u32),
) -> Result<RenderedFace> {
    let descriptor = FaceDescriptor::parse_dir(face_dir)
        .with_context(|| format!("face {}", face_dir.display()))?;

    let mut surface = HeadlessSurface::new(size.0, size.1);
    let mut fonts = FontCache::new(FsFontLoader::new());

    let container = build_background(&mut surface, descriptor.background.as_ref(), face_dir);
    let mut labels: Vec<LabelInstance> = descriptor
        .labels
        .iter()
        .map(|spec| build_label(&mut surface, &mut fonts, container, spec, fonts_dir))
        .collect();
    for label in &mut labels {
        label.refresh(&mut surface, sample);
    }
    fonts.release_all();

    Ok(RenderedFace { surface, labels })
}
