//! Materializing a descriptor onto a surface.
//!
//! These are the building blocks of a face load: the background first,
//! then one label at a time. Resource failures are logged and degrade the
//! affected element only.

use crate::fonts::{FontCache, FontLoader};
use crate::surface::{ContainerId, LabelHandle, LabelStyle, RenderSurface};
use std::path::Path;
use watchface_core::{evaluate, is_dynamic, Background, LabelSpec, Sample};

/// A label on the surface together with its template and the last text shown.
#[derive(Debug, Clone)]
pub struct LabelInstance {
    pub spec: LabelSpec,
    pub handle: LabelHandle,
    value: String,
    /// Template contains at least one token.
    dynamic: bool,
    /// Resolved at least once.
    shown: bool,
}

impl LabelInstance {
    /// The text currently displayed.
    pub fn value(&self) -> &str {
        &self.value
    }

    /// Re-evaluate the template and push the text to the surface only if it
    /// changed. Returns whether the surface was updated.
    ///
    /// Templates without tokens are resolved once and skipped afterwards.
    pub fn refresh<S: RenderSurface>(&mut self, surface: &mut S, sample: &Sample) -> bool {
        if self.shown && !self.dynamic {
            return false;
        }
        let text = evaluate(&self.spec.template, sample);
        self.shown = true;
        if text == self.value {
            return false;
        }
        surface.set_label_text(self.handle, &text);
        self.value = text;
        true
    }
}

/// Apply a descriptor background. Returns the container labels should be
/// parented to: the background image when it loaded, otherwise the root.
pub fn build_background<S: RenderSurface>(
    surface: &mut S,
    background: Option<&Background>,
    face_dir: &Path,
) -> ContainerId {
    let root = surface.root();
    let Some(bg) = background else {
        return root;
    };

    if let Some(color) = bg.color {
        surface.set_background_color(color);
    }

    match &bg.image {
        Some(image) => {
            let path = face_dir.join(image);
            match surface.set_background_image(&path) {
                Ok(container) => container,
                Err(e) => {
                    tracing::warn!(path = %path.display(), error = %e, "background image unavailable; using plain background");
                    root
                }
            }
        }
        None => root,
    }
}

/// Create one label. A font that fails to load leaves the label on the
/// surface's default font.
pub fn build_label<S: RenderSurface, L: FontLoader>(
    surface: &mut S,
    fonts: &mut FontCache<L>,
    container: ContainerId,
    spec: &LabelSpec,
    fonts_dir: &Path,
) -> LabelInstance {
    let font = spec.font.as_ref().and_then(|name| {
        let path = fonts_dir.join(name);
        fonts
            .acquire(&path)
            .map_err(|e| {
                tracing::warn!(font = %path.display(), error = %e, "font unavailable; using default font");
            })
            .ok()
    });

    let style = LabelStyle {
        color: spec.color,
        font,
        align: spec.align,
        text_align: spec.text_align,
    };
    let handle = surface.create_label(container, &style, spec.position);
    LabelInstance {
        spec: spec.clone(),
        handle,
        value: String::new(),
        dynamic: is_dynamic(&spec.template),
        shown: false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fonts::FsFontLoader;
    use crate::headless::HeadlessSurface;
    use std::path::PathBuf;
    use watchface_core::{Color, FaceDescriptor, TimeSample};

    fn sample(second: u32) -> Sample {
        Sample {
            time: TimeSample::from_ymd_hms(2023, 1, 2, 10, 8, second).unwrap(),
            battery_percent: Some(50),
        }
    }

    #[test]
    fn test_refresh_suppresses_identical_text() {
        let d = FaceDescriptor::parse_str(r#"{"version":"1","labels":[{"text":"{HH}:{mm}"}]}"#)
            .unwrap();
        let mut surface = HeadlessSurface::new(240, 240);
        let mut fonts = FontCache::new(FsFontLoader::new());
        let root = surface.root();
        let mut label = build_label(&mut surface, &mut fonts, root, &d.labels[0], Path::new("."));

        assert!(label.refresh(&mut surface, &sample(0)));
        assert!(!label.refresh(&mut surface, &sample(30)));
        assert_eq!(surface.text_updates(), 1);
        assert_eq!(label.value(), "10:08");
    }

    #[test]
    fn test_static_label_resolved_once() {
        let d = FaceDescriptor::parse_str(
            r#"{"version":"1","labels":[{"text":"{HH}"},{"text":"Hello {hh}"}]}"#,
        )
        .unwrap();
        let mut surface = HeadlessSurface::new(240, 240);
        let mut fonts = FontCache::new(FsFontLoader::new());
        let root = surface.root();
        let mut clock = build_label(&mut surface, &mut fonts, root, &d.labels[0], Path::new("."));
        let mut greeting =
            build_label(&mut surface, &mut fonts, root, &d.labels[1], Path::new("."));

        let later = Sample {
            time: TimeSample::from_ymd_hms(2023, 1, 2, 11, 0, 0).unwrap(),
            battery_percent: Some(50),
        };
        assert!(clock.refresh(&mut surface, &sample(0)));
        assert!(greeting.refresh(&mut surface, &sample(0)));
        assert!(clock.refresh(&mut surface, &later));
        assert!(!greeting.refresh(&mut surface, &later));
        assert_eq!(clock.value(), "11");
        assert_eq!(greeting.value(), "Hello {hh}");
        assert_eq!(surface.text_updates(), 3);
    }

    #[test]
    fn test_missing_font_uses_default() {
        let dir = tempfile::tempdir().unwrap();
        let d = FaceDescriptor::parse_str(
            r##"{"version":"1","labels":[{"text":"x","font":"missing.bin","color":"#FF0000"}]}"##,
        )
        .unwrap();
        let mut surface = HeadlessSurface::new(240, 240);
        let mut fonts = FontCache::new(FsFontLoader::new());
        let root = surface.root();
        let label = build_label(&mut surface, &mut fonts, root, &d.labels[0], dir.path());

        let widget = surface.label(label.handle).unwrap();
        assert_eq!(widget.style.font, None);
        assert_eq!(widget.style.color, Color::rgb(0xFF, 0, 0));
        assert!(fonts.is_empty());
    }

    #[test]
    fn test_background_without_image_uses_root() {
        let bg = Background {
            color: Some(Color::BLACK),
            image: None,
        };
        let mut surface = HeadlessSurface::new(240, 240);
        let container = build_background(&mut surface, Some(&bg), Path::new("."));
        assert_eq!(container, surface.root());
        assert_eq!(surface.background_color(), Color::BLACK);
    }

    #[test]
    fn test_missing_background_image_falls_back_to_root() {
        let dir = tempfile::tempdir().unwrap();
        let bg = Background {
            color: Some(Color::BLACK),
            image: Some(PathBuf::from("missing.png")),
        };
        let mut surface = HeadlessSurface::new(240, 240);
        let container = build_background(&mut surface, Some(&bg), dir.path());
        assert_eq!(container, surface.root());
        assert!(surface.background_image().is_none());
        assert_eq!(surface.background_color(), Color::BLACK);
    }
}
