//! Face package manifest (`faces.json`) and preview images.

use crate::render::render_face;
use anyhow::{Context, Result};
use image::imageops::{self, FilterType};
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::Path;
use watchface_core::{Catalog, FaceDescriptor, Sample};

pub const PREVIEW_SIZE: (u32, u32) = (240, 240);
pub const THUMBNAIL_SIZE: (u32, u32) = (60, 60);

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FaceEntry {
    pub preview: String,
    pub preview_size: (u32, u32),
    pub thumbnail: String,
    pub thumbnail_size: (u32, u32),
    /// Everything a device needs to install the face.
    pub files: Vec<String>,
}

pub type Manifest = BTreeMap<String, FaceEntry>;

pub fn preview_name(face: &str) -> String {
    format!("{face}_preview.png")
}

pub fn thumbnail_name(face: &str) -> String {
    format!("{face}_thumbnail.png")
}

/// Visible files of the face directory, then any referenced asset not
/// already listed.
pub fn face_files(face_dir: &Path, descriptor: &FaceDescriptor) -> Result<Vec<String>> {
    let mut files = Vec::new();
    for entry in std::fs::read_dir(face_dir)
        .with_context(|| format!("listing {}", face_dir.display()))?
    {
        let entry = entry?;
        if !entry.file_type()?.is_file() {
            continue;
        }
        let name = entry.file_name().to_string_lossy().into_owned();
        if !name.starts_with('.') {
            files.push(name);
        }
    }
    files.sort();

    for referenced in descriptor.referenced_files() {
        if !files.contains(&referenced) {
            files.push(referenced);
        }
    }
    Ok(files)
}

/// Build the manifest for every face in the catalog. Faces that fail to
/// parse or whose previews cannot be written are reported and left out. With `previews`, preview and thumbnail
/// PNGs are written there as well.
pub fn build_manifest(
    catalog: &Catalog,
    fonts_dir: &Path,
    sample: &Sample,
    previews: Option<&Path>,
) -> Result<Manifest> {
    if let Some(dir) = previews {
        std::fs::create_dir_all(dir).with_context(|| format!("creating {}", dir.display()))?;
    }

    let mut manifest = Manifest::new();
    for name in catalog.names() {
        let face_dir = catalog.face_dir(name);
        let descriptor = match FaceDescriptor::parse_dir(&face_dir) {
            Ok(d) => d,
            Err(e) => {
                tracing::error!(face = %name, error = %e, "skipping face");
                continue;
            }
        };

        if let Some(dir) = previews {
            if let Err(e) = write_previews(&face_dir, fonts_dir, sample, name, dir) {
                tracing::error!(face = %name, error = %e, "skipping face: preview failed");
                continue;
            }
        }

        manifest.insert(
            name.clone(),
            FaceEntry {
                preview: preview_name(name),
                preview_size: PREVIEW_SIZE,
                thumbnail: thumbnail_name(name),
                thumbnail_size: THUMBNAIL_SIZE,
                files: face_files(&face_dir, &descriptor)?,
            },
        );
    }
    Ok(manifest)
}

fn write_previews(
    face_dir: &Path,
    fonts_dir: &Path,
    sample: &Sample,
    name: &str,
    out_dir: &Path,
) -> Result<()> {
    let face = render_face(face_dir, fonts_dir, sample, PREVIEW_SIZE)?;
    let preview = face.snapshot();
    let thumbnail = imageops::resize(&preview, THUMBNAIL_SIZE.0, THUMBNAIL_SIZE.1, FilterType::Triangle);

    let preview_path = out_dir.join(preview_name(name));
    preview
        .save(&preview_path)
        .with_context(|| format!("writing {}", preview_path.display()))?;
    let thumbnail_path = out_dir.join(thumbnail_name(name));
    thumbnail
        .save(&thumbnail_path)
        .with_context(|| format!("writing {}", thumbnail_path.display()))?;

    tracing::info!(face = name, preview = %preview_path.display(), "previews written");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use watchface_core::TimeSample;

    fn sample() -> Sample {
        Sample {
            time: TimeSample::from_ymd_hms(2023, 1, 2, 10, 8, 0).unwrap(),
            battery_percent: Some(100),
        }
    }

    fn write_face(root: &Path, name: &str, json: &str) {
        let dir = root.join(name);
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join("face.json"), json).unwrap();
    }

    #[test]
    fn test_manifest_lists_files() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        write_face(
            root,
            "digital",
            r#"{"version":"1","background":{"image":"bg.png"},
                "labels":[{"text":"{HH}","font":"big.bin"},{"text":"{mm}","font":"big.bin"}]}"#,
        );
        std::fs::write(root.join("digital/.hidden"), b"x").unwrap();
        std::fs::write(root.join("digital/bg.png"), b"not really a png").unwrap();
        write_face(root, "broken", r#"{"version":"3"}"#);

        let catalog = Catalog::scan(root).unwrap();
        let manifest = build_manifest(&catalog, root, &sample(), None).unwrap();

        assert_eq!(manifest.len(), 1);
        let entry = &manifest["digital"];
        assert_eq!(entry.preview, "digital_preview.png");
        assert_eq!(entry.thumbnail, "digital_thumbnail.png");
        assert_eq!(entry.files, vec!["bg.png", "face.json", "big.bin"]);
    }

    #[test]
    fn test_manifest_json_shape() {
        let mut manifest = Manifest::new();
        manifest.insert(
            "a".to_string(),
            FaceEntry {
                preview: preview_name("a"),
                preview_size: PREVIEW_SIZE,
                thumbnail: thumbnail_name("a"),
                thumbnail_size: THUMBNAIL_SIZE,
                files: vec!["face.json".to_string()],
            },
        );
        let json = serde_json::to_value(&manifest).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "a": {
                    "preview": "a_preview.png",
                    "preview_size": [240, 240],
                    "thumbnail": "a_thumbnail.png",
                    "thumbnail_size": [60, 60],
                    "files": ["face.json"]
                }
            })
        );
    }

    #[test]
    fn test_preview_failure_skips_only_that_face() {
        let dir = tempfile::tempdir().unwrap();
        let faces = dir.path().join("faces");
        write_face(&faces, "good", r#"{"version":"1","labels":[]}"#);
        write_face(&faces, "stuck", r#"{"version":"1","labels":[]}"#);
        let out = dir.path().join("_previews");
        // A directory where the preview file should go makes the write fail.
        std::fs::create_dir_all(out.join("stuck_preview.png")).unwrap();

        let catalog = Catalog::scan(&faces).unwrap();
        let manifest = build_manifest(&catalog, &faces, &sample(), Some(&out)).unwrap();

        assert_eq!(manifest.keys().collect::<Vec<_>>(), vec!["good"]);
        assert!(out.join("good_preview.png").is_file());
    }

    #[test]
    fn test_previews_written() {
        let dir = tempfile::tempdir().unwrap();
        let faces = dir.path().join("faces");
        write_face(&faces, "plain", r##"{"version":"1","background":{"color":"#F00"},"labels":[]}"##);
        let out = dir.path().join("_previews");

        let catalog = Catalog::scan(&faces).unwrap();
        build_manifest(&catalog, &faces, &sample(), Some(&out)).unwrap();

        let preview = image::open(out.join("plain_preview.png")).unwrap().to_rgba8();
        assert_eq!(preview.dimensions(), PREVIEW_SIZE);
        assert_eq!(preview.get_pixel(120, 120).0, [0xFF, 0, 0, 0xFF]);
        let thumb = image::open(out.join("plain_thumbnail.png")).unwrap();
        assert_eq!((thumb.width(), thumb.height()), THUMBNAIL_SIZE);
    }
}
