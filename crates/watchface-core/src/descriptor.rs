//! `face.json` descriptor parsing.
//!
//! Parsing is all-or-nothing: the raw JSON is decoded and every field is
//! validated into a [`FaceDescriptor`] before anything is handed to the
//! display, so a bad descriptor can never leave a half-built face behind.

use crate::types::{Align, Color, Position, TextAlign};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Descriptor file name inside each face directory.
pub const FACE_FILE: &str = "face.json";

/// The only descriptor version this engine understands.
pub const SUPPORTED_VERSION: &str = "1";

const DEFAULT_LABEL_COLOR: &str = "#000";

#[derive(Error, Debug)]
pub enum DescriptorError {
    #[error("cannot read descriptor {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed descriptor JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("descriptor has no version field")]
    MissingVersion,
    #[error("unsupported descriptor version: {0}")]
    UnsupportedVersion(String),
    #[error("invalid color {value:?} in {field}")]
    InvalidColor { field: String, value: String },
}

/// Validated face composition.
#[derive(Debug, Clone, PartialEq)]
pub struct FaceDescriptor {
    pub version: String,
    pub background: Option<Background>,
    pub labels: Vec<LabelSpec>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Background {
    pub color: Option<Color>,
    /// Image path relative to the face directory.
    pub image: Option<PathBuf>,
}

/// One text label as declared in the descriptor.
#[derive(Debug, Clone, PartialEq)]
pub struct LabelSpec {
    pub template: String,
    pub color: Color,
    /// Font file name relative to the shared fonts directory.
    pub font: Option<String>,
    pub position: Position,
    pub align: Align,
    pub text_align: TextAlign,
}

#[derive(Deserialize)]
struct RawDescriptor {
    version: Option<serde_json::Value>,
    background: Option<RawBackground>,
    #[serde(default)]
    labels: Vec<RawLabel>,
}

#[derive(Deserialize)]
struct RawBackground {
    color: Option<String>,
    image: Option<String>,
}

#[derive(Deserialize)]
struct RawLabel {
    #[serde(default)]
    text: String,
    color: Option<String>,
    font: Option<String>,
    #[serde(default)]
    x: i32,
    #[serde(default)]
    y: i32,
    align: Option<String>,
    textalign: Option<String>,
}

impl FaceDescriptor {
    /// Read and validate a descriptor file.
    pub fn parse(path: &Path) -> Result<Self, DescriptorError> {
        let json = std::fs::read_to_string(path).map_err(|source| DescriptorError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse_str(&json)
    }

    /// Read `<face_dir>/face.json`.
    pub fn parse_dir(face_dir: &Path) -> Result<Self, DescriptorError> {
        Self::parse(&face_dir.join(FACE_FILE))
    }

    /// Validate a descriptor from its JSON text.
    pub fn parse_str(json: &str) -> Result<Self, DescriptorError> {
        let raw: RawDescriptor = serde_json::from_str(json)?;

        // Strict string equality: a numeric 1 is not version "1".
        let version = match raw.version {
            None => return Err(DescriptorError::MissingVersion),
            Some(serde_json::Value::String(v)) if v == SUPPORTED_VERSION => v,
            Some(serde_json::Value::String(v)) => return Err(DescriptorError::UnsupportedVersion(v)),
            Some(other) => return Err(DescriptorError::UnsupportedVersion(other.to_string())),
        };

        let background = raw
            .background
            .map(|bg| -> Result<Background, DescriptorError> {
                Ok(Background {
                    color: bg
                        .color
                        .as_deref()
                        .map(|c| parse_color(c, "background.color"))
                        .transpose()?,
                    image: bg.image.map(PathBuf::from),
                })
            })
            .transpose()?;

        let labels = raw
            .labels
            .into_iter()
            .enumerate()
            .map(|(i, l)| -> Result<LabelSpec, DescriptorError> {
                let color = l.color.as_deref().unwrap_or(DEFAULT_LABEL_COLOR);
                Ok(LabelSpec {
                    color: parse_color(color, &format!("labels[{i}].color"))?,
                    template: l.text,
                    font: l.font.filter(|f| !f.is_empty()),
                    position: Position { x: l.x, y: l.y },
                    align: l.align.as_deref().map(Align::from_name).unwrap_or_default(),
                    text_align: l
                        .textalign
                        .as_deref()
                        .map(TextAlign::from_name)
                        .unwrap_or_default(),
                })
            })
            .collect::<Result<Vec<_>, DescriptorError>>()?;

        Ok(Self {
            version,
            background,
            labels,
        })
    }

    /// Files outside `face.json` that this face needs: the background image
    /// followed by each distinct font, in declaration order.
    pub fn referenced_files(&self) -> Vec<String> {
        let mut files: Vec<String> = Vec::new();
        if let Some(image) = self.background.as_ref().and_then(|b| b.image.as_ref()) {
            files.push(image.to_string_lossy().into_owned());
        }
        for font in self.labels.iter().filter_map(|l| l.font.as_ref()) {
            if !files.contains(font) {
                files.push(font.clone());
            }
        }
        files
    }
}

fn parse_color(value: &str, field: &str) -> Result<Color, DescriptorError> {
    Color::from_hex(value).ok_or_else(|| DescriptorError::InvalidColor {
        field: field.to_string(),
        value: value.to_string(),
    })
}
