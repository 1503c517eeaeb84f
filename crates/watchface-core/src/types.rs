use serde::{Deserialize, Serialize};
use std::fmt;

/// 24-bit RGB color as written in descriptors (`#RRGGBB` or `#RGB`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const BLACK: Color = Color::rgb(0, 0, 0);
    pub const WHITE: Color = Color::rgb(0xFF, 0xFF, 0xFF);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parse a `#RRGGBB` or `#RGB` hex string. The leading `#` is optional.
    ///
    /// Three-digit values expand each nibble (`#f80` == `#ff8800`).
    pub fn from_hex(value: &str) -> Option<Self> {
        let hex = value.trim().trim_start_matches('#');
        if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return None;
        }
        match hex.len() {
            6 => {
                let v = u32::from_str_radix(hex, 16).ok()?;
                Some(Self::rgb((v >> 16) as u8, (v >> 8) as u8, v as u8))
            }
            3 => {
                let v = u16::from_str_radix(hex, 16).ok()?;
                let expand = |n: u16| ((n & 0xF) as u8) * 0x11;
                Some(Self::rgb(expand(v >> 8), expand(v >> 4), expand(v)))
            }
            _ => None,
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }
}

/// Anchor of a label relative to its parent container.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Align {
    #[default]
    TopLeft,
    TopMid,
    TopRight,
    LeftMid,
    Center,
    RightMid,
    BottomLeft,
    BottomMid,
    BottomRight,
}

/// Descriptor alignment names. `DEFAULT` is the toolkit's alias for top-left.
const ALIGN_NAMES: [(&str, Align); 10] = [
    ("DEFAULT", Align::TopLeft),
    ("TOP_LEFT", Align::TopLeft),
    ("TOP_MID", Align::TopMid),
    ("TOP_RIGHT", Align::TopRight),
    ("LEFT_MID", Align::LeftMid),
    ("CENTER", Align::Center),
    ("RIGHT_MID", Align::RightMid),
    ("BOTTOM_LEFT", Align::BottomLeft),
    ("BOTTOM_MID", Align::BottomMid),
    ("BOTTOM_RIGHT", Align::BottomRight),
];

impl Align {
    /// Map a descriptor alignment name. Unknown names fall back to top-left.
    pub fn from_name(name: &str) -> Self {
        ALIGN_NAMES
            .iter()
            .find(|(n, _)| *n == name)
            .map(|(_, a)| *a)
            .unwrap_or_default()
    }

    /// Anchor point inside a `width` x `height` container.
    pub fn anchor(self, width: i32, height: i32) -> (i32, i32) {
        let (cx, cy) = (width / 2, height / 2);
        match self {
            Align::TopLeft => (0, 0),
            Align::TopMid => (cx, 0),
            Align::TopRight => (width, 0),
            Align::LeftMid => (0, cy),
            Align::Center => (cx, cy),
            Align::RightMid => (width, cy),
            Align::BottomLeft => (0, height),
            Align::BottomMid => (cx, height),
            Align::BottomRight => (width, height),
        }
    }
}

/// Horizontal alignment of text inside a label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum TextAlign {
    #[default]
    Left,
    Center,
    Right,
    Auto,
}

const TEXT_ALIGN_NAMES: [(&str, TextAlign); 4] = [
    ("LEFT", TextAlign::Left),
    ("CENTER", TextAlign::Center),
    ("RIGHT", TextAlign::Right),
    ("AUTO", TextAlign::Auto),
];

impl TextAlign {
    /// Map a descriptor text-alignment name. Unknown names fall back to left.
    pub fn from_name(name: &str) -> Self {
        TEXT_ALIGN_NAMES
            .iter()
            .find(|(n, _)| *n == name)
            .map(|(_, a)| *a)
            .unwrap_or_default()
    }
}

/// Offset of a label from its alignment anchor, in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_color_six_digit() {
        assert_eq!(Color::from_hex("#1A2b3C"), Some(Color::rgb(0x1A, 0x2B, 0x3C)));
        assert_eq!(Color::from_hex("ffffff"), Some(Color::WHITE));
    }

    #[test]
    fn test_color_three_digit_expands() {
        assert_eq!(Color::from_hex("#000"), Some(Color::BLACK));
        assert_eq!(Color::from_hex("#f80"), Some(Color::rgb(0xFF, 0x88, 0x00)));
    }

    #[test]
    fn test_color_rejects_garbage() {
        assert_eq!(Color::from_hex("#12345"), None);
        assert_eq!(Color::from_hex("#gg0000"), None);
        assert_eq!(Color::from_hex(""), None);
        assert_eq!(Color::from_hex("#+12345"), None);
    }

    #[test]
    fn test_color_display() {
        assert_eq!(Color::rgb(0xAB, 0x01, 0xFF).to_string(), "#AB01FF");
    }

    #[test]
    fn test_align_names() {
        assert_eq!(Align::from_name("CENTER"), Align::Center);
        assert_eq!(Align::from_name("BOTTOM_RIGHT"), Align::BottomRight);
        assert_eq!(Align::from_name("DEFAULT"), Align::TopLeft);
    }

    #[test]
    fn test_align_unknown_defaults_top_left() {
        assert_eq!(Align::from_name("center"), Align::TopLeft);
        assert_eq!(Align::from_name("OUT_TOP_LEFT"), Align::TopLeft);
        assert_eq!(Align::from_name(""), Align::TopLeft);
    }

    #[test]
    fn test_align_anchor() {
        assert_eq!(Align::Center.anchor(240, 240), (120, 120));
        assert_eq!(Align::BottomMid.anchor(240, 200), (120, 200));
    }

    #[test]
    fn test_text_align_names() {
        assert_eq!(TextAlign::from_name("RIGHT"), TextAlign::Right);
        assert_eq!(TextAlign::from_name("JUSTIFY"), TextAlign::Left);
    }
}
