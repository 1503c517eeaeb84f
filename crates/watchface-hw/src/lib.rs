//! watchface-hw: Display-side capabilities for the face session.
//!
//! Provides the render surface interface (plus an in-memory headless
//! implementation), the per-face font cache over a pluggable font loader,
//! the scene builders that put a descriptor on a surface, and a sysfs
//! battery gauge.

pub mod battery;
pub mod fonts;
pub mod headless;
pub mod scene;
pub mod surface;

pub use battery::SysfsBattery;
pub use fonts::{FontCache, FontHandle, FontLoader, FsFontLoader};
pub use headless::{HeadlessSurface, LabelWidget};
pub use scene::{build_background, build_label, LabelInstance};
pub use surface::{ContainerId, LabelHandle, LabelStyle, RenderSurface, ResourceError};
