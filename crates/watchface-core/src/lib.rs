//! watchface-core: Declarative watch face model and pure face logic.
//!
//! Parses `face.json` descriptors, resolves label templates against a
//! time/battery sample, enumerates the face catalog and classifies touch
//! input into navigation intents. Nothing here touches the display.

pub mod catalog;
pub mod descriptor;
pub mod input;
pub mod sample;
pub mod store;
pub mod template;
pub mod types;

pub use catalog::{Catalog, CatalogError, LastFace, LAST_FACE_KEY};
pub use descriptor::{Background, DescriptorError, FaceDescriptor, LabelSpec, FACE_FILE};
pub use input::{Direction, GestureDir, InputEvent, InputRouter, Intent, DEFAULT_MARGIN_PERCENT};
pub use sample::{
    BatteryGauge, Clock, FixedBattery, FixedClock, LocalClock, Sample, Sampler, TimeSample,
};
pub use store::{ConfigStore, JsonFileStore, MemoryStore, StoreError};
pub use template::{evaluate, is_dynamic, Token};
pub use types::{Align, Color, Position, TextAlign};
