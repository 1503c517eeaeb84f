//! Battery gauge backed by the kernel power-supply class.

use std::path::PathBuf;
use watchface_core::BatteryGauge;

/// Default capacity attribute of the first battery.
pub const DEFAULT_CAPACITY_PATH: &str = "/sys/class/power_supply/BAT0/capacity";

/// Reads the charge level from a sysfs `capacity` file on every call.
pub struct SysfsBattery {
    path: PathBuf,
}

impl SysfsBattery {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Gauge for the first battery, if the system has one.
    pub fn detect() -> Option<Self> {
        let path = PathBuf::from(DEFAULT_CAPACITY_PATH);
        path.exists().then(|| Self::new(path))
    }
}

impl BatteryGauge for SysfsBattery {
    fn battery_percent(&self) -> Option<u8> {
        let raw = match std::fs::read_to_string(&self.path) {
            Ok(s) => s,
            Err(e) => {
                tracing::debug!(path = %self.path.display(), error = %e, "battery capacity unreadable");
                return None;
            }
        };
        match raw.trim().parse::<u32>() {
            Ok(v) => Some(v.min(100) as u8),
            Err(e) => {
                tracing::debug!(value = raw.trim(), error = %e, "battery capacity not a number");
                None
            }
        }
    }
}
