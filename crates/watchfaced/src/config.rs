use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("cannot read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config file {path}: {source}")]
    Toml {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

/// Daemon configuration: defaults, then an optional TOML file named by
/// `WATCHFACE_CONFIG`, then `WATCHFACE_*` environment overrides.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Directory holding one sub-directory per face.
    pub faces_dir: PathBuf,
    /// Shared directory label fonts are resolved against.
    pub fonts_dir: PathBuf,
    /// Where the last-used face record is kept.
    pub state_dir: PathBuf,
    /// Label refresh period in milliseconds.
    pub tick_ms: u64,
    /// Width of the previous/next tap zones, as a percent of screen width.
    pub margin_percent: u32,
    pub width: u32,
    pub height: u32,
    /// sysfs `capacity` file. When unset the first system battery is probed.
    pub battery_path: Option<PathBuf>,
    /// Persist the face on every navigation instead of only at shutdown.
    pub persist_on_navigate: bool,
}

impl Default for Config {
    fn default() -> Self {
        let state_dir = std::env::var("XDG_STATE_HOME")
            .map(PathBuf::from)
            .unwrap_or_else(|_| {
                let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".to_string());
                PathBuf::from(home).join(".local/state")
            })
            .join("watchface");

        Self {
            faces_dir: PathBuf::from("faces"),
            fonts_dir: PathBuf::from("fonts"),
            state_dir,
            tick_ms: 1000,
            margin_percent: watchface_core::DEFAULT_MARGIN_PERCENT,
            width: 240,
            height: 240,
            battery_path: None,
            persist_on_navigate: false,
        }
    }
}

impl Config {
    /// Load configuration from the process environment.
    pub fn load() -> Result<Self, ConfigError> {
        let lookup = |key: &str| std::env::var(key).ok();
        let mut config = match lookup("WATCHFACE_CONFIG") {
            Some(path) => Self::from_file(Path::new(&path))?,
            None => Self::default(),
        };
        config.apply_env(lookup);
        Ok(config)
    }

    /// Parse a TOML file. Missing keys keep their defaults.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&text).map_err(|source| ConfigError::Toml {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Override fields from `WATCHFACE_*` variables. Unparseable numbers
    /// are ignored with a warning.
    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(v) = lookup("WATCHFACE_FACES_DIR") {
            self.faces_dir = PathBuf::from(v);
        }
        if let Some(v) = lookup("WATCHFACE_FONTS_DIR") {
            self.fonts_dir = PathBuf::from(v);
        }
        if let Some(v) = lookup("WATCHFACE_STATE_DIR") {
            self.state_dir = PathBuf::from(v);
        }
        if let Some(v) = lookup("WATCHFACE_BATTERY_PATH") {
            self.battery_path = Some(PathBuf::from(v));
        }
        env_parse(&lookup, "WATCHFACE_TICK_MS", &mut self.tick_ms);
        env_parse(&lookup, "WATCHFACE_MARGIN_PERCENT", &mut self.margin_percent);
        env_parse(&lookup, "WATCHFACE_WIDTH", &mut self.width);
        env_parse(&lookup, "WATCHFACE_HEIGHT", &mut self.height);
        if let Some(v) = lookup("WATCHFACE_PERSIST_ON_NAVIGATE") {
            self.persist_on_navigate = v != "0" && !v.eq_ignore_ascii_case("false");
        }
        // A zero period would spin the scheduler.
        self.tick_ms = self.tick_ms.max(10);
    }
}

fn env_parse<T: std::str::FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
    target: &mut T,
) {
    if let Some(raw) = lookup(key) {
        match raw.parse() {
            Ok(v) => *target = v,
            Err(_) => tracing::warn!(key, value = %raw, "ignoring unparseable override"),
        }
    }
}
