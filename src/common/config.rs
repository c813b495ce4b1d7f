use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display};
use thiserror::Error;

use crate::common::collections::HashSet;

pub const DEFAULT_THROTTLE_MS: u64 = 50;
pub const POINT_DELAY_MS: u64 = 100;
pub const DISPLAY_DELAY_MS: u64 = 150;
pub const DEFAULT_MIN_WINDOW_SIZE: f64 = 50.0;
pub const DEFAULT_POSITION_TOLERANCE: f64 = 5.0;

const DEFAULT_IGNORED_OWNERS: &[&str] = &[
    "Dock",
    "Window Server",
    "SystemUIServer",
    "Control Center",
    "Notification Center",
    "Spotlight",
    "WindowManager",
    "loginwindow",
];

pub fn config_file() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("/"))
        .join(".config")
        .join("autoraise")
        .join("config.toml")
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("invalid setting `{field}`: {reason}")]
    Invalid { field: &'static str, reason: &'static str },
}

/// How the target window is chosen.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    Display,
    AsRefStr,
    clap::ValueEnum
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum RaisePolicy {
    /// Raise the window under the cursor.
    #[default]
    Point,
    /// Raise the frontmost window of the monitor the cursor just entered.
    Display,
}

impl RaisePolicy {
    pub fn default_delay(self) -> Duration {
        match self {
            RaisePolicy::Point => Duration::from_millis(POINT_DELAY_MS),
            RaisePolicy::Display => Duration::from_millis(DISPLAY_DELAY_MS),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub settings: Settings,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    pub policy: RaisePolicy,
    /// Minimum spacing between processed mouse-move samples.
    pub throttle_ms: u64,
    /// Dwell time before a pending raise commits. Defaults per policy.
    pub delay_ms: Option<u64>,
    /// Windows narrower or shorter than this are ignored by the display policy.
    pub min_window_size: f64,
    /// Per-axis slack when correlating window-list and accessibility windows.
    pub position_tolerance: f64,
    /// Owner names whose windows the display policy never raises.
    pub ignored_owners: Vec<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            policy: RaisePolicy::default(),
            throttle_ms: DEFAULT_THROTTLE_MS,
            delay_ms: None,
            min_window_size: DEFAULT_MIN_WINDOW_SIZE,
            position_tolerance: DEFAULT_POSITION_TOLERANCE,
            ignored_owners: DEFAULT_IGNORED_OWNERS.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl Settings {
    pub fn throttle(&self) -> Duration { Duration::from_millis(self.throttle_ms) }

    pub fn delay(&self) -> Duration {
        self.delay_ms.map(Duration::from_millis).unwrap_or_else(|| self.policy.default_delay())
    }

    pub fn ignored_owner_set(&self) -> HashSet<String> {
        self.ignored_owners.iter().cloned().collect()
    }
}

impl Config {
    /// Reads `path`, or the default location when `path` is `None`. A missing
    /// default file yields the default config.
    pub fn load(path: Option<&Path>) -> Result<Config, ConfigError> {
        match path {
            Some(path) => Config::read(path),
            None => {
                let default = config_file();
                if default.exists() {
                    Config::read(&default)
                } else {
                    Ok(Config::default())
                }
            }
        }
    }

    pub fn read(path: &Path) -> Result<Config, ConfigError> {
        let buf = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Config::parse(&buf)
    }

    pub fn parse(buf: &str) -> Result<Config, ConfigError> {
        let config: Config = toml::from_str(buf)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let s = &self.settings;
        if s.throttle_ms == 0 {
            return Err(ConfigError::Invalid {
                field: "throttle_ms",
                reason: "must be greater than zero",
            });
        }
        if s.min_window_size.is_nan() || s.min_window_size < 0.0 {
            return Err(ConfigError::Invalid {
                field: "min_window_size",
                reason: "must be a non-negative number",
            });
        }
        if s.position_tolerance.is_nan() || s.position_tolerance < 0.0 {
            return Err(ConfigError::Invalid {
                field: "position_tolerance",
                reason: "must be a non-negative number",
            });
        }
        Ok(())
    }

    pub fn to_toml(&self) -> Result<String, toml::ser::Error> { toml::to_string(self) }
}
