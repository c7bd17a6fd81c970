use std::fs;
use std::path::{Path, PathBuf};

use attendance_core::shared::constants::{
    DEFAULT_CAMERA_DEVICE, DEFAULT_COOLDOWN_SECS, DEFAULT_COURSE, DEFAULT_FRAME_DELAY_MS,
    DEFAULT_FRAME_INTERVAL, DEFAULT_JPEG_QUALITY, DEFAULT_RESOLUTION, DEFAULT_ROSTER,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SettingsError {
    #[error("failed to read settings {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("invalid settings file {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
}

/// Server configuration. Absent keys take their defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub host: String,
    pub port: u16,
    pub camera_device: String,
    pub resolution: (u32, u32),
    pub frame_interval: (u32, u32),
    pub frame_delay_ms: u64,
    pub jpeg_quality: u8,
    pub faces_dir: PathBuf,
    /// Cascade model file. Resolved into the cache directory when unset.
    pub model_path: Option<PathBuf>,
    /// TrueType/OpenType font for on-frame text.
    pub font_path: Option<PathBuf>,
    pub course: String,
    pub cooldown_secs: i64,
    pub roster: Vec<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 5000,
            camera_device: DEFAULT_CAMERA_DEVICE.to_string(),
            resolution: DEFAULT_RESOLUTION,
            frame_interval: DEFAULT_FRAME_INTERVAL,
            frame_delay_ms: DEFAULT_FRAME_DELAY_MS,
            jpeg_quality: DEFAULT_JPEG_QUALITY,
            faces_dir: PathBuf::from("faces"),
            model_path: None,
            font_path: None,
            course: DEFAULT_COURSE.to_string(),
            cooldown_secs: DEFAULT_COOLDOWN_SECS,
            roster: DEFAULT_ROSTER.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl Settings {
    pub fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("FaceAttendance").join("settings.json"))
    }

    /// Loads from `explicit` if given, else from the platform config path.
    ///
    /// A missing file yields defaults. A malformed file is an error when
    /// the path was given explicitly and a warning otherwise.
    pub fn load(explicit: Option<&Path>) -> Result<Self, SettingsError> {
        if let Some(path) = explicit {
            return Ok(Self::load_from(path)?.unwrap_or_default());
        }

        let Some(path) = Self::config_path() else {
            log::info!("No config directory; using default settings");
            return Ok(Self::default());
        };
        match Self::load_from(&path) {
            Ok(settings) => Ok(settings.unwrap_or_default()),
            Err(e) => {
                log::warn!("{e}; using default settings");
                Ok(Self::default())
            }
        }
    }

    /// `Ok(None)` when the file does not exist.
    pub fn load_from(path: &Path) -> Result<Option<Self>, SettingsError> {
        let json = match fs::read_to_string(path) {
            Ok(json) => json,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                log::info!("No settings at {}; using defaults", path.display());
                return Ok(None);
            }
            Err(source) => {
                return Err(SettingsError::Read {
                    path: path.to_path_buf(),
                    source,
                })
            }
        };

        let settings = serde_json::from_str(&json).map_err(|source| SettingsError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        log::info!("Loaded settings from {}", path.display());
        Ok(Some(settings))
    }
}
