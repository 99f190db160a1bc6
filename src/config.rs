use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::converter::DEFAULT_JPEG_QUALITY;
use crate::error::ConfigError;

/// Machine-local settings. Everything here is about the environment the
/// conversion runs in, not about which file gets converted.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct Settings {
    /// Directory holding the pdfium shared library
    pub pdfium_library_dir: Option<PathBuf>,
    pub jpeg_quality: u8,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            pdfium_library_dir: None,
            jpeg_quality: DEFAULT_JPEG_QUALITY,
        }
    }
}

/// `<config dir>/pdf2jpg/config.json`, if the platform has a config dir.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|base| base.join("pdf2jpg").join("config.json"))
}

impl Settings {
    /// Load settings from `path`. A missing file gives the defaults.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            log::debug!("no settings at {:?}, using defaults", path);
            return Ok(Self::default());
        }
        let raw = fs::read_to_string(path)?;
        let settings = serde_json::from_str(&raw)?;
        log::debug!("loaded settings from {:?}", path);
        Ok(settings)
    }

    /// Load from `explicit` if given, otherwise from the default location.
    pub fn discover(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        match explicit {
            Some(path) => Self::load(path),
            None => match default_config_path() {
                Some(path) => Self::load(&path),
                None => Ok(Self::default()),
            },
        }
    }
}
