//! System configuration - root configuration structure.

use heapless::{FnvIndexMap, String};
use serde::Deserialize;

use crate::error::ConfigError;
use crate::motion::MotionRequest;

use super::motion::MotionConfig;
use super::servo::ServoConfig;

/// Root configuration structure from TOML.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SystemConfig {
    /// Named servo calibrations.
    #[serde(default)]
    pub servos: FnvIndexMap<String<32>, ServoConfig, 8>,

    /// Named motion presets.
    #[serde(default)]
    pub motions: FnvIndexMap<String<32>, MotionConfig, 32>,
}

impl SystemConfig {
    /// Get a servo configuration by name.
    pub fn servo(&self, name: &str) -> Option<&ServoConfig> {
        self.servos
            .iter()
            .find(|(k, _)| k.as_str() == name)
            .map(|(_, v)| v)
    }

    /// Get a motion preset by name.
    pub fn motion(&self, name: &str) -> Option<&MotionConfig> {
        self.motions
            .iter()
            .find(|(k, _)| k.as_str() == name)
            .map(|(_, v)| v)
    }

    /// Build the request for a motion preset.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MotionNotFound`] for an unknown preset.
    pub fn motion_request(&self, name: &str) -> Result<MotionRequest, ConfigError> {
        self.motion(name).map(MotionConfig::request).ok_or_else(|| {
            ConfigError::MotionNotFound(String::try_from(name).unwrap_or_default())
        })
    }

    /// List all servo names.
    pub fn servo_names(&self) -> impl Iterator<Item = &str> {
        self.servos.keys().map(|s| s.as_str())
    }

    /// List all motion preset names.
    pub fn motion_names(&self) -> impl Iterator<Item = &str> {
        self.motions.keys().map(|s| s.as_str())
    }
}
