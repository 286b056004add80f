//! Named motion presets from TOML.

use heapless::String;
use serde::Deserialize;

use crate::motion::{Curve, MotionRequest};

use super::units::Degrees;

/// A named motion from configuration.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct MotionConfig {
    /// Target servo name (must match a servo in config).
    pub servo: String<32>,

    /// Target angle in degrees.
    pub target_angle: Degrees,

    /// Duration of the move in milliseconds.
    #[serde(default)]
    pub duration_ms: u32,

    /// Easing curve.
    #[serde(default)]
    pub curve: Curve,
}

impl MotionConfig {
    /// Build a request for this preset without a completion callback.
    pub fn request(&self) -> MotionRequest {
        MotionRequest::new(self.target_angle, self.duration_ms).with_curve(self.curve)
    }
}
