//! Servo calibration from TOML or code.

use heapless::String;
use serde::Deserialize;

use crate::error::ConfigError;

use super::units::Degrees;

/// Default minimum pulse width (SG90 class servos).
pub const DEFAULT_MIN_PULSE_US: u32 = 500;
/// Default maximum pulse width (SG90 class servos).
pub const DEFAULT_MAX_PULSE_US: u32 = 2500;
/// Default PWM frequency for analog hobby servos.
pub const DEFAULT_FREQUENCY_HZ: u32 = 50;
/// Default angle mapped to the maximum pulse.
pub const DEFAULT_MAX_ANGLE: f32 = 180.0;

/// Calibration of one servo.
///
/// `min_angle` is the angle produced by `min_pulse_us` and `max_angle` the one
/// produced by `max_pulse_us`. Giving `min_angle > max_angle` describes a
/// mechanically reversed servo. `invert` additionally flips the pulse output.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ServoConfig {
    /// Human-readable name (max 32 chars).
    pub name: String<32>,

    /// Pulse width at `min_angle`.
    pub min_pulse_us: u32,

    /// Pulse width at `max_angle`.
    pub max_pulse_us: u32,

    /// PWM frequency in Hz.
    pub frequency_hz: u32,

    /// Angle at the minimum pulse.
    pub min_angle: Degrees,

    /// Angle at the maximum pulse.
    pub max_angle: Degrees,

    /// Invert the pulse mapping.
    pub invert: bool,
}

impl Default for ServoConfig {
    fn default() -> Self {
        Self {
            name: String::new(),
            min_pulse_us: DEFAULT_MIN_PULSE_US,
            max_pulse_us: DEFAULT_MAX_PULSE_US,
            frequency_hz: DEFAULT_FREQUENCY_HZ,
            min_angle: Degrees(0.0),
            max_angle: Degrees(DEFAULT_MAX_ANGLE),
            invert: false,
        }
    }
}

impl ServoConfig {
    /// Create a validated configuration.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if the pulse or angle bounds are unusable.
    pub fn new(
        min_pulse_us: u32,
        max_pulse_us: u32,
        frequency_hz: u32,
        min_angle: Degrees,
        max_angle: Degrees,
        invert: bool,
    ) -> Result<Self, ConfigError> {
        let config = Self {
            name: String::new(),
            min_pulse_us,
            max_pulse_us,
            frequency_hz,
            min_angle,
            max_angle,
            invert,
        };
        config.validate()?;
        Ok(config)
    }

    /// TowerPro SG90: 500-2500 us over 180 degrees at 50 Hz.
    pub fn sg90() -> Self {
        Self::default()
    }

    /// MG995 class servo: 1000-2000 us over 180 degrees at 50 Hz.
    pub fn mg995() -> Self {
        Self {
            min_pulse_us: 1000,
            max_pulse_us: 2000,
            ..Self::default()
        }
    }

    /// PWM period in microseconds, or 0 if the frequency is 0.
    #[inline]
    pub fn period_us(&self) -> u32 {
        1_000_000u32.checked_div(self.frequency_hz).unwrap_or(0)
    }

    /// Interval between motion steps: one PWM period, at least 1 ms.
    #[inline]
    pub fn tick_interval_ms(&self) -> u32 {
        (self.period_us() / 1000).max(1)
    }

    /// Width of the usable pulse range.
    #[inline]
    pub fn pulse_span_us(&self) -> u32 {
        self.max_pulse_us.saturating_sub(self.min_pulse_us)
    }

    /// True when `min_angle > max_angle`.
    #[inline]
    pub fn is_angle_reversed(&self) -> bool {
        self.min_angle.0 > self.max_angle.0
    }

    /// Check the invariant `min_pulse_us < max_pulse_us < period_us` and that
    /// the angle bounds span a non-empty range.
    ///
    /// # Errors
    ///
    /// Returns the first violated rule.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.frequency_hz == 0 {
            return Err(ConfigError::InvalidFrequency(self.frequency_hz));
        }

        let period_us = self.period_us();
        if !(self.min_pulse_us < self.max_pulse_us && self.max_pulse_us < period_us) {
            return Err(ConfigError::InvalidPulseRange {
                min_us: self.min_pulse_us,
                max_us: self.max_pulse_us,
                period_us,
            });
        }

        if !self.min_angle.is_finite()
            || !self.max_angle.is_finite()
            || self.min_angle.0 == self.max_angle.0
        {
            return Err(ConfigError::InvalidAngleRange {
                min: self.min_angle.0,
                max: self.max_angle.0,
            });
        }

        Ok(())
    }
}
