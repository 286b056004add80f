//! Builder pattern for ServoPdm.

use crate::config::units::Degrees;
use crate::config::{ServoConfig, SystemConfig};
use crate::error::{ConfigError, Error, Result};

use super::driver::ServoPdm;
use super::output::PulseOutput;

/// Builder for creating ServoPdm instances.
pub struct ServoBuilder<P>
where
    P: PulseOutput,
{
    output: Option<P>,
    config: ServoConfig,
}

impl<P> Default for ServoBuilder<P>
where
    P: PulseOutput,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<P> ServoBuilder<P>
where
    P: PulseOutput,
{
    /// Create a new builder with the SG90 calibration.
    pub fn new() -> Self {
        Self {
            output: None,
            config: ServoConfig::default(),
        }
    }

    /// Set the PWM output.
    pub fn output(mut self, output: P) -> Self {
        self.output = Some(output);
        self
    }

    /// Set the servo name. Names longer than 32 bytes are dropped.
    pub fn name(mut self, name: &str) -> Self {
        self.config.name = heapless::String::try_from(name).unwrap_or_default();
        self
    }

    /// Set the pulse widths at `min_angle` and `max_angle`.
    pub fn pulse_range(mut self, min_us: u32, max_us: u32) -> Self {
        self.config.min_pulse_us = min_us;
        self.config.max_pulse_us = max_us;
        self
    }

    /// Set the angles at the minimum and maximum pulse.
    ///
    /// `min > max` describes a mechanically reversed servo.
    pub fn angle_range(mut self, min: impl Into<Degrees>, max: impl Into<Degrees>) -> Self {
        self.config.min_angle = min.into();
        self.config.max_angle = max.into();
        self
    }

    /// Set the PWM frequency.
    pub fn frequency(mut self, frequency_hz: u32) -> Self {
        self.config.frequency_hz = frequency_hz;
        self
    }

    /// Set output inversion.
    pub fn invert(mut self, invert: bool) -> Self {
        self.config.invert = invert;
        self
    }

    /// Take every calibration field from a ServoConfig.
    pub fn from_servo_config(mut self, config: &ServoConfig) -> Self {
        self.config = config.clone();
        self
    }

    /// Configure from SystemConfig by servo name.
    pub fn from_config(self, config: &SystemConfig, servo_name: &str) -> Result<Self> {
        let servo_config = config.servo(servo_name).ok_or_else(|| {
            Error::Config(ConfigError::ServoNotFound(
                heapless::String::try_from(servo_name).unwrap_or_default(),
            ))
        })?;

        Ok(self.from_servo_config(servo_config))
    }

    /// Build the ServoPdm.
    ///
    /// # Errors
    ///
    /// Returns an error if the output is missing or the calibration is invalid.
    pub fn build(self) -> Result<ServoPdm<P>> {
        let output = self
            .output
            .ok_or(Error::Config(ConfigError::MissingField("output")))?;

        ServoPdm::new(output, self.config)
    }
}
