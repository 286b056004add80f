//! Angle to pulse-width mapping.

use crate::config::units::Degrees;
use crate::config::ServoConfig;
use crate::error::ConfigError;

/// Pure mapping between angles and pulse widths for one calibration.
///
/// Both angle orientations share one formula: the reference point is always
/// `min_angle` (the angle at `min_pulse_us`), and clamping uses the numeric
/// bounds of the range whichever way round they were given.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AngleMapper {
    min_pulse_us: u32,
    max_pulse_us: u32,
    min_angle: f32,
    max_angle: f32,
    invert: bool,
}

impl AngleMapper {
    /// Build a mapper from a calibration.
    ///
    /// # Errors
    ///
    /// Returns the calibration's validation error; the mapping arithmetic
    /// relies on `min_pulse_us < max_pulse_us` and distinct angle bounds.
    pub fn new(config: &ServoConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            min_pulse_us: config.min_pulse_us,
            max_pulse_us: config.max_pulse_us,
            min_angle: config.min_angle.0,
            max_angle: config.max_angle.0,
            invert: config.invert,
        })
    }

    /// Numeric low and high bounds of the angle range.
    #[inline]
    pub fn angle_bounds(&self) -> (Degrees, Degrees) {
        (
            Degrees(self.min_angle.min(self.max_angle)),
            Degrees(self.min_angle.max(self.max_angle)),
        )
    }

    /// Width of the angle range.
    #[inline]
    pub fn angle_range(&self) -> f32 {
        Degrees(self.max_angle).distance(Degrees(self.min_angle))
    }

    /// Saturate an angle into the configured range. NaN maps to `min_angle`.
    pub fn clamp_angle(&self, angle: Degrees) -> Degrees {
        if angle.0.is_nan() {
            return Degrees(self.min_angle);
        }
        let (lo, hi) = self.angle_bounds();
        Degrees(angle.0.clamp(lo.0, hi.0))
    }

    /// Fraction of the way from `min_angle` to `max_angle`, before inversion.
    fn fraction(&self, angle: Degrees) -> f32 {
        let angle = self.clamp_angle(angle);
        (libm::fabsf(angle.0 - self.min_angle) / self.angle_range()).clamp(0.0, 1.0)
    }

    /// Pulse width for an angle, truncated to whole microseconds.
    pub fn angle_to_pulse(&self, angle: Degrees) -> u32 {
        let mut percent = self.fraction(angle);
        if self.invert {
            percent = 1.0 - percent;
        }

        let span = (self.max_pulse_us - self.min_pulse_us) as f32;
        let pulse = self.min_pulse_us as f32 + span * percent;
        (pulse as u32).clamp(self.min_pulse_us, self.max_pulse_us)
    }

    /// Angle for a pulse width. Pulses outside the range saturate.
    pub fn pulse_to_angle(&self, pulse_us: u32) -> Degrees {
        let pulse = pulse_us.clamp(self.min_pulse_us, self.max_pulse_us);
        let span = (self.max_pulse_us - self.min_pulse_us) as f32;
        let mut percent = (pulse - self.min_pulse_us) as f32 / span;
        if self.invert {
            percent = 1.0 - percent;
        }

        Degrees(self.min_angle + percent * (self.max_angle - self.min_angle))
    }
}
