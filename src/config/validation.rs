//! Configuration validation.

use crate::error::{ConfigError, Error, Result};

use super::SystemConfig;

/// Validate a system configuration.
///
/// Checks:
/// - Every servo calibration satisfies `min_pulse < max_pulse < period`
/// - Every servo has a non-empty angle range
/// - Motion presets reference existing servos and have finite targets
pub fn validate_config(config: &SystemConfig) -> Result<()> {
    for (_, servo) in config.servos.iter() {
        servo.validate()?;
    }

    for (_, motion) in config.motions.iter() {
        validate_motion(motion, config)?;
    }

    Ok(())
}

fn validate_motion(motion: &super::MotionConfig, config: &SystemConfig) -> Result<()> {
    if config.servo(motion.servo.as_str()).is_none() {
        return Err(Error::Config(ConfigError::ServoNotFound(motion.servo.clone())));
    }

    if !motion.target_angle.is_finite() {
        return Err(Error::Config(ConfigError::InvalidTarget(
            motion.target_angle.0,
        )));
    }

    Ok(())
}
