//! Servo driver.
//!
//! Generic over the PWM output. Holds calibration and state; knows nothing
//! about time. Schedulers ask it for a [`MotionGenerator`] and feed each step
//! back through [`ServoPdm::apply`].

use crate::config::units::{us_to_ns, Degrees};
use crate::config::ServoConfig;
use crate::error::{OutputError, Result};
use crate::motion::{MotionGenerator, MotionRequest, MotionStep};

use super::mapper::AngleMapper;
use super::output::PulseOutput;
use super::state::ServoState;

/// Hobby servo on a PWM output.
pub struct ServoPdm<P>
where
    P: PulseOutput,
{
    /// PWM channel.
    output: P,

    /// Calibration, validated at construction.
    config: ServoConfig,

    /// Angle/pulse mapping derived from `config`.
    mapper: AngleMapper,

    /// Last commanded angle and applied pulse.
    state: ServoState,
}

impl<P> ServoPdm<P>
where
    P: PulseOutput,
{
    /// Create a servo and configure the PWM frequency.
    ///
    /// The output is not driven until the first angle or pulse is set.
    ///
    /// # Errors
    ///
    /// Returns a configuration error for invalid calibration, or
    /// [`OutputError::Configure`] if the PWM rejects the frequency.
    pub fn new(mut output: P, config: ServoConfig) -> Result<Self> {
        let mapper = AngleMapper::new(&config)?;
        output
            .configure(config.frequency_hz)
            .map_err(|_| OutputError::Configure)?;

        info!(
            "servo '{}': {}-{} us at {} Hz",
            config.name.as_str(),
            config.min_pulse_us,
            config.max_pulse_us,
            config.frequency_hz
        );

        Ok(Self {
            output,
            mapper,
            state: ServoState::new(config.min_angle),
            config,
        })
    }

    /// Get the servo name.
    #[inline]
    pub fn name(&self) -> &str {
        self.config.name.as_str()
    }

    /// Get the calibration.
    #[inline]
    pub fn config(&self) -> &ServoConfig {
        &self.config
    }

    /// Get the angle/pulse mapper.
    #[inline]
    pub fn mapper(&self) -> &AngleMapper {
        &self.mapper
    }

    /// Get the runtime state.
    #[inline]
    pub fn state(&self) -> &ServoState {
        &self.state
    }

    /// Last commanded angle.
    #[inline]
    pub fn angle(&self) -> Degrees {
        self.state.angle()
    }

    /// Pulse width currently emitted, 0 when released.
    #[inline]
    pub fn pulse_us(&self) -> u32 {
        self.state.pulse_us()
    }

    /// True when the output emits no pulses.
    #[inline]
    pub fn is_released(&self) -> bool {
        self.state.is_released()
    }

    /// Interval between motion steps (one PWM period).
    #[inline]
    pub fn tick_interval_ms(&self) -> u32 {
        self.config.tick_interval_ms()
    }

    /// Move straight to an angle, clamped to the calibrated range.
    ///
    /// Returns the pulse width written.
    pub fn set_angle(&mut self, angle: impl Into<Degrees>) -> Result<u32> {
        let angle = self.mapper.clamp_angle(angle.into());
        let pulse_us = self.mapper.angle_to_pulse(angle);
        self.write_pulse(pulse_us)?;
        self.state.set_angle(angle);
        Ok(pulse_us)
    }

    /// Write a raw pulse width, bypassing the angle mapping.
    ///
    /// Meant for finding a servo's pulse limits. The stored angle is kept.
    pub fn set_pulse(&mut self, pulse_us: u32) -> Result<()> {
        self.write_pulse(pulse_us)
    }

    /// Stop emitting pulses so the servo stops holding torque.
    ///
    /// The stored angle is kept.
    pub fn release(&mut self) -> Result<()> {
        debug!("servo '{}': release", self.name());
        self.write_pulse(0)
    }

    /// Shut the PWM channel down.
    pub fn deinit(&mut self) -> Result<()> {
        self.output.deinit().map_err(|_| OutputError::Deinit)?;
        self.state.set_pulse(0);
        Ok(())
    }

    /// Give the output back.
    pub fn into_output(self) -> P {
        self.output
    }

    /// Plan a motion from the current pulse to the request's target.
    ///
    /// The clamped target becomes the stored angle. A released servo starts
    /// from the pulse of its stored angle rather than from zero.
    pub fn plan_motion(&mut self, request: &MotionRequest) -> MotionGenerator {
        let target = self.mapper.clamp_angle(request.target);
        let start_us = if self.state.is_released() {
            self.mapper.angle_to_pulse(self.state.angle())
        } else {
            self.state.pulse_us()
        };
        let end_us = self.mapper.angle_to_pulse(target);
        self.state.set_angle(target);

        debug!(
            "servo '{}': {} -> {} us over {} ms ({})",
            self.name(),
            start_us,
            end_us,
            request.duration_ms,
            request.curve.name()
        );

        MotionGenerator::new(
            start_us,
            end_us,
            request.duration_ms,
            self.tick_interval_ms(),
            request.curve,
        )
    }

    /// Apply one motion step.
    #[inline]
    pub fn apply(&mut self, step: &MotionStep) -> Result<()> {
        self.write_pulse(step.pulse_us)
    }

    fn write_pulse(&mut self, pulse_us: u32) -> Result<()> {
        self.output
            .set_pulse_ns(us_to_ns(pulse_us))
            .map_err(|_| OutputError::Write)?;
        self.state.set_pulse(pulse_us);
        Ok(())
    }
}
