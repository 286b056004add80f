//! Servo runtime state.

use crate::config::units::Degrees;

/// Last commanded angle and last applied pulse of a servo.
///
/// Only the driver mutates it, through its set-angle and set-pulse paths.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ServoState {
    angle: Degrees,
    pulse_us: u32,
}

impl ServoState {
    /// Fresh state: resting at `angle`, output not driven yet.
    #[inline]
    pub(crate) fn new(angle: Degrees) -> Self {
        Self { angle, pulse_us: 0 }
    }

    /// Last commanded angle (kept across a release).
    #[inline]
    pub fn angle(&self) -> Degrees {
        self.angle
    }

    /// Pulse width last written to the output, 0 when released.
    #[inline]
    pub fn pulse_us(&self) -> u32 {
        self.pulse_us
    }

    /// True when no pulse is being emitted.
    #[inline]
    pub fn is_released(&self) -> bool {
        self.pulse_us == 0
    }

    #[inline]
    pub(crate) fn set_angle(&mut self, angle: Degrees) {
        self.angle = angle;
    }

    #[inline]
    pub(crate) fn set_pulse(&mut self, pulse_us: u32) {
        self.pulse_us = pulse_us;
    }
}

/// Scheduler-level motion state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MotionState {
    /// No motion in flight.
    #[default]
    Idle,
    /// A motion is being pumped to completion.
    Running,
}
