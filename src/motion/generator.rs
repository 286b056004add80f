//! Motion generation - one pulse width per PWM period.

use core::iter::FusedIterator;

use super::curve::Curve;

/// Direction of pulse-width travel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Direction {
    /// Pulse width grows toward the target.
    Increasing,
    /// Pulse width shrinks toward the target.
    Decreasing,
}

impl Direction {
    /// Direction of travel from `start` to `end`.
    #[inline]
    pub fn between(start: u32, end: u32) -> Self {
        if end >= start {
            Direction::Increasing
        } else {
            Direction::Decreasing
        }
    }
}

/// One step of a motion: write `pulse_us`, then wait `interval_ms`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct MotionStep {
    /// Pulse width to apply.
    pub pulse_us: u32,
    /// Time until the next step.
    pub interval_ms: u32,
}

/// Lazy, finite sequence of pulse widths from a start to an end pulse.
///
/// The generator walks simulated time forward by one PWM period per step and
/// evaluates the curve on the elapsed fraction of the duration. The curve
/// drives the distance travelled from `start_us`; the direction decides
/// whether that distance is added or subtracted. The last step is always
/// exactly `end_us`.
///
/// A generator cannot be rewound. Build a new one for every request.
#[derive(Debug, Clone)]
pub struct MotionGenerator {
    start_us: u32,
    end_us: u32,
    duration_ms: u32,
    interval_ms: u32,
    curve: Curve,
    elapsed_ms: u32,
    finished: bool,
}

impl MotionGenerator {
    /// Create a generator. `interval_ms` is raised to at least 1.
    pub fn new(start_us: u32, end_us: u32, duration_ms: u32, interval_ms: u32, curve: Curve) -> Self {
        Self {
            start_us,
            end_us,
            duration_ms,
            interval_ms: interval_ms.max(1),
            curve,
            elapsed_ms: 0,
            finished: false,
        }
    }

    /// Pulse width the motion starts from.
    #[inline]
    pub fn start_us(&self) -> u32 {
        self.start_us
    }

    /// Pulse width the motion ends on.
    #[inline]
    pub fn end_us(&self) -> u32 {
        self.end_us
    }

    /// Total duration in milliseconds.
    #[inline]
    pub fn duration_ms(&self) -> u32 {
        self.duration_ms
    }

    /// Simulated time consumed so far.
    #[inline]
    pub fn elapsed_ms(&self) -> u32 {
        self.elapsed_ms
    }

    /// Step interval (one PWM period).
    #[inline]
    pub fn interval_ms(&self) -> u32 {
        self.interval_ms
    }

    /// Easing curve in use.
    #[inline]
    pub fn curve(&self) -> Curve {
        self.curve
    }

    /// Direction of travel.
    #[inline]
    pub fn direction(&self) -> Direction {
        Direction::between(self.start_us, self.end_us)
    }

    /// Check if the final step has been produced.
    #[inline]
    pub fn is_complete(&self) -> bool {
        self.finished
    }

    /// Number of steps a fresh generator produces.
    pub fn total_steps(&self) -> u32 {
        self.duration_ms.div_ceil(self.interval_ms).max(1)
    }

    /// Steps still to be produced.
    pub fn steps_remaining(&self) -> u32 {
        if self.finished {
            0
        } else {
            let left = self.duration_ms.saturating_sub(self.elapsed_ms);
            left.div_ceil(self.interval_ms).max(1)
        }
    }

    /// Get progress as a fraction (0.0 to 1.0).
    #[inline]
    pub fn progress(&self) -> f32 {
        if self.finished {
            1.0
        } else if self.duration_ms == 0 {
            0.0
        } else {
            (self.elapsed_ms as f32 / self.duration_ms as f32).min(1.0)
        }
    }

    /// Produce the next step, or `None` once the motion is complete.
    pub fn advance(&mut self) -> Option<MotionStep> {
        if self.finished {
            return None;
        }

        self.elapsed_ms = self.elapsed_ms.saturating_add(self.interval_ms);

        let pulse_us = if self.elapsed_ms >= self.duration_ms {
            self.finished = true;
            self.end_us
        } else {
            self.pulse_at(self.elapsed_ms as f32 / self.duration_ms as f32)
        };

        Some(MotionStep {
            pulse_us,
            interval_ms: self.interval_ms,
        })
    }

    /// Pulse width at a progress fraction, without advancing.
    ///
    /// Back curves may land outside `[start_us, end_us]`; the result is only
    /// floored at zero.
    pub fn pulse_at(&self, progress: f32) -> u32 {
        let span = self.start_us.abs_diff(self.end_us) as f32;
        let travelled = self.curve.ease(progress) * span;
        let value = match self.direction() {
            Direction::Increasing => self.start_us as f32 + travelled,
            Direction::Decreasing => self.start_us as f32 - travelled,
        };

        if value <= 0.0 {
            0
        } else {
            value as u32
        }
    }
}

impl Iterator for MotionGenerator {
    type Item = MotionStep;

    fn next(&mut self) -> Option<Self::Item> {
        self.advance()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let n = self.steps_remaining() as usize;
        (n, Some(n))
    }
}

impl ExactSizeIterator for MotionGenerator {}

impl FusedIterator for MotionGenerator {}
