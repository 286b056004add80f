//! Motion requests.

use crate::config::units::Degrees;
use crate::scheduler::OnComplete;

use super::curve::Curve;

/// A request to move a servo to an angle over time.
///
/// Consumed by a scheduler to build a [`MotionGenerator`](super::MotionGenerator).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MotionRequest {
    /// Target angle (clamped to the servo's range when planned).
    pub target: Degrees,
    /// Duration of the move in milliseconds. Zero jumps on the first step.
    pub duration_ms: u32,
    /// Easing curve.
    pub curve: Curve,
    /// Called once when the motion finishes. Never called if the motion is
    /// replaced or released first.
    pub on_complete: Option<OnComplete>,
}

impl MotionRequest {
    /// Linear move without a callback.
    pub fn new(target: impl Into<Degrees>, duration_ms: u32) -> Self {
        Self {
            target: target.into(),
            duration_ms,
            curve: Curve::Linear,
            on_complete: None,
        }
    }

    /// Use a different easing curve.
    #[must_use]
    pub fn with_curve(mut self, curve: Curve) -> Self {
        self.curve = curve;
        self
    }

    /// Attach a completion callback.
    #[must_use]
    pub fn on_complete(mut self, callback: OnComplete) -> Self {
        self.on_complete = Some(callback);
        self
    }
}
