//! Motion module for servo-pdm.
//!
//! Easing curves and the generator that turns a move request into one pulse
//! width per PWM period.

mod curve;
mod generator;
mod request;

pub use curve::Curve;
pub use generator::{Direction, MotionGenerator, MotionStep};
pub use request::MotionRequest;
