//! Servo module for servo-pdm.
//!
//! Angle/pulse mapping, the PWM output seam, and the servo driver.

mod builder;
mod driver;
mod mapper;
mod output;
mod state;

pub use builder::ServoBuilder;
pub use driver::ServoPdm;
pub use mapper::AngleMapper;
pub use output::{DutyCycleOutput, PulseOutput};
pub use state::{MotionState, ServoState};
