//! Configuration module for servo-pdm.
//!
//! Provides servo calibration and named motion presets, loadable from TOML
//! files (with `std` feature) or built in code.

mod motion;
mod servo;
mod system;
pub mod units;
#[cfg(feature = "std")]
mod loader;
mod validation;

pub use motion::MotionConfig;
pub use servo::{
    ServoConfig, DEFAULT_FREQUENCY_HZ, DEFAULT_MAX_ANGLE, DEFAULT_MAX_PULSE_US,
    DEFAULT_MIN_PULSE_US,
};
pub use system::SystemConfig;
pub use validation::validate_config;

#[cfg(feature = "std")]
pub use loader::{load_config, parse_config};

// Re-export unit types at config level
pub use units::{Degrees, UnitExt};
