//! # servo-pdm
//!
//! Hobby servo driver for pulse-duration-modulated PWM outputs, with eased
//! motion and two interchangeable schedulers.
//!
//! ## Features
//!
//! - **Calibrated mapping**: pulse and angle bounds per servo, reversed and
//!   inverted servos included
//! - **25 easing curves**: linear, sine, polynomial, exponential, circular and
//!   back-overshoot families
//! - **Lazy motion generation**: one pulse width per PWM period, no allocation
//! - **Cooperative scheduler**: an async task fed through an embassy signal
//! - **Interrupt scheduler**: one step per periodic timer tick, guarded by a
//!   critical section
//! - **no_std compatible**: core library works without the standard library
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use servo_pdm::{Curve, DutyCycleOutput, MotionChannel, ServoPdm, ServoConfig};
//!
//! static CHANNEL: MotionChannel = MotionChannel::new();
//!
//! let servo = ServoPdm::new(DutyCycleOutput::new(pwm), ServoConfig::sg90())?;
//! spawner.spawn(servo_task(servo))?;
//!
//! CHANNEL.handle().move_to_angle(90, 2000, Curve::EaseInOutCubic, Some(done));
//! ```
//!
//! ## Feature Flags
//!
//! - `std` (default): Enables file I/O and TOML parsing
//! - `defmt`: Enables defmt logging for embedded targets
//! - `log`: Enables logging through the `log` facade

#![cfg_attr(not(feature = "std"), no_std)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]
// Allow large error types - necessary for no_std with heapless strings
#![allow(clippy::result_large_err)]

// Must come first so the logging macros are visible everywhere.
#[macro_use]
mod fmt;

// Core modules
pub mod config;
pub mod error;
pub mod motion;
pub mod scheduler;
pub mod servo;

// Re-exports for ergonomic API
pub use config::{validate_config, MotionConfig, ServoConfig, SystemConfig};
pub use error::{Error, Result};
pub use motion::{Curve, Direction, MotionGenerator, MotionRequest, MotionStep};
pub use scheduler::{IrqServo, MotionChannel, OnComplete, PeriodicTimer, ServoHandle};
pub use servo::{AngleMapper, DutyCycleOutput, MotionState, PulseOutput, ServoBuilder, ServoPdm};

// Configuration loading (std only)
#[cfg(feature = "std")]
pub use config::{load_config, parse_config};

// Unit types
pub use config::units::{Degrees, UnitExt};
