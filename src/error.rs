//! Error types for servo-pdm.
//!
//! Configuration errors are the only ones that abort construction. Everything
//! raised while a motion is running is contained by the scheduler driving it.

use core::fmt;

/// Result type alias using the library's Error type.
pub type Result<T> = core::result::Result<T, Error>;

/// Unified error type for all servo-pdm operations.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error {
    /// Configuration parsing or validation error
    Config(ConfigError),
    /// The PWM output rejected an operation
    Output(OutputError),
    /// A completion callback reported a failure
    Callback(CallbackError),
    /// Periodic timer error
    Timer(TimerError),
}

/// Configuration-related errors.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// Failed to parse TOML configuration
    ParseError(heapless::String<128>),
    /// PWM frequency must be greater than zero
    InvalidFrequency(u32),
    /// Pulse bounds must satisfy `min_us < max_us < period_us`
    InvalidPulseRange {
        /// Configured minimum pulse width
        min_us: u32,
        /// Configured maximum pulse width
        max_us: u32,
        /// PWM period derived from the frequency
        period_us: u32,
    },
    /// Angle bounds must be finite and distinct
    InvalidAngleRange {
        /// Angle mapped to the minimum pulse
        min: f32,
        /// Angle mapped to the maximum pulse
        max: f32,
    },
    /// Motion target angle is not a finite number
    InvalidTarget(f32),
    /// Servo name not found in configuration
    ServoNotFound(heapless::String<32>),
    /// Motion preset name not found in configuration
    MotionNotFound(heapless::String<32>),
    /// A required builder input was not provided
    MissingField(&'static str),
    /// File I/O error (std only)
    #[cfg(feature = "std")]
    IoError(heapless::String<128>),
}

/// PWM output errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum OutputError {
    /// Setting the PWM frequency failed
    Configure,
    /// Writing a pulse width failed
    Write,
    /// Shutting the PWM channel down failed
    Deinit,
}

/// Failure reported by a completion callback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct CallbackError {
    /// Short human-readable reason.
    pub reason: &'static str,
}

impl CallbackError {
    /// Create a callback error with a reason.
    pub const fn new(reason: &'static str) -> Self {
        Self { reason }
    }
}

/// Periodic timer errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TimerError {
    /// The timer could not be started
    Start,
    /// The timer could not be stopped
    Stop,
    /// Tick handler found the motion slot busy; the tick is skipped
    Reentrant,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Config(e) => write!(f, "Configuration error: {}", e),
            Error::Output(e) => write!(f, "Output error: {}", e),
            Error::Callback(e) => write!(f, "Callback error: {}", e),
            Error::Timer(e) => write!(f, "Timer error: {}", e),
        }
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::ParseError(msg) => write!(f, "Parse error: {}", msg),
            ConfigError::InvalidFrequency(hz) => {
                write!(f, "Invalid frequency: {} Hz. Must be > 0", hz)
            }
            ConfigError::InvalidPulseRange {
                min_us,
                max_us,
                period_us,
            } => write!(
                f,
                "Invalid pulse range: need {} < {} < {} (period)",
                min_us, max_us, period_us
            ),
            ConfigError::InvalidAngleRange { min, max } => {
                write!(f, "Invalid angle range: {} and {} must differ", min, max)
            }
            ConfigError::InvalidTarget(angle) => write!(f, "Invalid target angle: {}", angle),
            ConfigError::ServoNotFound(name) => write!(f, "Servo '{}' not found", name),
            ConfigError::MotionNotFound(name) => write!(f, "Motion '{}' not found", name),
            ConfigError::MissingField(field) => write!(f, "{} is required", field),
            #[cfg(feature = "std")]
            ConfigError::IoError(msg) => write!(f, "I/O error: {}", msg),
        }
    }
}

impl fmt::Display for OutputError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputError::Configure => write!(f, "PWM frequency configuration failed"),
            OutputError::Write => write!(f, "PWM pulse write failed"),
            OutputError::Deinit => write!(f, "PWM deinitialization failed"),
        }
    }
}

impl fmt::Display for CallbackError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "completion callback failed: {}", self.reason)
    }
}

impl fmt::Display for TimerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TimerError::Start => write!(f, "Periodic timer could not be started"),
            TimerError::Stop => write!(f, "Periodic timer could not be stopped"),
            TimerError::Reentrant => write!(f, "Tick handler re-entered while busy"),
        }
    }
}

// Conversion impls
impl From<ConfigError> for Error {
    fn from(e: ConfigError) -> Self {
        Error::Config(e)
    }
}

impl From<OutputError> for Error {
    fn from(e: OutputError) -> Self {
        Error::Output(e)
    }
}

impl From<CallbackError> for Error {
    fn from(e: CallbackError) -> Self {
        Error::Callback(e)
    }
}

impl From<TimerError> for Error {
    fn from(e: TimerError) -> Self {
        Error::Timer(e)
    }
}

#[cfg(feature = "std")]
impl std::error::Error for Error {}

#[cfg(feature = "std")]
impl std::error::Error for ConfigError {}

#[cfg(feature = "std")]
impl std::error::Error for OutputError {}

#[cfg(feature = "std")]
impl std::error::Error for CallbackError {}

#[cfg(feature = "std")]
impl std::error::Error for TimerError {}
