//! Unit types for physical quantities.
//!
//! Keeps angles apart from raw pulse widths so the two cannot be confused at
//! an API boundary.

use serde::Deserialize;

/// Angular position in degrees.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Deserialize)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[serde(transparent)]
pub struct Degrees(pub f32);

impl Degrees {
    /// Get the raw value.
    #[inline]
    pub const fn value(self) -> f32 {
        self.0
    }

    /// Absolute distance to another angle.
    #[inline]
    pub fn distance(self, other: Degrees) -> f32 {
        libm::fabsf(self.0 - other.0)
    }

    /// Check the value is neither NaN nor infinite.
    #[inline]
    pub fn is_finite(self) -> bool {
        self.0.is_finite()
    }
}

impl From<f32> for Degrees {
    fn from(value: f32) -> Self {
        Self(value)
    }
}

impl From<i32> for Degrees {
    fn from(value: i32) -> Self {
        Self(value as f32)
    }
}

/// Extension trait for creating unit types from primitives.
pub trait UnitExt {
    /// Convert to Degrees.
    fn degrees(self) -> Degrees;
}

impl UnitExt for f32 {
    #[inline]
    fn degrees(self) -> Degrees {
        Degrees(self)
    }
}

impl UnitExt for i32 {
    #[inline]
    fn degrees(self) -> Degrees {
        Degrees(self as f32)
    }
}

/// Convert a pulse width in microseconds to nanoseconds, saturating.
#[inline]
pub const fn us_to_ns(us: u32) -> u32 {
    us.saturating_mul(1000)
}
