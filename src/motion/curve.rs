//! Easing curves.
//!
//! Every curve maps normalized progress `t` in `[0, 1]` to a normalized
//! position. Endpoints are exact: `ease(0) == 0` and `ease(1) == 1`. The back
//! variants overshoot `[0, 1]` between the endpoints.

use core::f32::consts::PI;

use libm::{cosf, powf, sinf, sqrtf};
use serde::Deserialize;

const BACK_C1: f32 = 1.70158;
const BACK_C2: f32 = BACK_C1 * 1.525;
const BACK_C3: f32 = BACK_C1 + 1.0;

/// Named easing curve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[serde(rename_all = "snake_case")]
pub enum Curve {
    /// Constant speed.
    #[default]
    Linear,
    /// Gentle start (sinusoidal).
    EaseIn,
    /// Gentle stop (sinusoidal).
    EaseOut,
    /// Gentle start and stop (sinusoidal).
    EaseInOut,
    /// `t^2` start.
    EaseInQuad,
    /// `t^2` stop.
    EaseOutQuad,
    /// `t^2` start and stop.
    EaseInOutQuad,
    /// `t^3` start.
    EaseInCubic,
    /// `t^3` stop.
    EaseOutCubic,
    /// `t^3` start and stop.
    EaseInOutCubic,
    /// `t^4` start.
    EaseInQuart,
    /// `t^4` stop.
    EaseOutQuart,
    /// `t^4` start and stop.
    EaseInOutQuart,
    /// `t^5` start.
    EaseInQuint,
    /// `t^5` stop.
    EaseOutQuint,
    /// `t^5` start and stop.
    EaseInOutQuint,
    /// Exponential start.
    EaseInExpo,
    /// Exponential stop.
    EaseOutExpo,
    /// Exponential start and stop.
    EaseInOutExpo,
    /// Circular start.
    EaseInCirc,
    /// Circular stop.
    EaseOutCirc,
    /// Circular start and stop.
    EaseInOutCirc,
    /// Pulls back below the start before moving.
    EaseInBack,
    /// Overshoots the target before settling.
    EaseOutBack,
    /// Pulls back, then overshoots.
    EaseInOutBack,
}

impl Curve {
    /// Every curve, in declaration order.
    pub const ALL: [Curve; 25] = [
        Curve::Linear,
        Curve::EaseIn,
        Curve::EaseOut,
        Curve::EaseInOut,
        Curve::EaseInQuad,
        Curve::EaseOutQuad,
        Curve::EaseInOutQuad,
        Curve::EaseInCubic,
        Curve::EaseOutCubic,
        Curve::EaseInOutCubic,
        Curve::EaseInQuart,
        Curve::EaseOutQuart,
        Curve::EaseInOutQuart,
        Curve::EaseInQuint,
        Curve::EaseOutQuint,
        Curve::EaseInOutQuint,
        Curve::EaseInExpo,
        Curve::EaseOutExpo,
        Curve::EaseInOutExpo,
        Curve::EaseInCirc,
        Curve::EaseOutCirc,
        Curve::EaseInOutCirc,
        Curve::EaseInBack,
        Curve::EaseOutBack,
        Curve::EaseInOutBack,
    ];

    /// Configuration name of the curve.
    pub const fn name(self) -> &'static str {
        match self {
            Curve::Linear => "linear",
            Curve::EaseIn => "ease_in",
            Curve::EaseOut => "ease_out",
            Curve::EaseInOut => "ease_in_out",
            Curve::EaseInQuad => "ease_in_quad",
            Curve::EaseOutQuad => "ease_out_quad",
            Curve::EaseInOutQuad => "ease_in_out_quad",
            Curve::EaseInCubic => "ease_in_cubic",
            Curve::EaseOutCubic => "ease_out_cubic",
            Curve::EaseInOutCubic => "ease_in_out_cubic",
            Curve::EaseInQuart => "ease_in_quart",
            Curve::EaseOutQuart => "ease_out_quart",
            Curve::EaseInOutQuart => "ease_in_out_quart",
            Curve::EaseInQuint => "ease_in_quint",
            Curve::EaseOutQuint => "ease_out_quint",
            Curve::EaseInOutQuint => "ease_in_out_quint",
            Curve::EaseInExpo => "ease_in_expo",
            Curve::EaseOutExpo => "ease_out_expo",
            Curve::EaseInOutExpo => "ease_in_out_expo",
            Curve::EaseInCirc => "ease_in_circ",
            Curve::EaseOutCirc => "ease_out_circ",
            Curve::EaseInOutCirc => "ease_in_out_circ",
            Curve::EaseInBack => "ease_in_back",
            Curve::EaseOutBack => "ease_out_back",
            Curve::EaseInOutBack => "ease_in_out_back",
        }
    }

    /// True for curves whose output leaves `[0, 1]` between the endpoints.
    pub const fn overshoots(self) -> bool {
        matches!(
            self,
            Curve::EaseInBack | Curve::EaseOutBack | Curve::EaseInOutBack
        )
    }

    /// Evaluate the curve at progress `t`.
    ///
    /// `t` is clamped to `[0, 1]`; the endpoints return exactly 0 and 1.
    pub fn ease(self, t: f32) -> f32 {
        if t.is_nan() || t <= 0.0 {
            return 0.0;
        }
        if t >= 1.0 {
            return 1.0;
        }

        match self {
            Curve::Linear => t,

            Curve::EaseIn => 1.0 - cosf(t * PI / 2.0),
            Curve::EaseOut => sinf(t * PI / 2.0),
            Curve::EaseInOut => -(cosf(PI * t) - 1.0) / 2.0,

            Curve::EaseInQuad => ease_in_pow(t, 2),
            Curve::EaseOutQuad => ease_out_pow(t, 2),
            Curve::EaseInOutQuad => ease_in_out_pow(t, 2),
            Curve::EaseInCubic => ease_in_pow(t, 3),
            Curve::EaseOutCubic => ease_out_pow(t, 3),
            Curve::EaseInOutCubic => ease_in_out_pow(t, 3),
            Curve::EaseInQuart => ease_in_pow(t, 4),
            Curve::EaseOutQuart => ease_out_pow(t, 4),
            Curve::EaseInOutQuart => ease_in_out_pow(t, 4),
            Curve::EaseInQuint => ease_in_pow(t, 5),
            Curve::EaseOutQuint => ease_out_pow(t, 5),
            Curve::EaseInOutQuint => ease_in_out_pow(t, 5),

            Curve::EaseInExpo => powf(2.0, 10.0 * t - 10.0),
            Curve::EaseOutExpo => 1.0 - powf(2.0, -10.0 * t),
            Curve::EaseInOutExpo => {
                if t < 0.5 {
                    powf(2.0, 20.0 * t - 10.0) / 2.0
                } else {
                    (2.0 - powf(2.0, -20.0 * t + 10.0)) / 2.0
                }
            }

            Curve::EaseInCirc => 1.0 - sqrtf(1.0 - t * t),
            Curve::EaseOutCirc => sqrtf(1.0 - (t - 1.0) * (t - 1.0)),
            Curve::EaseInOutCirc => {
                if t < 0.5 {
                    (1.0 - sqrtf(1.0 - (2.0 * t) * (2.0 * t))) / 2.0
                } else {
                    let u = -2.0 * t + 2.0;
                    (sqrtf(1.0 - u * u) + 1.0) / 2.0
                }
            }

            Curve::EaseInBack => BACK_C3 * t * t * t - BACK_C1 * t * t,
            Curve::EaseOutBack => {
                let u = t - 1.0;
                1.0 + BACK_C3 * u * u * u + BACK_C1 * u * u
            }
            Curve::EaseInOutBack => {
                if t < 0.5 {
                    let u = 2.0 * t;
                    (u * u * ((BACK_C2 + 1.0) * u - BACK_C2)) / 2.0
                } else {
                    let u = 2.0 * t - 2.0;
                    (u * u * ((BACK_C2 + 1.0) * u + BACK_C2) + 2.0) / 2.0
                }
            }
        }
    }
}

#[inline]
fn ease_in_pow(t: f32, n: i32) -> f32 {
    powi(t, n)
}

#[inline]
fn ease_out_pow(t: f32, n: i32) -> f32 {
    1.0 - powi(1.0 - t, n)
}

#[inline]
fn ease_in_out_pow(t: f32, n: i32) -> f32 {
    if t < 0.5 {
        powi(2.0, n - 1) * powi(t, n)
    } else {
        1.0 - powi(-2.0 * t + 2.0, n) / 2.0
    }
}

// `f32::powi` needs std.
#[inline]
fn powi(base: f32, n: i32) -> f32 {
    let mut acc = 1.0;
    for _ in 0..n {
        acc *= base;
    }
    acc
}
