//! PWM output seam.
//!
//! The driver talks to the hardware through [`PulseOutput`]. Any embedded-hal
//! 1.0 [`SetDutyCycle`] channel can be used through [`DutyCycleOutput`].

use embedded_hal::pwm::SetDutyCycle;

/// A PWM channel that emits pulses of a given width.
pub trait PulseOutput {
    /// Hardware error type.
    type Error: core::fmt::Debug;

    /// Set the PWM frequency.
    fn configure(&mut self, frequency_hz: u32) -> Result<(), Self::Error>;

    /// Emit pulses of `pulse_ns` nanoseconds. Zero stops the pulses.
    fn set_pulse_ns(&mut self, pulse_ns: u32) -> Result<(), Self::Error>;

    /// Shut the channel down.
    fn deinit(&mut self) -> Result<(), Self::Error>;
}

impl<T: PulseOutput + ?Sized> PulseOutput for &mut T {
    type Error = T::Error;

    #[inline]
    fn configure(&mut self, frequency_hz: u32) -> Result<(), Self::Error> {
        T::configure(self, frequency_hz)
    }

    #[inline]
    fn set_pulse_ns(&mut self, pulse_ns: u32) -> Result<(), Self::Error> {
        T::set_pulse_ns(self, pulse_ns)
    }

    #[inline]
    fn deinit(&mut self) -> Result<(), Self::Error> {
        T::deinit(self)
    }
}

/// Default PWM period assumed until [`PulseOutput::configure`] is called.
const DEFAULT_PERIOD_NS: u32 = 20_000_000;

/// Adapter from an embedded-hal [`SetDutyCycle`] channel.
///
/// The HAL that created the channel owns its frequency; `configure` only
/// records the period so pulse widths can be turned into duty fractions.
#[derive(Debug)]
pub struct DutyCycleOutput<P> {
    pwm: P,
    period_ns: u32,
}

impl<P: SetDutyCycle> DutyCycleOutput<P> {
    /// Wrap a PWM channel.
    pub fn new(pwm: P) -> Self {
        Self {
            pwm,
            period_ns: DEFAULT_PERIOD_NS,
        }
    }

    /// Period used for duty conversion.
    #[inline]
    pub fn period_ns(&self) -> u32 {
        self.period_ns
    }

    /// Release the wrapped channel.
    pub fn into_inner(self) -> P {
        self.pwm
    }

    /// Duty value for a pulse width, given the channel's maximum duty.
    fn duty_for(&self, pulse_ns: u32, max_duty: u16) -> u16 {
        let duty = pulse_ns as u64 * max_duty as u64 / self.period_ns as u64;
        duty.min(max_duty as u64) as u16
    }
}

impl<P: SetDutyCycle> PulseOutput for DutyCycleOutput<P> {
    type Error = P::Error;

    fn configure(&mut self, frequency_hz: u32) -> Result<(), Self::Error> {
        if let Some(period_ns) = 1_000_000_000u32.checked_div(frequency_hz) {
            self.period_ns = period_ns.max(1);
        }
        Ok(())
    }

    fn set_pulse_ns(&mut self, pulse_ns: u32) -> Result<(), Self::Error> {
        if pulse_ns == 0 {
            return self.pwm.set_duty_cycle_fully_off();
        }
        let max_duty = self.pwm.max_duty_cycle();
        let duty = self.duty_for(pulse_ns, max_duty);
        self.pwm.set_duty_cycle(duty)
    }

    fn deinit(&mut self) -> Result<(), Self::Error> {
        self.pwm.set_duty_cycle_fully_off()
    }
}
