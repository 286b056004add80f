//! Interrupt-driven scheduler.
//!
//! [`IrqServo`] is shared between thread code and a periodic timer interrupt.
//! The interrupt handler calls [`IrqServo::on_tick`], which applies exactly one
//! generator step. Every access to the servo and its motion slots happens
//! inside `critical_section::with`, so a `move_to_angle` can never observe a
//! half-applied tick and a tick can never observe a half-replaced motion.
//!
//! Completion callbacks run after the critical section is left, so a callback
//! may start the next motion.

use core::cell::RefCell;

use critical_section::Mutex;

use crate::config::units::Degrees;
use crate::error::{Result, TimerError};
use crate::motion::{Curve, MotionGenerator, MotionRequest};
use crate::servo::{MotionState, PulseOutput, ServoPdm};

use super::callback::{self, OnComplete};

/// Platform timer that fires a handler every `interval_ms` until stopped.
///
/// The handler itself is wired up by the platform; it must call
/// [`IrqServo::on_tick`]. Firings of one timer must not overlap.
pub trait PeriodicTimer {
    /// Timer error type.
    type Error: core::fmt::Debug;

    /// Start firing every `interval_ms` milliseconds.
    fn start_periodic(&mut self, interval_ms: u32) -> core::result::Result<(), Self::Error>;

    /// Stop firing.
    fn stop(&mut self) -> core::result::Result<(), Self::Error>;
}

impl<T: PeriodicTimer + ?Sized> PeriodicTimer for &mut T {
    type Error = T::Error;

    fn start_periodic(&mut self, interval_ms: u32) -> core::result::Result<(), Self::Error> {
        T::start_periodic(self, interval_ms)
    }

    fn stop(&mut self) -> core::result::Result<(), Self::Error> {
        T::stop(self)
    }
}

/// What a single tick did.
enum Tick {
    /// No motion bound.
    Idle,
    /// One step applied.
    Stepped,
    /// Generator exhausted; carries the callback to fire.
    Completed(Option<OnComplete>),
    /// The output rejected a step; the servo has been released.
    Failed,
}

struct Slots<P, T>
where
    P: PulseOutput,
    T: PeriodicTimer,
{
    servo: ServoPdm<P>,
    timer: T,
    generator: Option<MotionGenerator>,
    on_complete: Option<OnComplete>,
}

impl<P, T> Slots<P, T>
where
    P: PulseOutput,
    T: PeriodicTimer,
{
    /// Drop the bound motion without firing its callback.
    fn cancel(&mut self) {
        if self.generator.take().is_some() {
            debug!("servo '{}': motion cancelled", self.servo.name());
        }
        self.on_complete = None;
    }

    fn step(&mut self) -> Tick {
        let Some(generator) = self.generator.as_mut() else {
            return Tick::Idle;
        };

        match generator.advance() {
            Some(step) => match self.servo.apply(&step) {
                Ok(()) => Tick::Stepped,
                Err(e) => {
                    error!("servo '{}': step write failed: {}", self.servo.name(), e);
                    self.cancel();
                    if self.servo.release().is_err() {
                        warn!("servo '{}': release after failure also failed", self.servo.name());
                    }
                    Tick::Failed
                }
            },
            None => {
                self.generator = None;
                debug!(
                    "servo '{}': motion complete at {} us",
                    self.servo.name(),
                    self.servo.pulse_us()
                );
                Tick::Completed(self.on_complete.take())
            }
        }
    }
}

/// Servo driven by a periodic timer interrupt.
///
/// Methods take `&self` so one instance can be shared between the interrupt
/// handler and thread code, typically through a `static`.
pub struct IrqServo<P, T>
where
    P: PulseOutput,
    T: PeriodicTimer,
{
    slots: Mutex<RefCell<Slots<P, T>>>,
}

impl<P, T> IrqServo<P, T>
where
    P: PulseOutput,
    T: PeriodicTimer,
{
    /// Bind a servo to a timer and start the timer at the servo's PWM period.
    ///
    /// # Errors
    ///
    /// Returns [`TimerError::Start`] if the timer refuses to start.
    pub fn new(servo: ServoPdm<P>, mut timer: T) -> Result<Self> {
        let interval_ms = servo.tick_interval_ms();
        timer
            .start_periodic(interval_ms)
            .map_err(|_| TimerError::Start)?;
        info!("servo '{}': tick every {} ms", servo.name(), interval_ms);

        Ok(Self {
            slots: Mutex::new(RefCell::new(Slots {
                servo,
                timer,
                generator: None,
                on_complete: None,
            })),
        })
    }

    fn with_slots<R>(
        &self,
        f: impl FnOnce(&mut Slots<P, T>) -> R,
    ) -> core::result::Result<R, TimerError> {
        critical_section::with(|cs| {
            let mut slots = self
                .slots
                .borrow(cs)
                .try_borrow_mut()
                .map_err(|_| TimerError::Reentrant)?;
            Ok(f(&mut *slots))
        })
    }

    /// Timer interrupt handler. Applies one step of the bound motion.
    ///
    /// Never blocks and never panics. A tick that finds the servo busy is
    /// skipped.
    pub fn on_tick(&self) {
        match self.with_slots(Slots::step) {
            Ok(Tick::Completed(mut on_complete)) => self.complete(&mut on_complete),
            Ok(Tick::Idle | Tick::Stepped | Tick::Failed) => {}
            Err(_) => trace!("tick skipped, servo busy"),
        }
    }

    fn complete(&self, on_complete: &mut Option<OnComplete>) {
        if callback::fire(on_complete).is_err() {
            // Stop and release rather than let the failure escape the handler.
            if let Err(e) = self.release() {
                warn!("release after callback failure failed: {}", e);
            }
        }
    }

    /// Animate to `angle` over `duration_ms` along `curve`.
    ///
    /// Replaces any bound motion without firing its callback. The first step
    /// is applied before returning; the rest follow one per tick.
    pub fn move_to_angle(
        &self,
        angle: impl Into<Degrees>,
        duration_ms: u32,
        curve: Curve,
        on_complete: Option<OnComplete>,
    ) -> Result<()> {
        let mut request = MotionRequest::new(angle, duration_ms).with_curve(curve);
        request.on_complete = on_complete;
        self.move_to(request)
    }

    /// Start a prepared motion request. See [`IrqServo::move_to_angle`].
    pub fn move_to(&self, request: MotionRequest) -> Result<()> {
        let tick = self.with_slots(|slots| {
            slots.cancel();
            slots.generator = Some(slots.servo.plan_motion(&request));
            slots.on_complete = request.on_complete;
            slots.step()
        })?;

        if let Tick::Completed(mut on_complete) = tick {
            self.complete(&mut on_complete);
        }
        Ok(())
    }

    /// Cancel any motion and jump to `angle`. Returns the pulse written.
    pub fn set_angle(&self, angle: impl Into<Degrees>) -> Result<u32> {
        let angle = angle.into();
        self.with_slots(|slots| {
            slots.cancel();
            slots.servo.set_angle(angle)
        })?
    }

    /// Cancel any motion and write a raw pulse width.
    pub fn set_pulse(&self, pulse_us: u32) -> Result<()> {
        self.with_slots(|slots| {
            slots.cancel();
            slots.servo.set_pulse(pulse_us)
        })?
    }

    /// Cancel any motion, discarding its callback, and write a zero pulse.
    pub fn release(&self) -> Result<()> {
        self.with_slots(|slots| {
            slots.cancel();
            slots.servo.release()
        })?
    }

    /// Stop the timer, cancel any motion and shut the output down.
    pub fn deinit(&self) -> Result<()> {
        self.with_slots(|slots| {
            slots.cancel();
            slots.timer.stop().map_err(|_| TimerError::Stop)?;
            info!("servo '{}': deinit", slots.servo.name());
            slots.servo.deinit()
        })?
    }

    /// Current motion state.
    pub fn state(&self) -> MotionState {
        match self.with_slots(|slots| slots.generator.is_some()) {
            Ok(true) | Err(_) => MotionState::Running,
            Ok(false) => MotionState::Idle,
        }
    }

    /// True while a motion is bound.
    pub fn is_moving(&self) -> bool {
        self.state() == MotionState::Running
    }

    /// Read the servo inside a critical section.
    pub fn inspect<R>(&self, f: impl FnOnce(&ServoPdm<P>) -> R) -> Result<R> {
        Ok(self.with_slots(|slots| f(&slots.servo))?)
    }

    /// Stop the timer and give the servo and timer back.
    pub fn into_parts(self) -> (ServoPdm<P>, T) {
        let mut slots = self.slots.into_inner().into_inner();
        if slots.timer.stop().is_err() {
            warn!("servo '{}': timer stop failed", slots.servo.name());
        }
        (slots.servo, slots.timer)
    }
}
