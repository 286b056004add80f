//! Cooperative scheduler.
//!
//! A single async task owns the servo and runs [`MotionChannel::run`]. Every
//! other task talks to it through a [`ServoHandle`]. Commands travel through
//! an [`embassy_sync::signal::Signal`], so only the most recent unread command
//! is kept: a request superseded before the runner picked it up never starts
//! and never fires its callback.
//!
//! ```ignore
//! static CHANNEL: MotionChannel = MotionChannel::new();
//!
//! #[embassy_executor::task]
//! async fn servo_task(mut servo: ServoPdm<Pwm>) {
//!     CHANNEL.run(&mut servo, embassy_time::Delay).await.ok();
//! }
//!
//! CHANNEL.handle().move_to_angle(90, 2000, Curve::EaseInOutCubic, None);
//! ```

use core::cell::Cell;

use embassy_futures::select::{select, Either};
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::blocking_mutex::Mutex;
use embassy_sync::signal::Signal;
use embedded_hal_async::delay::DelayNs;

use crate::config::units::Degrees;
use crate::error::Result;
use crate::motion::{Curve, MotionRequest};
use crate::servo::{MotionState, PulseOutput, ServoPdm};

use super::callback::{self, OnComplete};

/// Command sent from a [`ServoHandle`] to the runner.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Command {
    /// Animate to an angle.
    Move(MotionRequest),
    /// Jump to an angle.
    SetAngle(Degrees),
    /// Write a raw pulse width.
    SetPulse(u32),
    /// Stop emitting pulses.
    Release,
    /// Shut the output down and end the runner.
    Deinit,
}

/// Shared state between the servo task and its handles.
///
/// Const-constructible so it can live in a `static`.
pub struct MotionChannel {
    command: Signal<CriticalSectionRawMutex, Command>,
    state: Mutex<CriticalSectionRawMutex, Cell<MotionState>>,
}

impl Default for MotionChannel {
    fn default() -> Self {
        Self::new()
    }
}

impl MotionChannel {
    /// Create an idle channel.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            command: Signal::new(),
            state: Mutex::new(Cell::new(MotionState::Idle)),
        }
    }

    /// Get a handle for issuing commands.
    pub fn handle(&self) -> ServoHandle<'_> {
        ServoHandle { channel: self }
    }

    /// Current motion state.
    pub fn state(&self) -> MotionState {
        self.state.lock(Cell::get)
    }

    fn set_state(&self, state: MotionState) {
        self.state.lock(|s| s.set(state));
    }

    fn send(&self, command: Command, state: MotionState) {
        self.set_state(state);
        self.command.signal(command);
    }

    /// Drive the servo until a [`Command::Deinit`] arrives.
    ///
    /// Runtime failures (a rejected write, a failing callback) are logged and
    /// leave the runner waiting for the next command.
    ///
    /// # Errors
    ///
    /// Returns an error only if deinitializing the output fails.
    pub async fn run<P, D>(&self, servo: &mut ServoPdm<P>, mut delay: D) -> Result<()>
    where
        P: PulseOutput,
        D: DelayNs,
    {
        let mut command = self.command.wait().await;
        loop {
            command = match command {
                Command::Move(request) => self.run_motion(servo, &mut delay, request).await,
                Command::SetAngle(angle) => {
                    if let Err(e) = servo.set_angle(angle) {
                        warn!("set_angle failed: {}", e);
                    }
                    self.idle_then_wait().await
                }
                Command::SetPulse(pulse_us) => {
                    if let Err(e) = servo.set_pulse(pulse_us) {
                        warn!("set_pulse failed: {}", e);
                    }
                    self.idle_then_wait().await
                }
                Command::Release => {
                    if let Err(e) = servo.release() {
                        warn!("release failed: {}", e);
                    }
                    self.idle_then_wait().await
                }
                Command::Deinit => {
                    self.set_state(MotionState::Idle);
                    info!("servo '{}': deinit", servo.name());
                    return servo.deinit();
                }
            };
        }
    }

    /// Pump one motion. Returns the command that ended it, either a
    /// preempting one or the next one after completion.
    async fn run_motion<P, D>(
        &self,
        servo: &mut ServoPdm<P>,
        delay: &mut D,
        request: MotionRequest,
    ) -> Command
    where
        P: PulseOutput,
        D: DelayNs,
    {
        let mut generator = servo.plan_motion(&request);
        let mut on_complete = request.on_complete;
        self.set_state(MotionState::Running);

        while let Some(step) = generator.advance() {
            if let Some(next) = self.command.try_take() {
                debug!("servo '{}': motion preempted", servo.name());
                return next;
            }

            if let Err(e) = servo.apply(&step) {
                error!("servo '{}': step write failed: {}", servo.name(), e);
                if servo.release().is_err() {
                    warn!("servo '{}': release after failure also failed", servo.name());
                }
                return self.idle_then_wait().await;
            }

            match select(self.command.wait(), delay.delay_ms(step.interval_ms)).await {
                Either::First(next) => {
                    debug!("servo '{}': motion preempted", servo.name());
                    return next;
                }
                Either::Second(()) => {}
            }
        }

        debug!("servo '{}': motion complete at {} us", servo.name(), servo.pulse_us());
        self.go_idle();
        if callback::fire(&mut on_complete).is_err() {
            // Already logged. The servo holds its last position.
            debug!("servo '{}': holding at {} us", servo.name(), servo.pulse_us());
        }
        self.command.wait().await
    }

    async fn idle_then_wait(&self) -> Command {
        self.go_idle();
        self.command.wait().await
    }

    fn go_idle(&self) {
        // A handle may already have queued the next move.
        if !self.command.signaled() {
            self.set_state(MotionState::Idle);
        }
    }
}

/// Cheap, copyable front end to a [`MotionChannel`].
///
/// Every method returns immediately; the runner applies the command at its
/// next suspension point.
#[derive(Clone, Copy)]
pub struct ServoHandle<'a> {
    channel: &'a MotionChannel,
}

impl ServoHandle<'_> {
    /// Animate to `angle` over `duration_ms` along `curve`.
    ///
    /// Replaces any motion in flight; the replaced motion's callback never
    /// fires. `on_complete` runs once when this motion finishes.
    pub fn move_to_angle(
        &self,
        angle: impl Into<Degrees>,
        duration_ms: u32,
        curve: Curve,
        on_complete: Option<OnComplete>,
    ) {
        let mut request = MotionRequest::new(angle, duration_ms).with_curve(curve);
        request.on_complete = on_complete;
        self.move_to(request);
    }

    /// Start a prepared motion request.
    pub fn move_to(&self, request: MotionRequest) {
        self.channel.send(Command::Move(request), MotionState::Running);
    }

    /// Cancel any motion and jump to `angle`.
    pub fn set_angle(&self, angle: impl Into<Degrees>) {
        self.channel
            .send(Command::SetAngle(angle.into()), MotionState::Idle);
    }

    /// Cancel any motion and write a raw pulse width.
    pub fn set_pulse(&self, pulse_us: u32) {
        self.channel
            .send(Command::SetPulse(pulse_us), MotionState::Idle);
    }

    /// Cancel any motion and stop holding torque.
    pub fn release(&self) {
        self.channel.send(Command::Release, MotionState::Idle);
    }

    /// Cancel any motion, shut the output down and end the runner.
    pub fn deinit(&self) {
        self.channel.send(Command::Deinit, MotionState::Idle);
    }

    /// Current motion state.
    pub fn state(&self) -> MotionState {
        self.channel.state()
    }

    /// True while a motion is queued or running.
    pub fn is_moving(&self) -> bool {
        self.state() == MotionState::Running
    }
}
