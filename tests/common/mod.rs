//! Shared test doubles.

#![allow(dead_code)]

use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::sync::{Arc, Mutex};

use embassy_futures::yield_now;
use embedded_hal_async::delay::DelayNs;
use servo_pdm::{PeriodicTimer, PulseOutput};

/// PWM output that records every pulse width written, in microseconds.
///
/// Clones share the same log, so a test can keep one while the servo owns
/// the other.
#[derive(Clone, Default)]
pub struct RecordingOutput {
    writes: Rc<RefCell<Vec<u32>>>,
    frequency_hz: Rc<Cell<u32>>,
    deinit: Rc<Cell<bool>>,
    failing: Rc<Cell<bool>>,
}

impl RecordingOutput {
    pub fn new() -> Self {
        Self::default()
    }

    /// All pulse widths written so far.
    pub fn writes(&self) -> Vec<u32> {
        self.writes.borrow().clone()
    }

    pub fn write_count(&self) -> usize {
        self.writes.borrow().len()
    }

    pub fn last(&self) -> Option<u32> {
        self.writes.borrow().last().copied()
    }

    pub fn frequency_hz(&self) -> u32 {
        self.frequency_hz.get()
    }

    pub fn is_deinit(&self) -> bool {
        self.deinit.get()
    }

    /// Make every following write fail.
    pub fn fail_writes(&self, failing: bool) {
        self.failing.set(failing);
    }
}

impl PulseOutput for RecordingOutput {
    type Error = ();

    fn configure(&mut self, frequency_hz: u32) -> Result<(), ()> {
        self.frequency_hz.set(frequency_hz);
        Ok(())
    }

    fn set_pulse_ns(&mut self, pulse_ns: u32) -> Result<(), ()> {
        if self.failing.get() {
            return Err(());
        }
        self.writes.borrow_mut().push(pulse_ns / 1000);
        Ok(())
    }

    fn deinit(&mut self) -> Result<(), ()> {
        self.deinit.set(true);
        Ok(())
    }
}

/// Async delay on a simulated clock.
///
/// Each delay advances the clock and yields once, so one executor poll
/// round equals one motion step.
#[derive(Clone, Default)]
pub struct SimDelay {
    now_ms: Rc<Cell<u32>>,
}

impl SimDelay {
    pub fn now_ms(&self) -> u32 {
        self.now_ms.get()
    }
}

impl DelayNs for SimDelay {
    async fn delay_ns(&mut self, ns: u32) {
        self.now_ms.set(self.now_ms.get() + ns / 1_000_000);
        yield_now().await;
    }

    async fn delay_ms(&mut self, ms: u32) {
        self.now_ms.set(self.now_ms.get() + ms);
        yield_now().await;
    }
}

/// Give the runner `rounds` chances to make progress.
pub async fn settle(rounds: usize) {
    for _ in 0..rounds {
        yield_now().await;
    }
}

/// Timer whose firings the test triggers by hand.
#[derive(Clone, Default)]
pub struct ManualTimer {
    interval_ms: Rc<Cell<Option<u32>>>,
}

impl ManualTimer {
    pub fn interval_ms(&self) -> Option<u32> {
        self.interval_ms.get()
    }
}

impl PeriodicTimer for ManualTimer {
    type Error = ();

    fn start_periodic(&mut self, interval_ms: u32) -> Result<(), ()> {
        self.interval_ms.set(Some(interval_ms));
        Ok(())
    }

    fn stop(&mut self) -> Result<(), ()> {
        self.interval_ms.set(None);
        Ok(())
    }
}

/// `Send` counterpart of [`RecordingOutput`], for servos that live in a
/// `static` reachable from a completion callback.
#[derive(Clone, Default)]
pub struct SharedOutput {
    writes: Arc<Mutex<Vec<u32>>>,
}

impl SharedOutput {
    pub fn writes(&self) -> Vec<u32> {
        self.writes.lock().unwrap().clone()
    }
}

impl PulseOutput for SharedOutput {
    type Error = ();

    fn configure(&mut self, _frequency_hz: u32) -> Result<(), ()> {
        Ok(())
    }

    fn set_pulse_ns(&mut self, pulse_ns: u32) -> Result<(), ()> {
        self.writes.lock().unwrap().push(pulse_ns / 1000);
        Ok(())
    }

    fn deinit(&mut self) -> Result<(), ()> {
        Ok(())
    }
}

/// Timer that accepts every request; ticks are driven by the test.
pub struct FreeTimer;

impl PeriodicTimer for FreeTimer {
    type Error = ();

    fn start_periodic(&mut self, _interval_ms: u32) -> Result<(), ()> {
        Ok(())
    }

    fn stop(&mut self) -> Result<(), ()> {
        Ok(())
    }
}
