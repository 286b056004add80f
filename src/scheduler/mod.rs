//! Motion schedulers.
//!
//! Two ways to pump a [`MotionGenerator`](crate::motion::MotionGenerator) to
//! completion, one per execution model:
//!
//! - [`MotionChannel`]: an async task owns the servo and receives commands
//!   through a signal. The newest command always wins.
//! - [`IrqServo`]: a periodic timer interrupt applies one step per tick.
//!
//! Both cancel an in-flight motion without running its callback, and both
//! keep callback failures away from their own control flow.

mod callback;
mod cooperative;
mod interrupt;

pub use callback::OnComplete;
pub use cooperative::{Command, MotionChannel, ServoHandle};
pub use interrupt::{IrqServo, PeriodicTimer};
