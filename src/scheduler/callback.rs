//! Completion callbacks.

use crate::error::CallbackError;

/// Completion callback attached to a motion request.
///
/// Plain function pointers keep requests `Copy` and safe to hand to an
/// interrupt handler. A returned error is logged by the scheduler and never
/// propagated.
pub type OnComplete = fn() -> core::result::Result<(), CallbackError>;

/// Take the callback out of its slot and run it.
///
/// An empty slot is a successful no-op, so a callback can fire at most once
/// per request no matter how often this is reached.
pub(crate) fn fire(slot: &mut Option<OnComplete>) -> core::result::Result<(), CallbackError> {
    match slot.take() {
        Some(callback) => callback().map_err(|e| {
            error!("completion callback failed: {}", e.reason);
            e
        }),
        None => Ok(()),
    }
}
