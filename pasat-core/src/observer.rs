//! Observer seam between the engine and whatever presents the task.

use std::sync::Arc;
use std::time::Duration;

use crate::event::Outcome;

/// Callbacks the engine drives as a session runs. Implementations must not
/// block: both callbacks fire on the scheduler's runtime.
pub trait TaskObserver: Send + Sync {
    /// A freshly drawn stimulus is due for presentation.
    fn present_stimulus(&self, value: u32);

    /// A trial was scored. `isi` is the interval in effect after any
    /// adaptive adjustment the score triggered.
    fn trial_scored(&self, outcome: Outcome, isi: Duration);
}

impl<T: TaskObserver + ?Sized> TaskObserver for Arc<T> {
    fn present_stimulus(&self, value: u32) {
        (**self).present_stimulus(value);
    }

    fn trial_scored(&self, outcome: Outcome, isi: Duration) {
        (**self).trial_scored(outcome, isi);
    }
}

/// Observer that discards every notification. Useful for ledger-only runs
/// and as a test stand-in.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullObserver;

impl TaskObserver for NullObserver {
    fn present_stimulus(&self, _value: u32) {}

    fn trial_scored(&self, _outcome: Outcome, _isi: Duration) {}
}
