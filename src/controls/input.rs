//! ControlInput trait and a manually driven input

use std::cell::RefCell;
use std::collections::HashMap;

/// Source of raw control readings
pub trait ControlInput {
    /// Current reading of a hardware channel, normalized to 0.0-1.0.
    /// Channels that have never reported read as 0.0.
    fn read_channel(&self, channel: u8) -> f64;
}

/// Input whose readings are set by hand
///
/// Used for dry runs and tests. Readings can be queued per channel so each
/// read pops the next value, which makes multi-tick scenarios easy to script.
#[derive(Debug, Default)]
pub struct ManualInput {
    values: RefCell<HashMap<u8, f64>>,
    queued: RefCell<HashMap<u8, Vec<f64>>>,
}

impl ManualInput {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the current reading of a channel (clamped to 0.0-1.0)
    pub fn set(&self, channel: u8, value: f64) {
        self.values.borrow_mut().insert(channel, value.clamp(0.0, 1.0));
    }

    /// Queue readings for a channel, returned one per read in order.
    /// Once the queue drains, the last value keeps being reported.
    pub fn queue(&self, channel: u8, readings: &[f64]) {
        let mut queued = self.queued.borrow_mut();
        let entry = queued.entry(channel).or_default();
        // stored reversed so pop() yields the oldest
        for value in readings {
            entry.insert(0, value.clamp(0.0, 1.0));
        }
    }
}

impl ControlInput for ManualInput {
    fn read_channel(&self, channel: u8) -> f64 {
        if let Some(next) = self.queued.borrow_mut().get_mut(&channel).and_then(|q| q.pop()) {
            self.values.borrow_mut().insert(channel, next);
            return next;
        }
        self.values.borrow().get(&channel).copied().unwrap_or(0.0)
    }
}
