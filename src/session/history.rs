//! Last raw reading per hardware channel

use std::collections::HashMap;

/// Raw readings from the previous tick, keyed by hardware channel
///
/// Channels never sampled read as 0.0. The history lives as long as the
/// session and survives leaving live mode.
#[derive(Debug, Clone, Default)]
pub struct SampleHistory {
    readings: HashMap<u8, f64>,
}

impl SampleHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Previous reading of a channel
    pub fn previous(&self, channel: u8) -> f64 {
        self.readings.get(&channel).copied().unwrap_or(0.0)
    }

    /// Whether a channel has been sampled
    pub fn contains(&self, channel: u8) -> bool {
        self.readings.contains_key(&channel)
    }

    /// Store a reading and return the movement since the previous one
    pub fn record(&mut self, channel: u8, reading: f64) -> f64 {
        let previous = self.readings.insert(channel, reading).unwrap_or(0.0);
        reading - previous
    }

    pub fn len(&self) -> usize {
        self.readings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.readings.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unseen_channel_is_zero() {
        let history = SampleHistory::new();
        assert_eq!(history.previous(16), 0.0);
        assert!(!history.contains(16));
        assert!(history.is_empty());
    }

    #[test]
    fn test_record_returns_delta() {
        let mut history = SampleHistory::new();
        assert_eq!(history.record(16, 0.5), 0.5);
        assert_eq!(history.record(16, 0.5), 0.0);
        assert_eq!(history.record(16, 0.25), -0.25);
        assert_eq!(history.previous(16), 0.25);
        assert_eq!(history.len(), 1);
    }
}
