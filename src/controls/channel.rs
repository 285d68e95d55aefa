//! Physical control channels

use std::fmt;
use std::str::FromStr;

use anyhow::{anyhow, bail};
use serde::{Deserialize, Serialize};

/// Number of knobs (and of sliders) on the controller
pub const CONTROLS_PER_KIND: u8 = 8;

/// Knobs send on hardware channels 16..=23
const KNOB_CHANNEL_OFFSET: u8 = 16;

/// Kind of physical control
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ControlKind {
    /// Rotary knob
    Knob,
    /// Linear fader
    Slider,
}

impl fmt::Display for ControlKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ControlKind::Knob => write!(f, "Knob"),
            ControlKind::Slider => write!(f, "Slider"),
        }
    }
}

/// One physical knob or slider
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ControlChannel {
    kind: ControlKind,
    index: u8,
}

impl ControlChannel {
    /// Create a channel. `index` is zero-based and must be below 8.
    pub fn new(kind: ControlKind, index: u8) -> anyhow::Result<Self> {
        if index >= CONTROLS_PER_KIND {
            bail!(
                "{} index must be between 0 and {}, got {}",
                kind,
                CONTROLS_PER_KIND - 1,
                index
            );
        }
        Ok(Self { kind, index })
    }

    pub fn knob(index: u8) -> anyhow::Result<Self> {
        Self::new(ControlKind::Knob, index)
    }

    pub fn slider(index: u8) -> anyhow::Result<Self> {
        Self::new(ControlKind::Slider, index)
    }

    /// All 16 channels, knobs first
    pub fn all() -> impl Iterator<Item = ControlChannel> {
        [ControlKind::Knob, ControlKind::Slider]
            .into_iter()
            .flat_map(|kind| (0..CONTROLS_PER_KIND).map(move |index| ControlChannel { kind, index }))
    }

    pub fn kind(&self) -> ControlKind {
        self.kind
    }

    pub fn index(&self) -> u8 {
        self.index
    }

    /// Controller number the hardware sends for this control
    pub fn hardware_channel(&self) -> u8 {
        match self.kind {
            ControlKind::Knob => self.index + KNOB_CHANNEL_OFFSET,
            ControlKind::Slider => self.index,
        }
    }

    /// Human readable name, e.g. "Knob 1"
    pub fn name(&self) -> String {
        format!("{} {}", self.kind, self.index + 1)
    }
}

impl fmt::Display for ControlChannel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Parses `knob1`..`knob8` and `slider1`..`slider8` (one-based, any case).
impl FromStr for ControlChannel {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_ascii_lowercase().replace([' ', '_', '-'], "");
        let (kind, number) = if let Some(rest) = lower.strip_prefix("knob") {
            (ControlKind::Knob, rest)
        } else if let Some(rest) = lower.strip_prefix("slider") {
            (ControlKind::Slider, rest)
        } else {
            return Err(anyhow!("Unknown control '{}' (expected knob1..knob8 or slider1..slider8)", s));
        };

        let number: u8 = number
            .parse()
            .map_err(|_| anyhow!("Control '{}' is missing a number", s))?;
        if number == 0 {
            bail!("Control numbers start at 1, got '{}'", s);
        }
        ControlChannel::new(kind, number - 1)
    }
}

impl Serialize for ControlChannel {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let kind = match self.kind {
            ControlKind::Knob => "knob",
            ControlKind::Slider => "slider",
        };
        serializer.serialize_str(&format!("{}{}", kind, self.index + 1))
    }
}

impl<'de> Deserialize<'de> for ControlChannel {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hardware_channel_numbers() {
        assert_eq!(ControlChannel::slider(0).unwrap().hardware_channel(), 0);
        assert_eq!(ControlChannel::slider(7).unwrap().hardware_channel(), 7);
        assert_eq!(ControlChannel::knob(0).unwrap().hardware_channel(), 16);
        assert_eq!(ControlChannel::knob(7).unwrap().hardware_channel(), 23);
    }

    #[test]
    fn test_index_out_of_range() {
        assert!(ControlChannel::knob(8).is_err());
        assert!(ControlChannel::slider(200).is_err());
    }

    #[test]
    fn test_all_channels() {
        let all: Vec<_> = ControlChannel::all().collect();
        assert_eq!(all.len(), 16);
        assert_eq!(all[0], ControlChannel::knob(0).unwrap());
        assert_eq!(all[8], ControlChannel::slider(0).unwrap());
    }

    #[test]
    fn test_name() {
        assert_eq!(ControlChannel::knob(0).unwrap().name(), "Knob 1");
        assert_eq!(ControlChannel::slider(7).unwrap().to_string(), "Slider 8");
    }

    #[test]
    fn test_parse() {
        assert_eq!("knob1".parse::<ControlChannel>().unwrap(), ControlChannel::knob(0).unwrap());
        assert_eq!("Slider 8".parse::<ControlChannel>().unwrap(), ControlChannel::slider(7).unwrap());
        assert!("knob0".parse::<ControlChannel>().is_err());
        assert!("knob9".parse::<ControlChannel>().is_err());
        assert!("pad1".parse::<ControlChannel>().is_err());
        assert!("knob".parse::<ControlChannel>().is_err());
    }

    #[test]
    fn test_serde_as_string() {
        let channel = ControlChannel::knob(2).unwrap();
        let yaml = serde_yaml::to_string(&channel).unwrap();
        assert_eq!(yaml.trim(), "knob3");

        let parsed: ControlChannel = serde_yaml::from_str("slider4").unwrap();
        assert_eq!(parsed, ControlChannel::slider(3).unwrap());
    }
}
