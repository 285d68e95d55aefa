//! Configuration schema definitions

use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::controls::ControlChannel;

/// Main configuration for knobwire
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KnobwireConfig {
    /// MIDI input settings
    #[serde(default)]
    pub midi: MidiConfig,

    /// Live mode settings
    #[serde(default)]
    pub live: LiveConfig,

    /// Display preferences
    #[serde(default)]
    pub display: DisplayConfig,

    /// Scene file holding the objects bindings target
    #[serde(default = "default_scene")]
    pub scene: PathBuf,

    /// Persisted bindings
    #[serde(default)]
    pub bindings: Vec<BindingConfig>,
}

fn default_scene() -> PathBuf {
    PathBuf::from("scene.yaml")
}

impl Default for KnobwireConfig {
    fn default() -> Self {
        Self {
            midi: MidiConfig::default(),
            live: LiveConfig::default(),
            display: DisplayConfig::default(),
            scene: default_scene(),
            bindings: Vec::new(),
        }
    }
}

impl KnobwireConfig {
    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.live.tick_rate_hz < 1 || self.live.tick_rate_hz > 1000 {
            bail!("Tick rate must be between 1 and 1000 Hz");
        }

        for binding in &self.bindings {
            if binding.scale == 0 {
                bail!("Binding on {} has a scale of 0", binding.control);
            }
            if binding.field.is_some() && binding.object.is_none() {
                bail!("Binding on {} names a field but no object", binding.control);
            }
            if !binding.value.is_finite() {
                bail!("Binding on {} has a non-finite value", binding.control);
            }
        }

        Ok(())
    }

    /// Scene path, resolved against the directory of the config file
    pub fn scene_path(&self, config_path: &Path) -> PathBuf {
        if self.scene.is_absolute() {
            return self.scene.clone();
        }
        match config_path.parent() {
            Some(dir) => dir.join(&self.scene),
            None => self.scene.clone(),
        }
    }
}

/// MIDI input configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MidiConfig {
    /// Input port name, or part of it (None = first available port)
    pub port: Option<String>,

    /// Client name announced to the MIDI system (default: knobwire)
    #[serde(default = "default_client_name")]
    pub client_name: String,
}

fn default_client_name() -> String { "knobwire".to_string() }

impl Default for MidiConfig {
    fn default() -> Self {
        Self {
            port: None,
            client_name: default_client_name(),
        }
    }
}

/// Live mode settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LiveConfig {
    /// Ticks per second (default: 60)
    #[serde(default = "default_tick_rate")]
    pub tick_rate_hz: u32,

    /// Load binding values from their fields when live mode starts
    #[serde(default)]
    pub restore_on_enter: bool,

    /// Record current control positions when live mode starts, so resting
    /// controls do not move fields on the first tick
    #[serde(default)]
    pub seed_history_on_enter: bool,
}

fn default_tick_rate() -> u32 { 60 }

impl Default for LiveConfig {
    fn default() -> Self {
        Self {
            tick_rate_hz: default_tick_rate(),
            restore_on_enter: false,
            seed_history_on_enter: false,
        }
    }
}

/// Display preferences
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DisplayConfig {
    /// Color of the controller shown in the panel
    #[serde(default)]
    pub theme: Theme,
}

/// Controller color scheme
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Theme {
    /// White controller
    #[default]
    Light,
    /// Black controller
    Dark,
}

impl Theme {
    pub fn toggled(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }
}

/// A persisted binding
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BindingConfig {
    /// Control, e.g. knob1 or slider8
    pub control: ControlChannel,

    /// Target object name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub object: Option<String>,

    /// Target field path
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,

    /// Scale applied to control movement (default: 1)
    #[serde(default = "default_scale")]
    pub scale: i32,

    /// Accumulated value
    #[serde(default)]
    pub value: f64,
}

fn default_scale() -> i32 { 1 }

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_live_config() {
        let yaml = "restore_on_enter: true";
        let config: LiveConfig = serde_yaml::from_str(yaml).unwrap();
        assert!(config.restore_on_enter);
        assert!(!config.seed_history_on_enter);
        assert_eq!(config.tick_rate_hz, 60); // default
    }

    #[test]
    fn test_binding_config() {
        let yaml = r#"
control: knob1
object: Light
field: intensity
scale: 10
"#;
        let config: BindingConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.control, ControlChannel::knob(0).unwrap());
        assert_eq!(config.object.as_deref(), Some("Light"));
        assert_eq!(config.scale, 10);
        assert_eq!(config.value, 0.0);
    }

    #[test]
    fn test_binding_config_bad_control() {
        let yaml = "control: knob12";
        assert!(serde_yaml::from_str::<BindingConfig>(yaml).is_err());
    }

    #[test]
    fn test_config_validation() {
        let config = KnobwireConfig {
            bindings: vec![BindingConfig {
                control: ControlChannel::slider(0).unwrap(),
                object: Some("Light".to_string()),
                field: Some("intensity".to_string()),
                scale: 1,
                value: 0.0,
            }],
            ..KnobwireConfig::default()
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_invalid_tick_rate() {
        let mut config = KnobwireConfig::default();
        config.live.tick_rate_hz = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_invalid_bindings() {
        let binding = BindingConfig {
            control: ControlChannel::knob(0).unwrap(),
            object: None,
            field: Some("intensity".to_string()),
            scale: 1,
            value: 0.0,
        };
        let config = KnobwireConfig {
            bindings: vec![binding.clone()],
            ..KnobwireConfig::default()
        };
        assert!(config.validate().is_err());

        let config = KnobwireConfig {
            bindings: vec![BindingConfig {
                object: Some("Light".to_string()),
                scale: 0,
                ..binding
            }],
            ..KnobwireConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_scene_path_relative_to_config() {
        let config = KnobwireConfig::default();
        let resolved = config.scene_path(Path::new("/projects/show/knobwire.yaml"));
        assert_eq!(resolved, PathBuf::from("/projects/show/scene.yaml"));
    }

    #[test]
    fn test_theme_toggle() {
        assert_eq!(Theme::Light.toggled(), Theme::Dark);
        assert_eq!(Theme::Dark.toggled().toggled(), Theme::Dark);
    }
}
