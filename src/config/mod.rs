//! Configuration loading and validation

mod schema;

pub use schema::*;

use anyhow::{Context, Result};
use std::path::Path;

/// Load configuration from a YAML file
pub fn load_config(path: &Path) -> Result<KnobwireConfig> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config {:?}", path))?;
    let config: KnobwireConfig = serde_yaml::from_str(&contents)?;
    config.validate()?;
    Ok(config)
}

/// Write configuration back to a YAML file
pub fn save_config(path: &Path, config: &KnobwireConfig) -> Result<()> {
    config.validate()?;
    let contents = serde_yaml::to_string(config)?;
    std::fs::write(path, contents).with_context(|| format!("Failed to write config {:?}", path))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controls::ControlChannel;
    use tempfile::NamedTempFile;
    use std::io::Write;

    #[test]
    fn test_load_minimal_config() {
        let yaml = r#"
midi:
  port: nanoKONTROL

live:
  tick_rate_hz: 30

bindings: []
"#;
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(yaml.as_bytes()).unwrap();

        let config = load_config(file.path()).unwrap();
        assert_eq!(config.midi.port.as_deref(), Some("nanoKONTROL"));
        assert_eq!(config.midi.client_name, "knobwire");
        assert_eq!(config.live.tick_rate_hz, 30);
        assert_eq!(config.display.theme, Theme::Light);
    }

    #[test]
    fn test_load_invalid_config() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(b"live:\n  tick_rate_hz: 5000\n").unwrap();
        assert!(load_config(file.path()).is_err());
    }

    #[test]
    fn test_save_and_reload() {
        let file = NamedTempFile::new().unwrap();
        let mut config = KnobwireConfig::default();
        config.display.theme = Theme::Dark;
        config.bindings.push(BindingConfig {
            control: ControlChannel::knob(3).unwrap(),
            object: Some("Light".to_string()),
            field: Some("intensity".to_string()),
            scale: 10,
            value: 2.5,
        });

        save_config(file.path(), &config).unwrap();
        let reloaded = load_config(file.path()).unwrap();
        assert_eq!(reloaded, config);

        let text = std::fs::read_to_string(file.path()).unwrap();
        assert!(text.contains("knob4"));
    }
}
