//! Per-scale configuration

use crate::scales::traits::ScaleCommand;
use crate::types::DEFAULT_DEVICE_NAME;
use anyhow::Context;
use log::debug;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScaleConfig {
    pub name: String,
    pub beep_level: Option<u8>,
    pub auto_off_minutes: Option<u8>,
    pub flow_smoothing: Option<bool>,
}

impl Default for ScaleConfig {
    fn default() -> Self {
        Self {
            name: DEFAULT_DEVICE_NAME.to_string(),
            beep_level: Some(3),
            auto_off_minutes: Some(5),
            flow_smoothing: Some(false),
        }
    }
}

impl ScaleConfig {
    pub fn from_json(json: &str) -> anyhow::Result<Self> {
        serde_json::from_str(json).context("invalid scale configuration")
    }

    /// Settings to push to the scale once connected, in the order the scale
    /// expects them. Unset options are left as the scale has them.
    pub fn initial_commands(&self) -> Vec<ScaleCommand> {
        let mut commands = Vec::new();
        if let Some(level) = self.beep_level {
            debug!("Applying initial beep level: {}", level);
            commands.push(ScaleCommand::SetBeepLevel(level));
        }
        if let Some(minutes) = self.auto_off_minutes {
            debug!("Applying initial auto-off minutes: {}", minutes);
            commands.push(ScaleCommand::SetAutoOffMinutes(minutes));
        }
        if let Some(enabled) = self.flow_smoothing {
            debug!("Applying initial flow smoothing: {}", enabled);
            commands.push(ScaleCommand::SetFlowSmoothing(enabled));
        }
        commands
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::{build_set_auto_off, build_set_beep_level, build_set_flow_smoothing};
    use crate::scales::BookooScale;

    #[test]
    fn test_defaults() {
        let config = ScaleConfig::default();
        assert_eq!(config.name, "Bookoo Scale");
        assert_eq!(
            config.initial_commands(),
            vec![
                ScaleCommand::SetBeepLevel(3),
                ScaleCommand::SetAutoOffMinutes(5),
                ScaleCommand::SetFlowSmoothing(false),
            ]
        );
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config =
            ScaleConfig::from_json(r#"{"name": "Bar scale", "beep_level": null}"#).unwrap();
        assert_eq!(config.name, "Bar scale");
        assert_eq!(config.beep_level, None);
        assert_eq!(config.auto_off_minutes, Some(5));
        assert_eq!(config.initial_commands().len(), 2);
    }

    #[test]
    fn test_serializes_only_device_settings() {
        let json = serde_json::to_value(ScaleConfig::default()).unwrap();
        let mut keys: Vec<&str> = json.as_object().unwrap().keys().map(String::as_str).collect();
        keys.sort_unstable();
        assert_eq!(keys, ["auto_off_minutes", "beep_level", "flow_smoothing", "name"]);
        assert!(ScaleConfig::from_json(r#"{"reconnect_interval_secs": 10}"#).is_ok());
    }

    #[test]
    fn test_invalid_json_is_an_error() {
        let err = ScaleConfig::from_json(r#"{"beep_level": "loud"}"#).unwrap_err();
        assert!(err.to_string().contains("invalid scale configuration"));
    }

    #[test]
    fn test_out_of_range_options_are_clamped_when_sent() {
        let json = r#"{"beep_level": 8, "auto_off_minutes": 0, "flow_smoothing": true}"#;
        let config = ScaleConfig::from_json(json).unwrap();
        let scale = BookooScale::new();
        let frames: Vec<[u8; 6]> = config
            .initial_commands()
            .into_iter()
            .map(|command| scale.command_frame(command))
            .collect();
        assert_eq!(
            frames,
            vec![
                build_set_beep_level(5),
                build_set_auto_off(1),
                build_set_flow_smoothing(true),
            ]
        );
    }
}
