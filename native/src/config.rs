//! Engine configuration, loaded from JSON.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::types::{mouse_button, ButtonColors};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Backend poll timeout per `process_input` call. 0 drains without blocking.
    pub poll_timeout_ms: u32,
    /// Mouse button that presses and selects focus elements.
    pub select_button: u8,
    /// Draw neighbor links of every focus element during `render`.
    pub debug_navigation: bool,
    /// Emit a key-up right after each key-down on backends that only report presses.
    pub synthesize_key_up: bool,
    pub colors: ButtonColors,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            poll_timeout_ms: 0,
            select_button: mouse_button::LEFT,
            debug_navigation: false,
            synthesize_key_up: true,
            colors: ButtonColors::default(),
        }
    }
}

impl EngineConfig {
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Color;

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config =
            EngineConfig::from_json_str(r#"{ "debug_navigation": true, "select_button": 3 }"#)
                .unwrap();
        assert!(config.debug_navigation);
        assert_eq!(config.select_button, mouse_button::RIGHT);
        assert_eq!(config.poll_timeout_ms, 0);
        assert!(config.synthesize_key_up);
        assert_eq!(config.colors, ButtonColors::default());
    }

    #[test]
    fn test_colors_override() {
        let config =
            EngineConfig::from_json_str(r#"{ "colors": { "selected": 4278190335 } }"#).unwrap();
        assert_eq!(config.colors.selected, Color(0xFF00_00FF));
        assert_eq!(config.colors.normal, ButtonColors::default().normal);
    }

    #[test]
    fn test_invalid_json_is_parse_error() {
        let err = EngineConfig::from_json_str("{ not json").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_missing_file_is_read_error() {
        let err = EngineConfig::from_path("/nonexistent/vyengine.json").unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }
}
