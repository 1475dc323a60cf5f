use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::components::shape::Shape;
use crate::components::tools::Tool;
use crate::error::SettingsError;

/// Engine start-up settings.
///
/// Opacity, density and threshold use the same `0..=100` scale as the
/// runtime setters.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineSettings {
    /// Maximum number of undo entries kept; unbounded when `None`.
    pub history_limit: Option<usize>,
    /// Seed for the airbrush RNG. Entropy-seeded when `None`.
    pub seed: Option<u64>,
    pub tool: Tool,
    pub shape: Shape,
    pub thickness: f32,
    pub opacity: f32,
    pub density: f32,
    pub threshold: f32,
    pub color: [u8; 4],
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            history_limit: None,
            seed: None,
            tool: Tool::Brush,
            shape: Shape::Circle,
            thickness: 10.0,
            opacity: 100.0,
            density: 50.0,
            threshold: 10.0,
            color: [0, 0, 0, 255],
        }
    }
}

impl EngineSettings {
    pub fn from_json(text: &str) -> Result<Self, SettingsError> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn load(path: &Path) -> Result<Self, SettingsError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json(&text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_fields_fall_back_to_defaults() {
        let settings = EngineSettings::from_json(r#"{ "tool": "airbrush", "seed": 7 }"#).unwrap();
        assert_eq!(settings.tool, Tool::Airbrush);
        assert_eq!(settings.seed, Some(7));
        assert_eq!(settings.shape, Shape::Circle);
        assert_eq!(settings.history_limit, None);
    }

    #[test]
    fn unknown_tool_is_a_parse_error() {
        assert!(matches!(
            EngineSettings::from_json(r#"{ "tool": "lasso" }"#),
            Err(SettingsError::Parse(_))
        ));
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let path = std::env::temp_dir().join("paint-engine-no-such-settings.json");
        assert!(matches!(EngineSettings::load(&path), Err(SettingsError::Io(_))));
    }
}
