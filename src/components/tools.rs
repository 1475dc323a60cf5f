use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::components::shape::Shape;
use crate::error::ConfigError;

/// Upper end of the scale used by callers for opacity, density and threshold.
pub const SCALE_MAX: f32 = 100.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tool {
    #[default]
    Brush,
    Airbrush,
    Eraser,
    Filler,
    Picker,
}

impl Tool {
    pub fn all() -> &'static [Tool] {
        &[
            Tool::Brush,
            Tool::Airbrush,
            Tool::Eraser,
            Tool::Filler,
            Tool::Picker,
        ]
    }

    pub fn name(&self) -> &'static str {
        match self {
            Tool::Brush => "brush",
            Tool::Airbrush => "airbrush",
            Tool::Eraser => "eraser",
            Tool::Filler => "filler",
            Tool::Picker => "picker",
        }
    }
}

impl fmt::Display for Tool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Tool {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Tool::all()
            .iter()
            .copied()
            .find(|tool| tool.name() == s)
            .ok_or_else(|| ConfigError::UnknownTool(s.to_string()))
    }
}

/// Active tool and its properties.
///
/// Opacity, density and threshold are accepted on a `0..=100` scale and
/// stored normalized to `[0, 1]`. Every setter validates its input and leaves
/// the previous value in place on error.
#[derive(Clone, Debug, PartialEq)]
pub struct ToolConfig {
    tool: Tool,
    shape: Shape,
    thickness: f32,
    opacity: f32,
    density: f32,
    threshold: f32,
}

impl Default for ToolConfig {
    fn default() -> Self {
        Self {
            tool: Tool::Brush,
            shape: Shape::Circle,
            thickness: 10.0,
            opacity: 1.0,
            density: 0.5,
            threshold: 0.1,
        }
    }
}

impl ToolConfig {
    pub fn tool(&self) -> Tool {
        self.tool
    }

    pub fn shape(&self) -> Shape {
        self.shape
    }

    pub fn thickness(&self) -> f32 {
        self.thickness
    }

    /// Normalized opacity in `[0, 1]`.
    pub fn opacity(&self) -> f32 {
        self.opacity
    }

    /// Normalized airbrush density in `[0, 1]`.
    pub fn density(&self) -> f32 {
        self.density
    }

    /// Normalized fill threshold in `[0, 1]`.
    pub fn threshold(&self) -> f32 {
        self.threshold
    }

    pub fn set_tool(&mut self, tool: Tool) {
        self.tool = tool;
    }

    pub fn set_tool_name(&mut self, name: &str) -> Result<(), ConfigError> {
        self.tool = name.parse()?;
        Ok(())
    }

    pub fn set_shape(&mut self, shape: Shape) {
        self.shape = shape;
    }

    pub fn set_shape_name(&mut self, name: &str) -> Result<(), ConfigError> {
        self.shape = name.parse()?;
        Ok(())
    }

    pub fn set_thickness(&mut self, thickness: f32) -> Result<(), ConfigError> {
        if !thickness.is_finite() || thickness < 0.0 {
            return Err(ConfigError::InvalidThickness(thickness));
        }
        self.thickness = thickness;
        Ok(())
    }

    pub fn set_opacity(&mut self, value: f32) -> Result<(), ConfigError> {
        self.opacity = normalize("opacity", value)?;
        Ok(())
    }

    pub fn set_density(&mut self, value: f32) -> Result<(), ConfigError> {
        self.density = normalize("density", value)?;
        Ok(())
    }

    pub fn set_threshold(&mut self, value: f32) -> Result<(), ConfigError> {
        self.threshold = normalize("threshold", value)?;
        Ok(())
    }
}

/// Map a `0..=100` value into `[0, 1]`, rejecting anything outside the range.
fn normalize(name: &'static str, value: f32) -> Result<f32, ConfigError> {
    if (0.0..=SCALE_MAX).contains(&value) {
        Ok(value / SCALE_MAX)
    } else {
        Err(ConfigError::OutOfRange {
            name,
            value,
            max: SCALE_MAX,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scale_values_are_normalized() {
        let mut config = ToolConfig::default();
        config.set_opacity(40.0).unwrap();
        config.set_density(100.0).unwrap();
        config.set_threshold(0.0).unwrap();
        assert!((config.opacity() - 0.4).abs() < 1e-6);
        assert_eq!(config.density(), 1.0);
        assert_eq!(config.threshold(), 0.0);
    }

    #[test]
    fn rejected_values_keep_previous_setting() {
        let mut config = ToolConfig::default();
        config.set_tool_name("eraser").unwrap();
        assert!(config.set_tool_name("smudge").is_err());
        assert_eq!(config.tool(), Tool::Eraser);

        assert!(config.set_opacity(150.0).is_err());
        assert!(config.set_opacity(f32::NAN).is_err());
        assert_eq!(config.opacity(), 1.0);

        assert!(config.set_thickness(-1.0).is_err());
        assert_eq!(config.thickness(), 10.0);

        assert!(config.set_shape_name("star").is_err());
        assert_eq!(config.shape(), Shape::Circle);
    }
}
