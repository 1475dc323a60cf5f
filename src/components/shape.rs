use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Footprint of a tool around its centre.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Shape {
    /// Euclidean disc, boundary included.
    #[default]
    Circle,
    /// Axis-aligned square (Chebyshev distance), boundary included.
    Square,
    /// Manhattan diamond, boundary excluded.
    Diamond,
}

impl Shape {
    pub fn all() -> &'static [Shape] {
        &[Shape::Circle, Shape::Square, Shape::Diamond]
    }

    pub fn name(&self) -> &'static str {
        match self {
            Shape::Circle => "circle",
            Shape::Square => "square",
            Shape::Diamond => "diamond",
        }
    }

    /// Returns true if pixel `(x, y)` lies inside the shape centred on `(cx, cy)`.
    #[inline]
    pub fn contains(&self, x: i64, y: i64, cx: i64, cy: i64, thickness: f32) -> bool {
        let dx = (x - cx) as f64;
        let dy = (y - cy) as f64;
        let t = thickness as f64;
        match self {
            Shape::Circle => dx * dx + dy * dy <= t * t,
            Shape::Square => dx.abs().max(dy.abs()) <= t,
            Shape::Diamond => dx.abs() + dy.abs() < t,
        }
    }

    /// Following shape in the selector cycle.
    pub fn next(self) -> Self {
        match self {
            Shape::Circle => Shape::Square,
            Shape::Square => Shape::Diamond,
            Shape::Diamond => Shape::Circle,
        }
    }

    /// Preceding shape in the selector cycle.
    pub fn prev(self) -> Self {
        match self {
            Shape::Circle => Shape::Diamond,
            Shape::Square => Shape::Circle,
            Shape::Diamond => Shape::Square,
        }
    }
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Shape {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Shape::all()
            .iter()
            .copied()
            .find(|shape| shape.name() == s)
            .ok_or_else(|| ConfigError::UnknownShape(s.to_string()))
    }
}
