use thiserror::Error;

/// Rejected configuration values. The previous setting is always kept.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("invalid tool '{0}'")]
    UnknownTool(String),
    #[error("invalid shape '{0}'")]
    UnknownShape(String),
    /// A 0..=100 scale value outside its range (or NaN).
    #[error("{name} must be within 0..={max}, got {value}")]
    OutOfRange {
        name: &'static str,
        value: f32,
        max: f32,
    },
    #[error("thickness must be a finite, non-negative number, got {0}")]
    InvalidThickness(f32),
}

/// Errors raised by engine operations.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("coordinate ({x}, {y}) is outside the {width}x{height} buffer")]
    OutOfBounds {
        x: i64,
        y: i64,
        width: u32,
        height: u32,
    },
    #[error("invalid canvas size {width}x{height}")]
    InvalidSize { width: u32, height: u32 },
    #[error("pixel data has {actual} bytes, expected {expected}")]
    DataLength { expected: usize, actual: usize },
    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Errors raised while loading an engine settings file.
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to read settings: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse settings: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Errors raised while loading or replaying an action script.
#[derive(Debug, Error)]
pub enum ScriptError {
    #[error("failed to read script: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse script: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("step {step}: {source}")]
    Step {
        step: usize,
        #[source]
        source: EngineError,
    },
}
