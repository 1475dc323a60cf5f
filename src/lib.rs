//! Raster drawing engine: tool actions over an RGBA pixel buffer with
//! snapshot-based undo/redo.

pub mod canvas;
pub mod components;
pub mod engine;
pub mod error;
pub mod logger;
pub mod ops;
pub mod settings;

pub use canvas::{PixelBuffer, PixelRect, StrokeMask};
pub use components::history::{HistoryEntry, HistoryStack};
pub use components::shape::Shape;
pub use components::tools::{Tool, ToolConfig};
pub use engine::{DrawingEngine, ToolOutcome};
pub use error::{ConfigError, EngineError, ScriptError, SettingsError};
pub use ops::fill::{FillReport, Traversal};
pub use settings::EngineSettings;

pub use image::Rgba;
