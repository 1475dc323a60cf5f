// ============================================================================
// ACTION SCRIPTS - replay a recorded sequence of engine calls
// ============================================================================
//
// A script is a JSON array of actions tagged by "op", e.g.
//
//   [
//     { "op": "color", "rgba": [255, 0, 0, 255] },
//     { "op": "snapshot" },
//     { "op": "stroke", "points": [[10, 10], [12, 11], [14, 12]] },
//     { "op": "undo" }
//   ]

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::engine::{DrawingEngine, ToolOutcome};
use crate::error::{EngineError, ScriptError};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Action {
    Tool { name: String },
    Shape { name: String },
    NextShape,
    PrevShape,
    Thickness { value: f32 },
    /// `0..=100` scale.
    Opacity { value: f32 },
    /// `0..=100` scale.
    Density { value: f32 },
    /// `0..=100` scale.
    Threshold { value: f32 },
    Color { rgba: [u8; 4] },
    /// One gesture: `start_stroke` followed by one tool application per point.
    Stroke { points: Vec<(i32, i32)> },
    /// A single tool application without resetting the stroke mask.
    Apply { x: i32, y: i32 },
    /// Flood fill with the active colour and threshold.
    Fill { x: i32, y: i32 },
    Pick { x: i32, y: i32 },
    Snapshot,
    Undo,
    Redo,
    Resize { width: u32, height: u32 },
}

/// Totals gathered while replaying a script.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ReplaySummary {
    pub steps: usize,
    pub painted_pixels: usize,
    pub filled_pixels: usize,
    pub picks: usize,
    pub undos: usize,
    pub redos: usize,
    /// Undo/redo requests that found an empty stack.
    pub history_misses: usize,
}

pub fn parse_script(text: &str) -> Result<Vec<Action>, ScriptError> {
    Ok(serde_json::from_str(text)?)
}

pub fn load_script(path: &Path) -> Result<Vec<Action>, ScriptError> {
    let text = std::fs::read_to_string(path)?;
    parse_script(&text)
}

/// Run `actions` against `engine` in order, stopping at the first failing step.
pub fn replay(engine: &mut DrawingEngine, actions: &[Action]) -> Result<ReplaySummary, ScriptError> {
    let mut summary = ReplaySummary::default();
    for (step, action) in actions.iter().enumerate() {
        run_action(engine, action, &mut summary).map_err(|source| ScriptError::Step { step, source })?;
        summary.steps += 1;
    }
    Ok(summary)
}

fn run_action(
    engine: &mut DrawingEngine,
    action: &Action,
    summary: &mut ReplaySummary,
) -> Result<(), EngineError> {
    match action {
        Action::Tool { name } => engine.set_tool_name(name)?,
        Action::Shape { name } => engine.set_shape_name(name)?,
        Action::NextShape => {
            engine.next_shape();
        }
        Action::PrevShape => {
            engine.prev_shape();
        }
        Action::Thickness { value } => engine.set_thickness(*value)?,
        Action::Opacity { value } => engine.set_opacity(*value)?,
        Action::Density { value } => engine.set_density(*value)?,
        Action::Threshold { value } => engine.set_threshold(*value)?,
        Action::Color { rgba: [r, g, b, a] } => engine.set_color(*r, *g, *b, *a),
        Action::Stroke { points } => {
            engine.start_stroke();
            for &(x, y) in points {
                let outcome = engine.apply_stroke(x, y)?;
                record(summary, outcome);
            }
        }
        Action::Apply { x, y } => {
            let outcome = engine.apply_stroke(*x, *y)?;
            record(summary, outcome);
        }
        Action::Fill { x, y } => {
            let report = engine.fill_at(*x, *y)?;
            summary.filled_pixels += report.filled;
        }
        Action::Pick { x, y } => {
            engine.pick(*x, *y)?;
            summary.picks += 1;
        }
        Action::Snapshot => engine.snapshot(),
        Action::Undo => {
            if engine.undo() {
                summary.undos += 1;
            } else {
                summary.history_misses += 1;
            }
        }
        Action::Redo => {
            if engine.redo() {
                summary.redos += 1;
            } else {
                summary.history_misses += 1;
            }
        }
        Action::Resize { width, height } => engine.resize(*width, *height, None)?,
    }
    Ok(())
}

fn record(summary: &mut ReplaySummary, outcome: ToolOutcome) {
    match outcome {
        ToolOutcome::Painted { pixels } => summary.painted_pixels += pixels,
        ToolOutcome::Filled(report) => summary.filled_pixels += report.filled,
        ToolOutcome::Picked(_) => summary.picks += 1,
    }
}
