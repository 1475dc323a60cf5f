use std::fmt;

use image::{Rgba, RgbaImage};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::canvas::{PixelBuffer, StrokeMask};
use crate::components::history::HistoryStack;
use crate::components::shape::Shape;
use crate::components::tools::{Tool, ToolConfig};
use crate::error::{ConfigError, EngineError};
use crate::ops::compositor;
use crate::ops::fill::{self, FillReport};
use crate::ops::picker;
use crate::settings::EngineSettings;

/// Callback invoked with the new `(width, height)` after the buffer is reinitialised.
pub type ResizeObserver = Box<dyn FnMut(u32, u32)>;

/// What a single tool action did to the canvas.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ToolOutcome {
    /// Brush, airbrush or eraser pass; `pixels` were claimed by the stroke.
    Painted { pixels: usize },
    Filled(FillReport),
    Picked(Rgba<u8>),
}

/// The raster drawing engine.
///
/// Owns the pixel buffer together with everything that mutates it: the
/// per-stroke mask, the tool configuration, the active colour, the undo/redo
/// history and the airbrush RNG. All operations run synchronously to
/// completion.
pub struct DrawingEngine {
    buffer: PixelBuffer,
    stroke_mask: StrokeMask,
    config: ToolConfig,
    color: Rgba<u8>,
    history: HistoryStack,
    rng: StdRng,
    resize_observers: Vec<ResizeObserver>,
}

impl fmt::Debug for DrawingEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DrawingEngine")
            .field("width", &self.buffer.width())
            .field("height", &self.buffer.height())
            .field("config", &self.config)
            .field("color", &self.color)
            .field("history", &self.history)
            .field("resize_observers", &format!("<{} observers>", self.resize_observers.len()))
            .finish()
    }
}

impl DrawingEngine {
    /// Opaque white canvas with default settings.
    pub fn new(width: u32, height: u32) -> Result<Self, EngineError> {
        Self::with_settings(width, height, &EngineSettings::default())
    }

    pub fn with_settings(
        width: u32,
        height: u32,
        settings: &EngineSettings,
    ) -> Result<Self, EngineError> {
        validate_size(width, height)?;
        Self::from_buffer(PixelBuffer::new(width, height), settings)
    }

    /// Canvas initialised from a decoded image, sized to it.
    pub fn from_image(image: RgbaImage, settings: &EngineSettings) -> Result<Self, EngineError> {
        validate_size(image.width(), image.height())?;
        Self::from_buffer(PixelBuffer::from_rgba_image(image), settings)
    }

    fn from_buffer(buffer: PixelBuffer, settings: &EngineSettings) -> Result<Self, EngineError> {
        let mut engine = Self {
            stroke_mask: StrokeMask::new(buffer.pixel_count()),
            buffer,
            config: ToolConfig::default(),
            color: Rgba([0, 0, 0, 255]),
            history: HistoryStack::new(),
            rng: StdRng::from_entropy(),
            resize_observers: Vec::new(),
        };
        engine.apply_settings(settings)?;
        Ok(engine)
    }

    /// Apply start-up settings.
    ///
    /// Every value is validated before anything is committed; on error the
    /// engine is left exactly as it was.
    pub fn apply_settings(&mut self, settings: &EngineSettings) -> Result<(), ConfigError> {
        let mut config = self.config.clone();
        config.set_tool(settings.tool);
        config.set_shape(settings.shape);
        config
            .set_thickness(settings.thickness)
            .and_then(|_| config.set_opacity(settings.opacity))
            .and_then(|_| config.set_density(settings.density))
            .and_then(|_| config.set_threshold(settings.threshold))
            .inspect_err(report)?;

        self.config = config;
        self.history.set_max_depth(settings.history_limit);
        self.rng = match settings.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        self.color = Rgba(settings.color);
        Ok(())
    }

    // ------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------

    pub fn buffer(&self) -> &PixelBuffer {
        &self.buffer
    }

    pub fn width(&self) -> u32 {
        self.buffer.width()
    }

    pub fn height(&self) -> u32 {
        self.buffer.height()
    }

    pub fn config(&self) -> &ToolConfig {
        &self.config
    }

    pub fn history(&self) -> &HistoryStack {
        &self.history
    }

    pub fn stroke_mask(&self) -> &StrokeMask {
        &self.stroke_mask
    }

    /// Active colour used by brush, airbrush and filler.
    pub fn color(&self) -> Rgba<u8> {
        self.color
    }

    pub fn set_color(&mut self, r: u8, g: u8, b: u8, a: u8) {
        self.color = Rgba([r, g, b, a]);
    }

    // ------------------------------------------------------------------
    // Configuration
    // ------------------------------------------------------------------

    pub fn set_tool(&mut self, tool: Tool) {
        self.config.set_tool(tool);
    }

    /// Select a tool by name. Unknown names are rejected and the current tool kept.
    pub fn set_tool_name(&mut self, name: &str) -> Result<(), ConfigError> {
        self.config.set_tool_name(name).inspect_err(report)
    }

    pub fn set_shape(&mut self, shape: Shape) {
        self.config.set_shape(shape);
    }

    /// Select a shape by name. Unknown names are rejected and the current shape kept.
    pub fn set_shape_name(&mut self, name: &str) -> Result<(), ConfigError> {
        self.config.set_shape_name(name).inspect_err(report)
    }

    pub fn next_shape(&mut self) -> Shape {
        let shape = self.config.shape().next();
        self.config.set_shape(shape);
        shape
    }

    pub fn prev_shape(&mut self) -> Shape {
        let shape = self.config.shape().prev();
        self.config.set_shape(shape);
        shape
    }

    pub fn set_thickness(&mut self, thickness: f32) -> Result<(), ConfigError> {
        self.config.set_thickness(thickness).inspect_err(report)
    }

    /// Opacity on a `0..=100` scale.
    pub fn set_opacity(&mut self, value: f32) -> Result<(), ConfigError> {
        self.config.set_opacity(value).inspect_err(report)
    }

    /// Airbrush density on a `0..=100` scale.
    pub fn set_density(&mut self, value: f32) -> Result<(), ConfigError> {
        self.config.set_density(value).inspect_err(report)
    }

    /// Fill threshold on a `0..=100` scale.
    pub fn set_threshold(&mut self, value: f32) -> Result<(), ConfigError> {
        self.config.set_threshold(value).inspect_err(report)
    }

    // ------------------------------------------------------------------
    // Buffer lifecycle
    // ------------------------------------------------------------------

    /// Register a callback run after every buffer reinitialisation.
    pub fn on_resize(&mut self, observer: impl FnMut(u32, u32) + 'static) {
        self.resize_observers.push(Box::new(observer));
    }

    /// Replace the buffer with a `width x height` canvas.
    ///
    /// With `image`, the canvas starts fully transparent and the image is drawn
    /// at the origin (cropped if larger). Without it, the canvas is opaque
    /// white. The stroke mask is reallocated and resize observers notified.
    pub fn resize(
        &mut self,
        width: u32,
        height: u32,
        image: Option<&RgbaImage>,
    ) -> Result<(), EngineError> {
        validate_size(width, height)?;
        self.buffer = match image {
            Some(source) => {
                let mut canvas = RgbaImage::from_pixel(width, height, Rgba([0, 0, 0, 0]));
                image::imageops::replace(&mut canvas, source, 0, 0);
                PixelBuffer::from_rgba_image(canvas)
            }
            None => PixelBuffer::new(width, height),
        };
        log::info!(
            "canvas reinitialised to {}x{} ({})",
            width,
            height,
            if image.is_some() { "from image" } else { "blank" }
        );
        self.buffer_dimensions_changed();
        Ok(())
    }

    fn buffer_dimensions_changed(&mut self) {
        self.stroke_mask = StrokeMask::new(self.buffer.pixel_count());
        let (w, h) = (self.buffer.width(), self.buffer.height());
        for observer in &mut self.resize_observers {
            observer(w, h);
        }
    }

    // ------------------------------------------------------------------
    // Tool actions
    // ------------------------------------------------------------------

    /// Begin a new continuous gesture: every pixel becomes paintable again.
    pub fn start_stroke(&mut self) {
        self.stroke_mask.reset();
    }

    /// Apply the active tool at pointer position `(x, y)`.
    ///
    /// Brush, airbrush and eraser process the footprint's bounding box,
    /// clipped to the buffer; each pixel is affected at most once per stroke.
    /// The filler floods from `(x, y)` with the active colour, its alpha
    /// scaled by opacity. The picker samples into the active colour.
    pub fn apply_stroke(&mut self, x: i32, y: i32) -> Result<ToolOutcome, EngineError> {
        match self.config.tool() {
            Tool::Brush | Tool::Airbrush | Tool::Eraser => Ok(ToolOutcome::Painted {
                pixels: self.paint(x as i64, y as i64),
            }),
            Tool::Filler => self.fill_at(x, y).map(ToolOutcome::Filled),
            Tool::Picker => self.pick(x, y).map(ToolOutcome::Picked),
        }
    }

    fn paint(&mut self, cx: i64, cy: i64) -> usize {
        let thickness = self.config.thickness();
        let Some(rect) = self.buffer.clip_box(cx, cy, thickness) else {
            return 0;
        };
        let tool = self.config.tool();
        let shape = self.config.shape();
        let opacity = self.config.opacity();
        let density = self.config.density();
        let width = self.buffer.width() as usize;

        let mut claimed = 0;
        for (px, py) in rect.iter() {
            let idx = py as usize * width + px as usize;
            if !shape.contains(px as i64, py as i64, cx, cy, thickness) || !self.stroke_mask.mark(idx) {
                continue;
            }
            claimed += 1;
            match tool {
                Tool::Brush => compositor::blend(&mut self.buffer, idx, self.color, opacity),
                Tool::Airbrush => {
                    if self.rng.r#gen::<f32>() < density {
                        compositor::blend(&mut self.buffer, idx, self.color, opacity);
                    }
                }
                Tool::Eraser => compositor::erase(&mut self.buffer, idx, opacity),
                Tool::Filler | Tool::Picker => {}
            }
        }
        claimed
    }

    /// Flood fill from `(x, y)` with an explicit colour and normalized threshold.
    pub fn fill(
        &mut self,
        x: i32,
        y: i32,
        color: Rgba<u8>,
        threshold: f32,
    ) -> Result<FillReport, EngineError> {
        fill::flood_fill(&mut self.buffer, x as i64, y as i64, color, threshold)
    }

    /// Flood fill from `(x, y)` using the active colour (alpha scaled by
    /// opacity) and the configured threshold.
    pub fn fill_at(&mut self, x: i32, y: i32) -> Result<FillReport, EngineError> {
        let mut color = self.color;
        color[3] = (color[3] as f32 * self.config.opacity()).round() as u8;
        let threshold = self.config.threshold();
        self.fill(x, y, color, threshold)
    }

    /// Sample the canvas at `(x, y)` into the active colour and return it.
    pub fn pick(&mut self, x: i32, y: i32) -> Result<Rgba<u8>, EngineError> {
        let color = picker::pick_color(
            &self.buffer,
            x as i64,
            y as i64,
            self.config.shape(),
            self.config.thickness(),
        )?;
        self.color = color;
        Ok(color)
    }

    // ------------------------------------------------------------------
    // History
    // ------------------------------------------------------------------

    /// Record the current buffer for undo and discard the redo branch.
    pub fn snapshot(&mut self) {
        self.history.snapshot(&self.buffer);
    }

    pub fn undo(&mut self) -> bool {
        let dims = (self.buffer.width(), self.buffer.height());
        let undone = self.history.undo(&mut self.buffer);
        if undone {
            self.restored(dims);
        }
        undone
    }

    pub fn redo(&mut self) -> bool {
        let dims = (self.buffer.width(), self.buffer.height());
        let redone = self.history.redo(&mut self.buffer);
        if redone {
            self.restored(dims);
        }
        redone
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    fn restored(&mut self, previous: (u32, u32)) {
        if previous != (self.buffer.width(), self.buffer.height()) {
            self.buffer_dimensions_changed();
        }
    }
}

fn validate_size(width: u32, height: u32) -> Result<(), EngineError> {
    if width == 0 || height == 0 {
        return Err(EngineError::InvalidSize { width, height });
    }
    Ok(())
}

fn report(err: &ConfigError) {
    log::warn!("configuration rejected: {}", err);
}
