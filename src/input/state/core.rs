//! Gesture state machine and session state.

use crate::config::Config;
use crate::draw::{
    Annotation, ArrowHead, BaseImage, Color, FontDescriptor, RasterSurface, Style, SurfaceError,
};
use crate::engine::Engine;
use crate::input::tool::Tool;
use crate::util::Point;
use log::debug;

/// Smallest stroke width a session accepts.
pub const MIN_STROKE_WIDTH: u32 = 1;
/// Largest stroke width a session accepts.
pub const MAX_STROKE_WIDTH: u32 = 20;

/// Current gesture state.
///
/// Text placement is a single click and never enters `Dragging`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DrawingState {
    /// Not actively drawing - waiting for pointer input
    Idle,
    /// Pointer held down with a drag tool
    Dragging {
        /// Tool captured at pointer-down; later tool changes don't affect this drag
        tool: Tool,
        /// Where the pointer went down, in surface coordinates
        start: Point,
        /// Latest pointer position, in surface coordinates
        current: Point,
    },
}

/// One annotation session over a base image.
///
/// Owns the engine (surface, base image, annotation store, history) together
/// with the current tool and style, and turns pointer input into commits.
/// Pointer coordinates are surface coordinates; hosts rendering at a
/// different size convert with [`crate::util::display_to_surface`] first.
#[derive(Debug)]
pub struct Session {
    pub(super) engine: Engine,
    pub(super) current_tool: Tool,
    pub(super) current_color: Color,
    pub(super) current_stroke_width: u32,
    pub(super) arrow_head: ArrowHead,
    pub(super) font: FontDescriptor,
    pub(super) state: DrawingState,
}

impl Session {
    /// Creates a session over `base` with tool defaults taken from `config`.
    ///
    /// The session starts with the arrow tool.
    pub fn new(base: BaseImage, config: &Config) -> Result<Self, SurfaceError> {
        let engine = Engine::new(
            base,
            config.history.undo_strategy,
            config.history.max_annotations,
        )?;
        Ok(Self::with_engine(
            engine,
            config.drawing.default_color.to_color(),
            config.drawing.default_stroke_width,
            config.arrow_head(),
            config.font(),
        ))
    }

    /// Creates a session around an existing engine with explicit defaults.
    pub fn with_engine(
        engine: Engine,
        color: Color,
        stroke_width: u32,
        arrow_head: ArrowHead,
        font: FontDescriptor,
    ) -> Self {
        Self {
            engine,
            current_tool: Tool::Arrow,
            current_color: color,
            current_stroke_width: stroke_width.clamp(MIN_STROKE_WIDTH, MAX_STROKE_WIDTH),
            arrow_head,
            font,
            state: DrawingState::Idle,
        }
    }

    /// Replaces the base image. Any drag in progress, all annotations and
    /// all history are discarded.
    pub fn load_base_image(&mut self, base: BaseImage) -> Result<(), SurfaceError> {
        self.state = DrawingState::Idle;
        self.engine.load_base_image(base)
    }

    pub fn active_tool(&self) -> Tool {
        self.current_tool
    }

    /// Selects the tool for the next gesture. A drag already in progress
    /// keeps the tool it started with.
    pub fn set_active_tool(&mut self, tool: Tool) {
        debug!("Active tool: {:?}", tool);
        self.current_tool = tool;
    }

    pub fn color(&self) -> Color {
        self.current_color
    }

    pub fn set_color(&mut self, color: Color) {
        self.current_color = color;
    }

    pub fn stroke_width(&self) -> u32 {
        self.current_stroke_width
    }

    /// Sets the stroke width, clamped to 1-20 pixels.
    pub fn set_stroke_width(&mut self, width: u32) {
        let clamped = width.clamp(MIN_STROKE_WIDTH, MAX_STROKE_WIDTH);
        if clamped != width {
            debug!("Stroke width {} clamped to {}", width, clamped);
        }
        self.current_stroke_width = clamped;
    }

    pub fn arrow_head(&self) -> ArrowHead {
        self.arrow_head
    }

    pub fn font(&self) -> &FontDescriptor {
        &self.font
    }

    pub fn set_font(&mut self, font: FontDescriptor) {
        self.font = font;
    }

    /// Style new annotations are committed with.
    pub fn style(&self) -> Style {
        Style::new(self.current_color, self.current_stroke_width)
    }

    pub fn state(&self) -> &DrawingState {
        &self.state
    }

    pub fn engine(&self) -> &Engine {
        &self.engine
    }

    /// The composited surface, including any live preview.
    pub fn surface(&self) -> &RasterSurface {
        self.engine.surface()
    }

    pub fn annotations(&self) -> &[Annotation] {
        self.engine.annotations()
    }

    pub fn annotation_count(&self) -> usize {
        self.engine.annotations().len()
    }

    pub fn can_undo(&self) -> bool {
        self.engine.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.engine.can_redo()
    }
}
