mod actions;
mod core;
mod pointer;
mod render;

pub use core::{DrawingState, MAX_STROKE_WIDTH, MIN_STROKE_WIDTH, Session};
pub use pointer::PointerResponse;
