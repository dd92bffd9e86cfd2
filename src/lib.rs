//! Screenshot annotation engine.
//!
//! Composites vector annotations (arrows, rectangles, circles, highlights,
//! text) and destructive mosaic blurs over a captured image, with exact undo
//! of every blur through pixel snapshots. [`Session`] is the entry point: it
//! takes pointer input in surface coordinates and keeps the composited image
//! ready for export.

pub mod config;
pub mod draw;
pub mod engine;
pub mod export;
pub mod input;
pub mod script;
pub mod util;

pub use config::Config;
pub use input::{Session, Tool};
