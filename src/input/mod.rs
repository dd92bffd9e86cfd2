//! Pointer handling and tool state machine.
//!
//! This module turns a normalized pointer stream (down, move, up, leave) into
//! annotation commits. It holds the current tool and style and drives the
//! Idle → Dragging → Idle gesture state machine, drawing live previews while a
//! drag is in progress.

pub mod state;
pub mod tool;

// Re-export commonly used types at module level
pub use state::{DrawingState, PointerResponse, Session};
pub use tool::Tool;
