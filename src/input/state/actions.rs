use crate::config::ExportConfig;
use crate::draw::{Annotation, SurfaceError};
use crate::export::{self, ExportError};
use crate::util::Point;
use log::debug;
use std::io::Write;
use std::path::PathBuf;

use super::{DrawingState, Session};

impl Session {
    /// Commits a line of text at `(x, y)`, the anchor of an earlier
    /// [`PointerResponse::TextRequested`](super::PointerResponse::TextRequested).
    ///
    /// The text is sanitized first; returns `false` when nothing printable
    /// remains or the annotation limit is reached.
    pub fn confirm_text_at(&mut self, x: f64, y: f64, raw: &str) -> bool {
        match Annotation::text(Point::new(x, y), raw, self.style(), self.font.clone()) {
            Some(annotation) => self.engine.commit(annotation),
            None => {
                debug!("Ignoring empty text at ({:.1}, {:.1})", x, y);
                false
            }
        }
    }

    /// Undoes the most recent annotation. A drag in progress is cancelled first.
    pub fn undo(&mut self) -> bool {
        self.cancel();
        self.engine.undo()
    }

    /// Redoes the most recently undone annotation. A drag in progress is cancelled first.
    pub fn redo(&mut self) -> bool {
        self.cancel();
        self.engine.redo()
    }

    /// Removes every annotation. A drag in progress is cancelled first.
    pub fn clear(&mut self) -> bool {
        self.state = DrawingState::Idle;
        self.engine.clear()
    }

    /// Straight RGBA bytes of the committed image.
    ///
    /// A live drag preview is not included.
    pub fn export_rgba(&mut self) -> Result<Vec<u8>, SurfaceError> {
        self.cancel();
        self.engine.surface().to_rgba()
    }

    /// Encodes the committed image as PNG into `writer`.
    pub fn write_png<W: Write>(&mut self, writer: &mut W) -> Result<(), SurfaceError> {
        self.cancel();
        self.engine.surface().write_png(writer)
    }

    /// Saves the committed image into the configured export directory.
    pub fn save_png(&mut self, config: &ExportConfig) -> Result<PathBuf, ExportError> {
        self.cancel();
        export::save_png(self.engine.surface(), config)
    }
}
