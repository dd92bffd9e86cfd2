//! Commit, undo, redo and clear.

use super::Engine;
use super::compositor::apply_annotation;
use crate::config::UndoStrategy;
use crate::draw::{Annotation, PixelBlock};
use crate::util::{Point, Rect};
use log::{debug, info, warn};

impl Engine {
    /// Commits a finished annotation.
    ///
    /// Degenerate annotations (accidental clicks, off-surface areas, empty
    /// text) are dropped and any live preview is cleared. A successful commit
    /// empties the redo stack. Returns `true` if the annotation was stored.
    pub fn commit(&mut self, annotation: Annotation) -> bool {
        if !self.append(annotation) {
            self.discard_preview();
            return false;
        }
        self.redo_stack.clear();
        true
    }

    /// Appends to the store and draws the result, leaving redo history alone.
    fn append(&mut self, annotation: Annotation) -> bool {
        let (width, height) = (self.surface.width(), self.surface.height());
        if !annotation.is_committable(width, height) {
            debug!("Dropping degenerate {:?} annotation", annotation.tool());
            return false;
        }
        if self.max_annotations > 0 && self.store.len() >= self.max_annotations {
            warn!(
                "Annotation limit ({}) reached; ignoring new {:?}",
                self.max_annotations,
                annotation.tool()
            );
            return false;
        }

        // The surface must show exactly the committed state before a snapshot
        // is read or a shape is drawn on top of it.
        self.recomposite();

        let annotation = match annotation {
            Annotation::Blur {
                start, end, style, ..
            } => {
                let snapshot = self.capture_region(start, end);
                Annotation::Blur {
                    start,
                    end,
                    style,
                    snapshot,
                }
            }
            other => other,
        };

        let tool = annotation.tool();
        if !self.store.try_push(annotation, self.max_annotations) {
            return false;
        }
        if let Some(committed) = self.store.last() {
            apply_annotation(&mut self.surface, committed);
        }

        debug!("Committed {:?} annotation ({} total)", tool, self.store.len());
        true
    }

    /// Reads the pixels a blur is about to overwrite.
    ///
    /// A failed read is logged and yields `None`; the blur then renders as a
    /// flat overlay and undoing it falls back to a full recomposite.
    fn capture_region(&self, start: Point, end: Point) -> Option<PixelBlock> {
        let rect = Rect::from_corners(start, end)?
            .clamp_to_bounds(self.surface.width(), self.surface.height())?;
        match self.surface.get_pixels(rect) {
            Ok(Some(block)) => {
                debug_assert_eq!(block.rect(), rect);
                Some(block)
            }
            Ok(None) => None,
            Err(err) => {
                warn!("Could not capture pixels under blur {:?}: {}", rect, err);
                None
            }
        }
    }

    /// Removes the most recent annotation and restores the previous appearance.
    ///
    /// Blurs with a snapshot are undone by writing the snapshot back when the
    /// strategy is [`UndoStrategy::Restore`]; everything else recomposites.
    /// Returns `false` when there was nothing to undo.
    pub fn undo(&mut self) -> bool {
        let Some(annotation) = self.store.pop() else {
            debug!("Nothing to undo");
            return false;
        };

        let restored = match (&annotation, self.undo_strategy) {
            (
                Annotation::Blur {
                    snapshot: Some(snapshot),
                    ..
                },
                UndoStrategy::Restore,
            ) if !self.preview_visible => match self.surface.set_pixels(snapshot) {
                Ok(()) => true,
                Err(err) => {
                    warn!("Restoring blur snapshot failed: {}; recompositing", err);
                    false
                }
            },
            _ => false,
        };
        if !restored {
            self.recomposite();
        }

        debug!(
            "Undid {:?} annotation ({} remaining)",
            annotation.tool(),
            self.store.len()
        );
        self.redo_stack.push(annotation);
        true
    }

    /// Re-applies the most recently undone annotation.
    ///
    /// Blurs are re-snapshotted against the current surface. Returns `false`
    /// when the redo stack is empty or the annotation no longer fits.
    pub fn redo(&mut self) -> bool {
        let Some(annotation) = self.redo_stack.pop() else {
            debug!("Nothing to redo");
            return false;
        };
        let tool = annotation.tool();
        if !self.append(annotation) {
            warn!("Could not redo {:?} annotation", tool);
            self.discard_preview();
            return false;
        }
        true
    }

    /// Removes every annotation, drops redo history and recomposites.
    ///
    /// Returns `true` if anything was removed.
    pub fn clear(&mut self) -> bool {
        let removed = self.store.len();
        self.store.clear();
        self.redo_stack.clear();
        self.recomposite();

        if removed > 0 {
            info!("Cleared {} annotations", removed);
        }
        removed > 0
    }
}
