use crate::draw::render::{render_annotation, render_blur_preview};
use crate::draw::Annotation;
use crate::input::tool::Tool;

use super::{DrawingState, Session};

impl Session {
    /// Returns the annotation the current drag would commit, for previews.
    ///
    /// `None` while idle, and for blur drags, whose preview is a placeholder
    /// box rather than the final mosaic.
    pub fn provisional_annotation(&self) -> Option<Annotation> {
        let DrawingState::Dragging {
            tool,
            start,
            current,
        } = self.state
        else {
            return None;
        };
        if tool == Tool::Blur {
            return None;
        }
        Annotation::from_drag(tool, start, current, self.style(), self.arrow_head)
    }

    /// Recomposites the committed state and draws the drag preview on top.
    pub(super) fn render_preview(&mut self) {
        let DrawingState::Dragging {
            tool,
            start,
            current,
        } = self.state
        else {
            return;
        };

        let provisional = self.provisional_annotation();
        self.engine.draw_preview(|ctx| match (tool, &provisional) {
            (Tool::Blur, _) => render_blur_preview(ctx, start, current),
            (_, Some(annotation)) => render_annotation(ctx, annotation),
            (_, None) => {}
        });
    }
}
