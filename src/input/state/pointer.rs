use crate::draw::Annotation;
use crate::input::tool::Tool;
use crate::util::Point;
use log::debug;

use super::{DrawingState, Session};

/// What a pointer-down asked of the host.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerResponse {
    /// Nothing happened (a drag was already in progress)
    Ignored,
    /// A drag started at the pointer position
    DragStarted,
    /// The text tool wants a line of text for this anchor; answer with
    /// [`Session::confirm_text_at`]
    TextRequested(Point),
}

impl Session {
    /// Processes a pointer press at surface coordinates.
    ///
    /// # Behavior
    /// - Text tool: stays Idle and asks the host for text at the press point
    /// - Any other tool while Idle: starts a drag with that tool
    /// - While already dragging: ignored
    pub fn pointer_down(&mut self, x: f64, y: f64) -> PointerResponse {
        if !matches!(self.state, DrawingState::Idle) {
            return PointerResponse::Ignored;
        }

        let point = Point::new(x, y);
        if !self.current_tool.is_drag() {
            debug!("Text requested at ({:.1}, {:.1})", x, y);
            return PointerResponse::TextRequested(point);
        }

        self.state = DrawingState::Dragging {
            tool: self.current_tool,
            start: point,
            current: point,
        };
        PointerResponse::DragStarted
    }

    /// Processes pointer motion: while dragging, redraws the live preview.
    pub fn pointer_move(&mut self, x: f64, y: f64) {
        if let DrawingState::Dragging { current, .. } = &mut self.state {
            *current = Point::new(x, y);
            self.render_preview();
        }
    }

    /// Processes a pointer release: commits the drag from its start to `(x, y)`.
    ///
    /// Returns `true` if an annotation was committed.
    pub fn pointer_up(&mut self, x: f64, y: f64) -> bool {
        let DrawingState::Dragging { tool, start, .. } = self.state else {
            return false;
        };
        self.state = DrawingState::Idle;
        self.commit_drag(tool, start, Point::new(x, y))
    }

    /// The pointer left the surface: a drag in progress is committed at its
    /// last known position.
    pub fn pointer_leave(&mut self) -> bool {
        match self.state {
            DrawingState::Dragging { current, .. } => self.pointer_up(current.x, current.y),
            DrawingState::Idle => false,
        }
    }

    /// Abandons a drag in progress without committing and clears its preview.
    pub fn cancel(&mut self) {
        if matches!(self.state, DrawingState::Dragging { .. }) {
            debug!("Drag cancelled");
            self.state = DrawingState::Idle;
            self.engine.recomposite();
        }
    }

    fn commit_drag(&mut self, tool: Tool, start: Point, end: Point) -> bool {
        match Annotation::from_drag(tool, start, end, self.style(), self.arrow_head) {
            Some(annotation) => self.engine.commit(annotation),
            None => {
                self.engine.discard_preview();
                false
            }
        }
    }
}
