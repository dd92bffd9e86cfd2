//! Drawing tool selection.

use serde::Deserialize;

/// Drawing tool selection.
///
/// The active tool determines what annotation a pointer gesture creates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tool {
    /// Straight line with an open arrowhead at the release point
    Arrow,
    /// Rectangle outline from corner to corner
    #[serde(alias = "rect")]
    Rectangle,
    /// Circle from center outward
    #[serde(alias = "circle")]
    Ellipse,
    /// Translucent filled rectangle
    Highlight,
    /// Mosaic over a rectangle; overwrites pixels
    #[serde(alias = "pixelate")]
    Blur,
    /// Click to place a line of text
    Text,
}

impl Tool {
    /// True for tools whose commit mutates pixels in place.
    pub fn is_destructive(self) -> bool {
        matches!(self, Tool::Blur)
    }

    /// True for tools driven by a drag rather than a single click.
    pub fn is_drag(self) -> bool {
        !matches!(self, Tool::Text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_text_is_placed_by_click() {
        assert!(!Tool::Text.is_drag());
        for tool in [Tool::Arrow, Tool::Rectangle, Tool::Ellipse, Tool::Highlight, Tool::Blur] {
            assert!(tool.is_drag(), "{tool:?}");
        }
    }
}
