//! Annotation definitions: one committed drawing operation per variant.

use super::color::Color;
use super::font::FontDescriptor;
use super::surface::PixelBlock;
use crate::input::Tool;
use crate::util::{self, Point, Rect};

/// Arrowhead geometry shared by every arrow drawn with the same settings.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ArrowHead {
    /// Barb length in pixels
    pub length: f64,
    /// Angle between each barb and the shaft, in degrees
    pub angle_degrees: f64,
}

impl Default for ArrowHead {
    fn default() -> Self {
        Self {
            length: 15.0,
            angle_degrees: 30.0,
        }
    }
}

/// Color and stroke width an annotation was committed with.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Style {
    pub color: Color,
    /// Line width in pixels; also drives blur block size and text size
    pub stroke_width: u32,
}

impl Style {
    pub fn new(color: Color, stroke_width: u32) -> Self {
        Self {
            color,
            stroke_width: stroke_width.max(1),
        }
    }

    pub fn line_width(&self) -> f64 {
        self.stroke_width.max(1) as f64
    }

    /// Font size for text annotations: five times the stroke width.
    pub fn text_size(&self) -> f64 {
        self.line_width() * 5.0
    }
}

/// Represents one committed annotation.
///
/// Coordinates are stored exactly as the gesture produced them (possibly
/// negative or past the surface edge); normalization happens when drawing.
#[derive(Clone, Debug)]
pub enum Annotation {
    /// Straight shaft from `start` to `end` with an open head at `end`
    Arrow {
        start: Point,
        end: Point,
        style: Style,
        head: ArrowHead,
    },
    /// Rectangle outline with corners at `start` and `end`
    Rectangle { start: Point, end: Point, style: Style },
    /// Circle centered at `start` passing through `end`
    Ellipse { start: Point, end: Point, style: Style },
    /// Translucent filled rectangle with corners at `start` and `end`
    Highlight { start: Point, end: Point, style: Style },
    /// Mosaic over the rectangle spanned by `start` and `end`
    Blur {
        start: Point,
        end: Point,
        style: Style,
        /// Pixels under the clamped rectangle captured before pixelation.
        ///
        /// Filled in by the engine at commit time. `None` once stored means
        /// the capture failed and the blur is shown as a flat overlay.
        snapshot: Option<PixelBlock>,
    },
    /// Single line of text with its baseline starting at `anchor`
    Text {
        anchor: Point,
        text: String,
        style: Style,
        font: FontDescriptor,
    },
}

impl Annotation {
    /// Builds the annotation a drag with `tool` from `start` to `end` commits.
    ///
    /// Returns `None` for the text tool, which is placed by click instead.
    pub fn from_drag(
        tool: Tool,
        start: Point,
        end: Point,
        style: Style,
        head: ArrowHead,
    ) -> Option<Self> {
        match tool {
            Tool::Arrow => Some(Annotation::Arrow {
                start,
                end,
                style,
                head,
            }),
            Tool::Rectangle => Some(Annotation::Rectangle { start, end, style }),
            Tool::Ellipse => Some(Annotation::Ellipse { start, end, style }),
            Tool::Highlight => Some(Annotation::Highlight { start, end, style }),
            Tool::Blur => Some(Annotation::Blur {
                start,
                end,
                style,
                snapshot: None,
            }),
            Tool::Text => None,
        }
    }

    /// Builds a text annotation from untrusted input.
    ///
    /// Returns `None` when nothing printable survives sanitization.
    pub fn text(anchor: Point, raw: &str, style: Style, font: FontDescriptor) -> Option<Self> {
        let text = sanitize_text(raw);
        if text.is_empty() {
            return None;
        }
        Some(Annotation::Text {
            anchor,
            text,
            style,
            font,
        })
    }

    pub fn tool(&self) -> Tool {
        match self {
            Annotation::Arrow { .. } => Tool::Arrow,
            Annotation::Rectangle { .. } => Tool::Rectangle,
            Annotation::Ellipse { .. } => Tool::Ellipse,
            Annotation::Highlight { .. } => Tool::Highlight,
            Annotation::Blur { .. } => Tool::Blur,
            Annotation::Text { .. } => Tool::Text,
        }
    }

    pub fn style(&self) -> Style {
        match self {
            Annotation::Arrow { style, .. }
            | Annotation::Rectangle { style, .. }
            | Annotation::Ellipse { style, .. }
            | Annotation::Highlight { style, .. }
            | Annotation::Blur { style, .. }
            | Annotation::Text { style, .. } => *style,
        }
    }

    /// True for annotations that overwrite pixels rather than draw over them.
    pub fn is_destructive(&self) -> bool {
        self.tool().is_destructive()
    }

    /// The drag corners, for annotations created by dragging.
    pub fn corners(&self) -> Option<(Point, Point)> {
        match self {
            Annotation::Arrow { start, end, .. }
            | Annotation::Rectangle { start, end, .. }
            | Annotation::Ellipse { start, end, .. }
            | Annotation::Highlight { start, end, .. }
            | Annotation::Blur { start, end, .. } => Some((*start, *end)),
            Annotation::Text { .. } => None,
        }
    }

    /// On-surface rectangle for area annotations (rectangle, highlight, blur).
    ///
    /// `None` for other variants, and for area annotations whose rectangle has
    /// no area once clamped to a `width x height` surface.
    pub fn area_rect(&self, width: i32, height: i32) -> Option<Rect> {
        match self {
            Annotation::Rectangle { start, end, .. }
            | Annotation::Highlight { start, end, .. }
            | Annotation::Blur { start, end, .. } => {
                Rect::from_corners(*start, *end)?.clamp_to_bounds(width, height)
            }
            _ => None,
        }
    }

    /// Whether committing this annotation on a `width x height` surface would
    /// produce a visible result.
    ///
    /// Drags that moved less than a pixel on both axes are accidental clicks.
    /// Area annotations additionally need a non-empty clamped rectangle, and
    /// text must already be free of markup.
    pub fn is_committable(&self, width: i32, height: i32) -> bool {
        match self {
            Annotation::Text { text, .. } => !text.is_empty() && sanitize_text(text) == *text,
            Annotation::Arrow { start, end, .. } | Annotation::Ellipse { start, end, .. } => {
                !util::is_degenerate_drag(*start, *end, util::MIN_DRAG_DISTANCE)
            }
            Annotation::Rectangle { start, end, .. }
            | Annotation::Highlight { start, end, .. }
            | Annotation::Blur { start, end, .. } => {
                !util::is_degenerate_drag(*start, *end, util::MIN_DRAG_DISTANCE)
                    && self.area_rect(width, height).is_some()
            }
        }
    }
}

/// Strips markup from user-entered text.
///
/// Tags (`<` followed by a letter, `/`, `!` or `?`, up to the next `>`) are
/// removed along with any stray angle brackets. Control characters become
/// spaces and whitespace runs collapse to a single space.
pub fn sanitize_text(raw: &str) -> String {
    let mut cleaned = String::with_capacity(raw.len());
    let mut chars = raw.chars().peekable();

    while let Some(ch) = chars.next() {
        match ch {
            '<' => {
                let opens_tag = chars
                    .peek()
                    .is_some_and(|next| next.is_ascii_alphabetic() || matches!(next, '/' | '!' | '?'));
                if opens_tag {
                    for inner in chars.by_ref() {
                        if inner == '>' {
                            break;
                        }
                    }
                }
                cleaned.push(' ');
            }
            '>' => cleaned.push(' '),
            c if c.is_control() => cleaned.push(' '),
            c => cleaned.push(c),
        }
    }

    cleaned.split_whitespace().collect::<Vec<_>>().join(" ")
}
