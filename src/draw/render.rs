//! Cairo-based rendering functions for annotation shapes.
//!
//! Every function takes its style explicitly; nothing relies on state left on
//! the context by a previous call.

use super::annotation::{Annotation, ArrowHead};
use super::color::{Color, GRAY, HIGHLIGHT_ALPHA};
use super::font::FontDescriptor;
use crate::util::{self, Point, Rect};

/// Dash pattern for the blur preview border.
const PREVIEW_DASH: [f64; 2] = [6.0, 4.0];

/// Renders a vector annotation to a Cairo context.
///
/// Blur annotations replace pixels rather than draw over them and are applied
/// by the compositor; they are ignored here.
pub fn render_annotation(ctx: &cairo::Context, annotation: &Annotation) {
    match annotation {
        Annotation::Arrow {
            start,
            end,
            style,
            head,
        } => render_arrow(ctx, *start, *end, style.color, style.line_width(), *head),
        Annotation::Rectangle { start, end, style } => {
            render_rectangle(ctx, *start, *end, style.color, style.line_width())
        }
        Annotation::Ellipse { start, end, style } => {
            render_ellipse(ctx, *start, *end, style.color, style.line_width())
        }
        Annotation::Highlight { start, end, style } => {
            render_highlight(ctx, *start, *end, style.color)
        }
        Annotation::Text {
            anchor,
            text,
            style,
            font,
        } => render_text(ctx, *anchor, text, style.color, style.text_size(), font),
        Annotation::Blur { .. } => {}
    }
}

/// Sets color, width, and round cap/join for a stroke.
fn apply_stroke_style(ctx: &cairo::Context, color: Color, width: f64) {
    color.apply(ctx);
    ctx.set_line_width(width);
    ctx.set_line_cap(cairo::LineCap::Round);
    ctx.set_line_join(cairo::LineJoin::Round);
    ctx.set_dash(&[], 0.0);
}

/// Normalized `(x, y, w, h)` for a rectangle dragged in any direction.
fn normalized(start: Point, end: Point) -> (f64, f64, f64, f64) {
    (
        start.x.min(end.x),
        start.y.min(end.y),
        (end.x - start.x).abs(),
        (end.y - start.y).abs(),
    )
}

/// Render an arrow: shaft from `start` to `end` and an open head at `end`.
pub fn render_arrow(
    ctx: &cairo::Context,
    start: Point,
    end: Point,
    color: Color,
    width: f64,
    head: ArrowHead,
) {
    apply_stroke_style(ctx, color, width);

    ctx.move_to(start.x, start.y);
    ctx.line_to(end.x, end.y);

    let [left, right] = util::calculate_arrowhead(end, start, head.length, head.angle_degrees);
    ctx.move_to(end.x, end.y);
    ctx.line_to(left.x, left.y);
    ctx.move_to(end.x, end.y);
    ctx.line_to(right.x, right.y);

    let _ = ctx.stroke();
}

/// Render a rectangle outline.
pub fn render_rectangle(ctx: &cairo::Context, start: Point, end: Point, color: Color, width: f64) {
    apply_stroke_style(ctx, color, width);

    let (x, y, w, h) = normalized(start, end);
    ctx.rectangle(x, y, w, h);
    let _ = ctx.stroke();
}

/// Render a circle centered at `center` passing through `edge`.
pub fn render_ellipse(ctx: &cairo::Context, center: Point, edge: Point, color: Color, width: f64) {
    let radius = center.distance_to(edge);
    if radius <= 0.0 {
        return;
    }

    apply_stroke_style(ctx, color, width);

    ctx.new_sub_path();
    ctx.arc(center.x, center.y, radius, 0.0, 2.0 * std::f64::consts::PI);
    let _ = ctx.stroke();
}

/// Render a translucent filled rectangle in a quarter-opacity variant of `color`.
pub fn render_highlight(ctx: &cairo::Context, start: Point, end: Point, color: Color) {
    color.with_alpha(HIGHLIGHT_ALPHA).apply(ctx);

    let (x, y, w, h) = normalized(start, end);
    ctx.rectangle(x, y, w, h);
    let _ = ctx.fill();
}

/// Renders one line of text with its baseline starting at `anchor`.
///
/// No wrapping, clipping or background is applied.
pub fn render_text(
    ctx: &cairo::Context,
    anchor: Point,
    text: &str,
    color: Color,
    size: f64,
    font: &FontDescriptor,
) {
    if text.is_empty() {
        return;
    }

    // Save context state to prevent settings from leaking to other drawing operations
    ctx.save().ok();

    let layout = pangocairo::functions::create_layout(ctx);
    layout.set_font_description(Some(&font.to_pango(size)));
    layout.set_text(text);

    // Pango positions layouts by their top-left corner; shift up by the baseline
    let baseline = layout.baseline() as f64 / pango::SCALE as f64;

    color.apply(ctx);
    ctx.move_to(anchor.x, anchor.y - baseline);
    pangocairo::functions::show_layout(ctx, &layout);

    ctx.restore().ok();
}

/// Renders the live preview of a blur drag: a translucent gray box with a
/// dashed border. The real pixelation only runs on commit.
pub fn render_blur_preview(ctx: &cairo::Context, start: Point, end: Point) {
    let (x, y, w, h) = normalized(start, end);

    ctx.save().ok();

    GRAY.with_alpha(0.3).apply(ctx);
    ctx.rectangle(x, y, w, h);
    let _ = ctx.fill();

    GRAY.with_alpha(0.9).apply(ctx);
    ctx.set_line_width(1.0);
    ctx.set_dash(&PREVIEW_DASH, 0.0);
    ctx.rectangle(x, y, w, h);
    let _ = ctx.stroke();

    ctx.restore().ok();
}

/// Marks a region whose pixels could not be processed with a flat
/// translucent overlay.
pub fn render_fallback_overlay(ctx: &cairo::Context, rect: Rect) {
    GRAY.with_alpha(0.6).apply(ctx);
    ctx.rectangle(
        rect.x as f64,
        rect.y as f64,
        rect.width as f64,
        rect.height as f64,
    );
    let _ = ctx.fill();
}
