//! Utility functions for geometry, arrowheads, and color names.
//!
//! This module provides:
//! - [`Point`] and [`Rect`] in surface coordinates, with clamping to surface bounds
//! - Drag thresholds used to reject accidental clicks
//! - Arrowhead geometry calculations
//! - Display-to-surface coordinate scaling

use crate::draw::{Color, color::*};

/// Minimum displacement (in either axis) for a drag to commit an annotation.
pub const MIN_DRAG_DISTANCE: f64 = 1.0;

/// Minimum displacement (in either axis) for a coarse area selection such as a crop.
pub const MIN_SELECTION_DRAG: f64 = 10.0;

// ============================================================================
// Points
// ============================================================================

/// A position in surface pixel coordinates.
///
/// Coordinates are floating point and un-clamped: they may be negative or lie
/// beyond the surface edge while a drag leaves the canvas.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to another point.
    pub fn distance_to(self, other: Point) -> f64 {
        (other.x - self.x).hypot(other.y - self.y)
    }
}

/// Returns true when a drag moved less than `threshold` pixels on both axes.
pub fn is_degenerate_drag(start: Point, end: Point, threshold: f64) -> bool {
    (end.x - start.x).abs() < threshold && (end.y - start.y).abs() < threshold
}

/// Maps a position on the displayed element to surface coordinates.
///
/// The displayed element may be scaled relative to the raster (CSS-style
/// scaling, HiDPI), so each axis is multiplied by `surface / display`.
/// A zero-sized display leaves the coordinate unscaled.
pub fn display_to_surface(
    x: f64,
    y: f64,
    display_width: f64,
    display_height: f64,
    surface_width: i32,
    surface_height: i32,
) -> Point {
    let scale_x = if display_width > 0.0 {
        surface_width as f64 / display_width
    } else {
        1.0
    };
    let scale_y = if display_height > 0.0 {
        surface_height as f64 / display_height
    } else {
        1.0
    };
    Point::new(x * scale_x, y * scale_y)
}

// ============================================================================
// Arrowhead Geometry
// ============================================================================

/// Calculates the two arrowhead barb endpoints for an arrow ending at `tip`.
///
/// Each barb leaves the tip at `angle_degrees` either side of the shaft,
/// pointing back towards `tail`, and is `length` pixels long.
///
/// # Returns
/// Array of two points `[left, right]`. If the shaft is shorter than one
/// pixel, both points equal the tip.
pub fn calculate_arrowhead(tip: Point, tail: Point, length: f64, angle_degrees: f64) -> [Point; 2] {
    let dx = tip.x - tail.x;
    let dy = tip.y - tail.y;

    if dx.hypot(dy) < 1.0 {
        return [tip, tip];
    }

    let shaft = dy.atan2(dx);
    let spread = angle_degrees.to_radians();

    let left = Point::new(
        tip.x - length * (shaft - spread).cos(),
        tip.y - length * (shaft - spread).sin(),
    );
    let right = Point::new(
        tip.x - length * (shaft + spread).cos(),
        tip.y - length * (shaft + spread).sin(),
    );

    [left, right]
}

// ============================================================================
// Color Mapping
// ============================================================================

/// Maps color name strings to Color values.
///
/// Used by the configuration system and annotation scripts.
///
/// # Supported Names (case-insensitive)
/// - "red", "green", "blue", "yellow", "orange", "pink", "white", "black", "gray"
pub fn name_to_color(name: &str) -> Option<Color> {
    match name.to_lowercase().as_str() {
        "red" => Some(RED),
        "green" => Some(GREEN),
        "blue" => Some(BLUE),
        "yellow" => Some(YELLOW),
        "orange" => Some(ORANGE),
        "pink" => Some(PINK),
        "white" => Some(WHITE),
        "black" => Some(BLACK),
        "gray" | "grey" => Some(GRAY),
        _ => None,
    }
}

// ============================================================================
// Rectangles
// ============================================================================

/// Axis-aligned integer rectangle in surface pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Rect {
    /// Creates a new rectangle. Width/height must be positive.
    pub fn new(x: i32, y: i32, width: i32, height: i32) -> Option<Self> {
        if width <= 0 || height <= 0 {
            None
        } else {
            Some(Self {
                x,
                y,
                width,
                height,
            })
        }
    }

    /// Builds a rectangle from min/max bounds (inclusive min, exclusive max).
    pub fn from_min_max(min_x: i32, min_y: i32, max_x: i32, max_y: i32) -> Option<Self> {
        let width = max_x.saturating_sub(min_x);
        let height = max_y.saturating_sub(min_y);
        Self::new(min_x, min_y, width, height)
    }

    /// Builds the pixel rectangle spanned by two drag corners, in any order.
    ///
    /// Fractional corners are widened to whole pixels (floor of the minimum,
    /// ceiling of the maximum). Returns `None` for zero-area spans.
    pub fn from_corners(a: Point, b: Point) -> Option<Self> {
        let min_x = a.x.min(b.x).floor() as i32;
        let min_y = a.y.min(b.y).floor() as i32;
        let max_x = a.x.max(b.x).ceil() as i32;
        let max_y = a.y.max(b.y).ceil() as i32;
        Self::from_min_max(min_x, min_y, max_x, max_y)
    }

    /// Clamps the rectangle to `[0, width) x [0, height)`.
    ///
    /// Returns `None` when nothing of the rectangle remains on the surface.
    pub fn clamp_to_bounds(self, width: i32, height: i32) -> Option<Rect> {
        let min_x = self.x.clamp(0, width.max(0));
        let min_y = self.y.clamp(0, height.max(0));
        let max_x = self.right().clamp(0, width.max(0));
        let max_y = self.bottom().clamp(0, height.max(0));
        Self::from_min_max(min_x, min_y, max_x, max_y)
    }

    /// Exclusive right edge.
    pub fn right(&self) -> i32 {
        self.x.saturating_add(self.width)
    }

    /// Exclusive bottom edge.
    pub fn bottom(&self) -> i32 {
        self.y.saturating_add(self.height)
    }

    /// Number of pixels covered.
    pub fn area(&self) -> usize {
        self.width.max(0) as usize * self.height.max(0) as usize
    }

    pub fn contains(&self, x: i32, y: i32) -> bool {
        x >= self.x && x < self.right() && y >= self.y && y < self.bottom()
    }

    /// Returns true if rectangle has a positive area.
    pub fn is_valid(&self) -> bool {
        self.width > 0 && self.height > 0
    }
}
