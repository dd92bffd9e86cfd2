//! Configuration type definitions.

use super::enums::{ColorSpec, UndoStrategy};
use serde::{Deserialize, Serialize};

/// Drawing-related settings.
///
/// Controls the tool style a session starts with. Scripts and hosts can change
/// these values at runtime.
#[derive(Debug, Serialize, Deserialize)]
pub struct DrawingConfig {
    /// Default color - either a named color (red, green, blue, yellow, orange, pink, white, black, gray)
    /// or an RGB array like `[255, 0, 0]` for red
    #[serde(default = "default_color")]
    pub default_color: ColorSpec,

    /// Default stroke width in pixels (valid range: 1 - 20)
    /// Also sets the blur block size (twice the width, at least 8) and text size (five times the width)
    #[serde(default = "default_stroke_width")]
    pub default_stroke_width: u32,

    /// Font family name for text annotations (e.g., "Sans", "Monospace", "JetBrains Mono")
    #[serde(default = "default_font_family")]
    pub font_family: String,

    /// Font weight (e.g., "normal", "bold", "light", 400, 700)
    /// Can be a named weight or a numeric value (100-900)
    #[serde(default = "default_font_weight")]
    pub font_weight: String,

    /// Font style (e.g., "normal", "italic", "oblique")
    #[serde(default = "default_font_style")]
    pub font_style: String,
}

impl Default for DrawingConfig {
    fn default() -> Self {
        Self {
            default_color: default_color(),
            default_stroke_width: default_stroke_width(),
            font_family: default_font_family(),
            font_weight: default_font_weight(),
            font_style: default_font_style(),
        }
    }
}

/// Arrow drawing settings.
#[derive(Debug, Serialize, Deserialize)]
pub struct ArrowConfig {
    /// Arrowhead length in pixels (valid range: 5.0 - 50.0)
    #[serde(default = "default_arrow_length")]
    pub length: f64,

    /// Arrowhead angle in degrees (valid range: 15.0 - 60.0)
    /// Smaller angles create narrower arrowheads, larger angles create wider ones
    #[serde(default = "default_arrow_angle")]
    pub angle_degrees: f64,
}

impl Default for ArrowConfig {
    fn default() -> Self {
        Self {
            length: default_arrow_length(),
            angle_degrees: default_arrow_angle(),
        }
    }
}

/// Undo/redo behavior.
#[derive(Debug, Serialize, Deserialize)]
pub struct HistoryConfig {
    /// How a blur is undone: "restore" writes back the captured pixels,
    /// "replay" recomposites everything
    #[serde(default)]
    pub undo_strategy: UndoStrategy,

    /// Maximum number of annotations kept per image (0 = unlimited)
    #[serde(default = "default_max_annotations")]
    pub max_annotations: usize,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            undo_strategy: UndoStrategy::default(),
            max_annotations: default_max_annotations(),
        }
    }
}

/// Where and how annotated images are saved when no explicit path is given.
#[derive(Debug, Serialize, Deserialize)]
pub struct ExportConfig {
    /// Directory for saved images; `~` expands to the home directory
    #[serde(default = "default_save_directory")]
    pub save_directory: String,

    /// Filename template, expanded with chrono format specifiers (e.g. `%Y-%m-%d`)
    #[serde(default = "default_filename_template")]
    pub filename_template: String,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            save_directory: default_save_directory(),
            filename_template: default_filename_template(),
        }
    }
}

// =============================================================================
// Default value functions
// =============================================================================

fn default_color() -> ColorSpec {
    ColorSpec::Name("red".to_string())
}

fn default_stroke_width() -> u32 {
    3
}

fn default_font_family() -> String {
    "Sans".to_string()
}

fn default_font_weight() -> String {
    "normal".to_string()
}

fn default_font_style() -> String {
    "normal".to_string()
}

fn default_arrow_length() -> f64 {
    15.0
}

fn default_arrow_angle() -> f64 {
    30.0
}

fn default_max_annotations() -> usize {
    0
}

fn default_save_directory() -> String {
    "~/Pictures/Screenshots".to_string()
}

fn default_filename_template() -> String {
    "markshot_%Y-%m-%d_%H%M%S".to_string()
}
