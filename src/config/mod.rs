//! Configuration file support for markshot.
//!
//! This module handles loading and validating user settings from the configuration file
//! located at `~/.config/markshot/config.toml`. Settings include drawing defaults,
//! arrow appearance, undo behavior, and where exported images go.
//!
//! If no config file exists, sensible defaults are used automatically.

pub mod enums;
pub mod types;

// Re-export commonly used types at module level
pub use enums::{ColorSpec, UndoStrategy};
pub use types::{ArrowConfig, DrawingConfig, ExportConfig, HistoryConfig};

use crate::draw::{ArrowHead, FontDescriptor};
use anyhow::{Context, Result};
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Main configuration structure containing all user settings.
///
/// This is the root configuration type that gets deserialized from the TOML file.
/// All fields have sensible defaults and will use those if not specified in the config file.
///
/// # Example TOML
/// ```toml
/// [drawing]
/// default_color = "red"
/// default_stroke_width = 3
///
/// [arrow]
/// length = 20.0
/// angle_degrees = 30.0
///
/// [history]
/// undo_strategy = "restore"
///
/// [export]
/// save_directory = "~/Pictures/Screenshots"
/// ```
#[derive(Debug, Serialize, Deserialize, Default)]
pub struct Config {
    /// Tool style defaults (color, stroke width, font)
    #[serde(default)]
    pub drawing: DrawingConfig,

    /// Arrowhead geometry
    #[serde(default)]
    pub arrow: ArrowConfig,

    /// Undo behavior and annotation limit
    #[serde(default)]
    pub history: HistoryConfig,

    /// Default save location
    #[serde(default)]
    pub export: ExportConfig,
}

impl Config {
    /// Validates and clamps all configuration values to acceptable ranges.
    ///
    /// Invalid values are clamped to the nearest valid value and a warning is logged.
    ///
    /// Validated ranges:
    /// - `default_stroke_width`: 1 - 20
    /// - `arrow.length`: 5.0 - 50.0
    /// - `arrow.angle_degrees`: 15.0 - 60.0
    pub fn validate_and_clamp(&mut self) {
        if !(1..=20).contains(&self.drawing.default_stroke_width) {
            warn!(
                "Invalid default_stroke_width {}, clamping to 1-20 range",
                self.drawing.default_stroke_width
            );
            self.drawing.default_stroke_width = self.drawing.default_stroke_width.clamp(1, 20);
        }

        // NaN fails the range check and clamps to NaN, so replace it outright
        if !(5.0..=50.0).contains(&self.arrow.length) {
            warn!(
                "Invalid arrow length {:.1}, clamping to 5.0-50.0 range",
                self.arrow.length
            );
            self.arrow.length = if self.arrow.length.is_nan() {
                15.0
            } else {
                self.arrow.length.clamp(5.0, 50.0)
            };
        }

        if !(15.0..=60.0).contains(&self.arrow.angle_degrees) {
            warn!(
                "Invalid arrow angle {:.1}°, clamping to 15.0-60.0° range",
                self.arrow.angle_degrees
            );
            self.arrow.angle_degrees = if self.arrow.angle_degrees.is_nan() {
                30.0
            } else {
                self.arrow.angle_degrees.clamp(15.0, 60.0)
            };
        }

        let valid_weight = matches!(
            self.drawing.font_weight.to_lowercase().as_str(),
            "normal" | "bold" | "light" | "ultralight" | "heavy" | "ultrabold"
        ) || self
            .drawing
            .font_weight
            .parse::<u32>()
            .is_ok_and(|w| (100..=900).contains(&w));

        if !valid_weight {
            warn!(
                "Invalid font_weight '{}', falling back to 'normal'",
                self.drawing.font_weight
            );
            self.drawing.font_weight = "normal".to_string();
        }

        if !matches!(
            self.drawing.font_style.to_lowercase().as_str(),
            "normal" | "italic" | "oblique"
        ) {
            warn!(
                "Invalid font_style '{}', falling back to 'normal'",
                self.drawing.font_style
            );
            self.drawing.font_style = "normal".to_string();
        }

        if self.export.filename_template.trim().is_empty() {
            warn!("Empty export filename_template, using default");
            self.export.filename_template = ExportConfig::default().filename_template;
        } else if !crate::export::is_valid_template(&self.export.filename_template) {
            warn!(
                "Invalid export filename_template '{}', using default",
                self.export.filename_template
            );
            self.export.filename_template = ExportConfig::default().filename_template;
        }
    }

    /// Returns the path to the configuration file.
    ///
    /// The config file is located at `~/.config/markshot/config.toml`.
    ///
    /// # Errors
    /// Returns an error if the config directory cannot be determined (e.g., HOME not set).
    pub fn get_config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .context("Could not find config directory")?
            .join("markshot");

        Ok(config_dir.join("config.toml"))
    }

    /// Loads configuration from the default location, or returns defaults if not found.
    ///
    /// # Errors
    /// Returns an error if the config directory cannot be determined, or the
    /// file exists but cannot be read or parsed.
    pub fn load() -> Result<Self> {
        let config_path = Self::get_config_path()?;

        if !config_path.exists() {
            info!("Config file not found, using defaults");
            debug!("Expected config at: {}", config_path.display());
            return Ok(Self::default());
        }

        Self::load_from(&config_path)
    }

    /// Loads and validates configuration from an explicit file.
    pub fn load_from(path: &Path) -> Result<Self> {
        let config_str = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config from {}", path.display()))?;

        let mut config = Self::from_toml(&config_str)
            .with_context(|| format!("Failed to parse config from {}", path.display()))?;
        config.validate_and_clamp();

        info!("Loaded config from {}", path.display());
        debug!("Config: {:?}", config);

        Ok(config)
    }

    fn from_toml(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }

    /// Arrowhead geometry for new arrows.
    pub fn arrow_head(&self) -> ArrowHead {
        ArrowHead {
            length: self.arrow.length,
            angle_degrees: self.arrow.angle_degrees,
        }
    }

    /// Font used for new text annotations.
    pub fn font(&self) -> FontDescriptor {
        FontDescriptor::new(
            self.drawing.font_family.clone(),
            self.drawing.font_weight.clone(),
            self.drawing.font_style.clone(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::draw::RED;

    #[test]
    fn empty_file_uses_defaults() {
        let config = Config::from_toml("").unwrap();
        assert_eq!(config.drawing.default_color.to_color(), RED);
        assert_eq!(config.drawing.default_stroke_width, 3);
        assert_eq!(config.arrow_head(), ArrowHead::default());
        assert_eq!(config.history.undo_strategy, UndoStrategy::Restore);
        assert_eq!(config.font(), FontDescriptor::default());
    }

    #[test]
    fn out_of_range_values_are_clamped() {
        let mut config = Config::from_toml(
            r#"
            [drawing]
            default_stroke_width = 99
            font_weight = "chunky"

            [arrow]
            length = 2.0
            angle_degrees = 80.0
            "#,
        )
        .unwrap();
        config.validate_and_clamp();

        assert_eq!(config.drawing.default_stroke_width, 20);
        assert_eq!(config.drawing.font_weight, "normal");
        assert_eq!(config.arrow.length, 5.0);
        assert_eq!(config.arrow.angle_degrees, 60.0);
    }

    #[test]
    fn invalid_filename_template_falls_back_to_default() {
        let mut config = Config::from_toml(
            r#"
            [export]
            filename_template = "shot_%Q"
            "#,
        )
        .unwrap();
        config.validate_and_clamp();

        assert_eq!(
            config.export.filename_template,
            ExportConfig::default().filename_template
        );
        assert!(crate::export::generate_filename(&config.export.filename_template).is_ok());
    }

    #[test]
    fn undo_strategy_and_rgb_color_parse() {
        let config = Config::from_toml(
            r#"
            [drawing]
            default_color = [0, 0, 255]

            [history]
            undo_strategy = "replay"
            max_annotations = 50
            "#,
        )
        .unwrap();
        assert_eq!(config.drawing.default_color, ColorSpec::Rgb([0, 0, 255]));
        assert_eq!(config.history.undo_strategy, UndoStrategy::Replay);
        assert_eq!(config.history.max_annotations, 50);
    }

    #[test]
    fn load_from_reports_the_path_on_parse_errors() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[history]\nundo_strategy = \"rebase\"\n").unwrap();

        let err = Config::load_from(&path).unwrap_err();
        assert!(format!("{err:#}").contains("config.toml"));
    }
}
