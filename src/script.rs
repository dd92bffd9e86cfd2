//! Annotation scripts: a TOML list of steps replayed against a session.
//!
//! ```toml
//! [[step]]
//! action = "tool"
//! tool = "blur"
//!
//! [[step]]
//! action = "width"
//! width = 4
//!
//! [[step]]
//! action = "drag"
//! from = [0, 0]
//! to = [120, 40]
//!
//! [[step]]
//! action = "text"
//! at = [10, 80]
//! text = "Secret redacted"
//! ```

use crate::config::ColorSpec;
use crate::input::{PointerResponse, Session, Tool};
use anyhow::{Context, Result};
use log::{debug, info};
use serde::Deserialize;
use std::fs;
use std::path::Path;

/// One scripted user action.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "action", rename_all = "kebab-case")]
pub enum Step {
    /// Select the active tool
    Tool { tool: Tool },
    /// Set the color for following annotations
    Color { color: ColorSpec },
    /// Set the stroke width for following annotations
    Width { width: u32 },
    /// Press at `from`, move to `to` and release there
    Drag { from: [f64; 2], to: [f64; 2] },
    /// Place a line of text with its baseline starting at `at`
    Text { at: [f64; 2], text: String },
    Undo,
    Redo,
    Clear,
}

/// Ordered list of steps.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Script {
    #[serde(default, rename = "step")]
    pub steps: Vec<Step>,
}

impl Script {
    /// Reads and parses a script file.
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("Failed to read script from {}", path.display()))?;
        Self::from_toml(&text)
            .with_context(|| format!("Failed to parse script from {}", path.display()))
    }

    pub fn from_toml(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }

    /// Replays every step against `session`, in order.
    ///
    /// Steps that change nothing (degenerate drags, empty text, undo with no
    /// history) are skipped with a debug log. Returns the number of steps that
    /// took effect.
    pub fn apply(&self, session: &mut Session) -> usize {
        let mut applied = 0;
        for (index, step) in self.steps.iter().enumerate() {
            if apply_step(session, step) {
                applied += 1;
            } else {
                debug!("Script step {} had no effect: {:?}", index + 1, step);
            }
        }
        info!("Applied {}/{} script steps", applied, self.steps.len());
        applied
    }
}

fn apply_step(session: &mut Session, step: &Step) -> bool {
    match step {
        Step::Tool { tool } => {
            session.set_active_tool(*tool);
            true
        }
        Step::Color { color } => {
            session.set_color(color.to_color());
            true
        }
        Step::Width { width } => {
            session.set_stroke_width(*width);
            true
        }
        Step::Drag { from, to } => match session.pointer_down(from[0], from[1]) {
            PointerResponse::DragStarted => {
                session.pointer_move(to[0], to[1]);
                session.pointer_up(to[0], to[1])
            }
            PointerResponse::TextRequested(_) | PointerResponse::Ignored => false,
        },
        Step::Text { at, text } => session.confirm_text_at(at[0], at[1], text),
        Step::Undo => session.undo(),
        Step::Redo => session.redo(),
        Step::Clear => session.clear(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::draw::{BaseImage, WHITE};

    const SCRIPT: &str = r#"
        [[step]]
        action = "tool"
        tool = "rect"

        [[step]]
        action = "color"
        color = [0, 0, 255]

        [[step]]
        action = "width"
        width = 2

        [[step]]
        action = "drag"
        from = [10, 10]
        to = [50.5, 50]

        [[step]]
        action = "drag"
        from = [60, 60]
        to = [60, 60]

        [[step]]
        action = "text"
        at = [5, 90]
        text = "note"

        [[step]]
        action = "undo"

        [[step]]
        action = "redo"
    "#;

    #[test]
    fn parses_every_step_kind() {
        let script = Script::from_toml(SCRIPT).unwrap();
        assert_eq!(script.steps.len(), 8);
        assert_eq!(script.steps[0], Step::Tool { tool: Tool::Rectangle });
        assert_eq!(
            script.steps[1],
            Step::Color {
                color: ColorSpec::Rgb([0, 0, 255])
            }
        );
        assert_eq!(
            script.steps[3],
            Step::Drag {
                from: [10.0, 10.0],
                to: [50.5, 50.0]
            }
        );
        assert_eq!(script.steps[7], Step::Redo);
    }

    #[test]
    fn apply_skips_steps_without_effect() {
        let script = Script::from_toml(SCRIPT).unwrap();
        let mut session =
            Session::new(BaseImage::solid(100, 100, WHITE).unwrap(), &Config::default()).unwrap();

        // The zero-length drag is the only step that does nothing
        assert_eq!(script.apply(&mut session), 7);
        assert_eq!(session.annotation_count(), 2);
        assert_eq!(session.surface().pixel(10, 30), Some([0, 0, 255, 255]));
    }

    #[test]
    fn unknown_actions_are_rejected() {
        let err = Script::from_toml("[[step]]\naction = \"rotate\"\n").unwrap_err();
        assert!(format!("{err:#}").contains("rotate"));
    }

    #[test]
    fn empty_script_is_valid() {
        assert!(Script::from_toml("").unwrap().steps.is_empty());
    }
}
