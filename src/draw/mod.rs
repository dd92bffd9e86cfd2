//! Rendering primitives and annotation definitions (Cairo-based).
//!
//! This module defines the core drawing types used for screenshot annotation:
//! - [`RasterSurface`]: the pixel buffer everything is composited into
//! - [`BaseImage`]: the immutable screenshot under the annotations
//! - [`Annotation`]: one committed arrow, rectangle, ellipse, highlight, blur or text
//! - [`AnnotationStore`]: committed annotations in replay order
//! - Shape rendering functions and the mosaic filter used by blur

pub mod annotation;
pub mod color;
pub mod font;
pub mod image;
pub mod pixelate;
pub mod render;
pub mod store;
pub mod surface;

// Re-export commonly used types at module level
pub use annotation::{Annotation, ArrowHead, Style, sanitize_text};
pub use color::Color;
pub use font::FontDescriptor;
pub use image::{BaseImage, ImageError};
pub use render::render_annotation;
pub use store::AnnotationStore;
pub use surface::{PixelBlock, RasterSurface, SurfaceError};

pub use color::{BLACK, BLUE, GRAY, GREEN, ORANGE, PINK, RED, WHITE, YELLOW};
