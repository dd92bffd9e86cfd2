//! Annotation engine: compositing and history over one base image.
//!
//! The [`Engine`] exclusively owns the raster surface, the base image and the
//! annotation store. All mutation goes through `&mut self`; a multi-threaded
//! host must serialize calls (e.g. behind a mutex), since the
//! snapshot-then-pixelate sequence of a blur commit must not interleave with
//! other surface writes.

mod compositor;
mod history;

pub use compositor::composite;

use crate::config::UndoStrategy;
use crate::draw::{Annotation, AnnotationStore, BaseImage, RasterSurface, SurfaceError};

/// Surface, base image and committed annotations for one editing session.
#[derive(Debug)]
pub struct Engine {
    surface: RasterSurface,
    base: BaseImage,
    store: AnnotationStore,
    /// Undone annotations, most recent last
    redo_stack: Vec<Annotation>,
    undo_strategy: UndoStrategy,
    /// Maximum number of annotations (0 = unlimited)
    max_annotations: usize,
    /// Whether the surface currently shows an uncommitted preview
    preview_visible: bool,
}

impl Engine {
    /// Creates an engine over `base` and composites it.
    pub fn new(
        base: BaseImage,
        undo_strategy: UndoStrategy,
        max_annotations: usize,
    ) -> Result<Self, SurfaceError> {
        let surface = RasterSurface::new(base.width(), base.height())?;
        let mut engine = Self {
            surface,
            base,
            store: AnnotationStore::new(),
            redo_stack: Vec::new(),
            undo_strategy,
            max_annotations,
            preview_visible: false,
        };
        engine.recomposite();
        Ok(engine)
    }

    /// Replaces the base image, drops all annotations and history, and recomposites.
    ///
    /// The surface is reallocated when the new image has a different size.
    pub fn load_base_image(&mut self, base: BaseImage) -> Result<(), SurfaceError> {
        if base.width() != self.surface.width() || base.height() != self.surface.height() {
            self.surface = RasterSurface::new(base.width(), base.height())?;
        }
        self.base = base;
        self.store.clear();
        self.redo_stack.clear();
        self.recomposite();

        log::info!(
            "Loaded {}x{} base image",
            self.base.width(),
            self.base.height()
        );
        Ok(())
    }

    pub fn surface(&self) -> &RasterSurface {
        &self.surface
    }

    pub fn base(&self) -> &BaseImage {
        &self.base
    }

    /// Committed annotations in replay order.
    pub fn annotations(&self) -> &[Annotation] {
        self.store.as_slice()
    }

    pub fn can_undo(&self) -> bool {
        !self.store.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    pub fn undo_strategy(&self) -> UndoStrategy {
        self.undo_strategy
    }
}
