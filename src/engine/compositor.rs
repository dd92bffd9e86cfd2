//! Compositing: base image plus every committed annotation, in order.

use super::Engine;
use crate::draw::pixelate;
use crate::draw::render::{render_annotation, render_fallback_overlay};
use crate::draw::{Annotation, BaseImage, RasterSurface, SurfaceError};
use log::warn;

/// Renders `base` followed by `annotations`, in order, into `surface`.
///
/// Vector annotations are drawn with the shape renderer; blur annotations
/// re-run the mosaic over their own rectangle (their snapshots are only used
/// by undo). Calling this twice without changes yields identical pixels.
pub fn composite(
    surface: &mut RasterSurface,
    base: &BaseImage,
    annotations: &[Annotation],
) -> Result<(), SurfaceError> {
    surface.clear()?;
    surface.draw_base_image(base)?;
    for annotation in annotations {
        apply_annotation(surface, annotation);
    }
    Ok(())
}

/// Draws one annotation on top of the current surface contents.
pub(crate) fn apply_annotation(surface: &mut RasterSurface, annotation: &Annotation) {
    if annotation.is_destructive() {
        apply_blur(surface, annotation);
        return;
    }

    match surface.context() {
        Ok(ctx) => render_annotation(&ctx, annotation),
        Err(err) => warn!("Skipping {:?} annotation: {}", annotation.tool(), err),
    }
}

fn apply_blur(surface: &mut RasterSurface, annotation: &Annotation) {
    let Annotation::Blur {
        style, snapshot, ..
    } = annotation
    else {
        return;
    };
    let Some(rect) = annotation.area_rect(surface.width(), surface.height()) else {
        return;
    };

    if snapshot.is_some() {
        match pixelate::pixelate(surface, rect, pixelate::block_size(style.stroke_width)) {
            Ok(_) => return,
            Err(err) => warn!("Pixelation of {:?} failed: {}; marking region instead", rect, err),
        }
    }

    match surface.context() {
        Ok(ctx) => render_fallback_overlay(&ctx, rect),
        Err(err) => warn!("Could not mark blur region {:?}: {}", rect, err),
    }
}

impl Engine {
    /// Redraws the surface from the base image and the annotation store.
    ///
    /// Safe to call after any mutation and on every preview frame. Failures
    /// are logged and leave the store untouched.
    pub fn recomposite(&mut self) {
        if let Err(err) = composite(&mut self.surface, &self.base, self.store.as_slice()) {
            warn!("Recomposite failed: {}", err);
        }
        self.preview_visible = false;
    }

    /// Recomposites, then lets `draw` paint an uncommitted preview on top.
    ///
    /// The preview disappears at the next recomposite.
    pub fn draw_preview<F>(&mut self, draw: F)
    where
        F: FnOnce(&cairo::Context),
    {
        self.recomposite();
        match self.surface.context() {
            Ok(ctx) => {
                draw(&ctx);
                self.preview_visible = true;
            }
            Err(err) => warn!("Could not draw preview: {}", err),
        }
    }

    /// Removes a preview left on the surface, if any.
    pub(crate) fn discard_preview(&mut self) {
        if self.preview_visible {
            self.recomposite();
        }
    }
}
