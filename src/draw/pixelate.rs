//! Mosaic filter used by the blur tool.
//!
//! Each `p x p` block of the target rectangle is overwritten with the value of
//! its top-left pixel. The filter keeps no record of what it replaced; undo
//! relies on a snapshot taken by the caller before the filter runs.

use super::surface::{PixelRegion, RasterSurface, SurfaceError};
use crate::util::Rect;

/// Smallest mosaic block, in pixels.
pub const MIN_BLOCK_SIZE: i32 = 8;

/// Block size for a given stroke width: `max(8, stroke_width * 2)`.
pub fn block_size(stroke_width: u32) -> i32 {
    let doubled = stroke_width.saturating_mul(2).min(i32::MAX as u32) as i32;
    doubled.max(MIN_BLOCK_SIZE)
}

/// Pixelates `rect` (clamped to the surface) in place.
///
/// Returns `Ok(false)` when the rectangle has no on-surface area.
pub fn pixelate(surface: &mut RasterSurface, rect: Rect, block: i32) -> Result<bool, SurfaceError> {
    surface.modify_pixels(rect, |region| pixelate_region(region, block))
}

fn pixelate_region(region: &mut PixelRegion<'_>, block: i32) {
    let rect = region.rect();
    if !rect.is_valid() || block < 1 {
        return;
    }
    let step = block as usize;

    for block_y in (rect.y..rect.bottom()).step_by(step) {
        let end_y = block_y.saturating_add(block).min(rect.bottom());
        for block_x in (rect.x..rect.right()).step_by(step) {
            let end_x = block_x.saturating_add(block).min(rect.right());
            let sample = region.get(block_x, block_y);
            for y in block_y..end_y {
                for x in block_x..end_x {
                    region.set(x, y, sample);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::draw::BaseImage;

    fn gradient_surface(width: i32, height: i32) -> RasterSurface {
        let mut rgba = Vec::new();
        for y in 0..height {
            for x in 0..width {
                rgba.extend_from_slice(&[(x * 5) as u8, (y * 7) as u8, 90, 255]);
            }
        }
        let image = BaseImage::from_rgba(width, height, &rgba).unwrap();
        let mut surface = RasterSurface::new(width, height).unwrap();
        surface.draw_base_image(&image).unwrap();
        surface
    }

    #[test]
    fn block_size_has_a_floor_of_eight() {
        assert_eq!(block_size(1), 8);
        assert_eq!(block_size(4), 8);
        assert_eq!(block_size(5), 10);
        assert_eq!(block_size(20), 40);
    }

    #[test]
    fn every_pixel_in_a_block_matches_its_top_left_sample() {
        let mut surface = gradient_surface(40, 40);
        let rect = Rect::new(3, 5, 21, 18).unwrap();
        let before = surface.get_pixels(rect).unwrap().unwrap();

        assert!(pixelate(&mut surface, rect, 8).unwrap());

        let after = surface.get_pixels(rect).unwrap().unwrap();
        for y in rect.y..rect.bottom() {
            for x in rect.x..rect.right() {
                let sample_x = rect.x + (x - rect.x) / 8 * 8;
                let sample_y = rect.y + (y - rect.y) / 8 * 8;
                assert_eq!(
                    after.pixel(x, y),
                    before.pixel(sample_x, sample_y),
                    "pixel ({x}, {y})"
                );
            }
        }
    }

    #[test]
    fn pixels_outside_the_rectangle_are_untouched() {
        let mut surface = gradient_surface(30, 30);
        let everything = Rect::new(0, 0, 30, 30).unwrap();
        let before = surface.get_pixels(everything).unwrap().unwrap();

        let rect = Rect::new(10, 10, 10, 10).unwrap();
        pixelate(&mut surface, rect, 8).unwrap();

        let after = surface.get_pixels(everything).unwrap().unwrap();
        for y in 0..30 {
            for x in 0..30 {
                if !rect.contains(x, y) {
                    assert_eq!(after.pixel(x, y), before.pixel(x, y));
                }
            }
        }
    }

    #[test]
    fn off_surface_rectangles_are_a_no_op() {
        let mut surface = gradient_surface(10, 10);
        let rect = Rect::new(50, 50, 10, 10).unwrap();
        assert!(!pixelate(&mut surface, rect, 8).unwrap());
    }
}
