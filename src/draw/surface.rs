//! Raster surface backed by a Cairo ARGB32 image.
//!
//! Pixels are handled as native-endian `u32` words in Cairo's premultiplied
//! ARGB32 layout. Snapshots and pixelation copy these words verbatim, so
//! capturing and restoring a region is exact.

use super::image::BaseImage;
use crate::util::Rect;
use std::io::Write;
use thiserror::Error;

/// Errors raised by raster surface operations.
#[derive(Debug, Error)]
pub enum SurfaceError {
    #[error("invalid surface size {width}x{height}")]
    InvalidSize { width: i32, height: i32 },

    #[error("cairo error: {0}")]
    Cairo(#[from] cairo::Error),

    #[error("surface pixels are unavailable: {0}")]
    Busy(#[from] cairo::BorrowError),

    #[error("failed to encode PNG: {0}")]
    Png(#[from] cairo::IoError),
}

/// Copy of a rectangular block of surface pixels.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelBlock {
    rect: Rect,
    pixels: Vec<u32>,
}

impl PixelBlock {
    /// Surface rectangle this block was read from.
    pub fn rect(&self) -> Rect {
        self.rect
    }

    /// Row-major premultiplied ARGB32 words.
    pub fn pixels(&self) -> &[u32] {
        &self.pixels
    }

    /// Pixel at surface coordinates, if inside the block.
    pub fn pixel(&self, x: i32, y: i32) -> Option<u32> {
        if !self.rect.contains(x, y) {
            return None;
        }
        let index = (y - self.rect.y) as usize * self.rect.width as usize + (x - self.rect.x) as usize;
        self.pixels.get(index).copied()
    }
}

/// Mutable view over a clamped rectangle of surface pixels.
///
/// Coordinates passed to [`get`](Self::get) and [`set`](Self::set) are surface
/// coordinates and must lie inside [`rect`](Self::rect).
pub struct PixelRegion<'a> {
    data: &'a mut [u8],
    stride: usize,
    rect: Rect,
}

impl PixelRegion<'_> {
    pub fn rect(&self) -> Rect {
        self.rect
    }

    pub fn get(&self, x: i32, y: i32) -> u32 {
        read_word(self.data, offset(self.stride, x, y))
    }

    pub fn set(&mut self, x: i32, y: i32, pixel: u32) {
        write_word(self.data, offset(self.stride, x, y), pixel);
    }
}

/// The drawing canvas: a fixed-size ARGB32 pixel buffer.
pub struct RasterSurface {
    surface: cairo::ImageSurface,
    width: i32,
    height: i32,
}

impl std::fmt::Debug for RasterSurface {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RasterSurface")
            .field("width", &self.width)
            .field("height", &self.height)
            .finish()
    }
}

impl RasterSurface {
    /// Creates a transparent surface of the given size.
    pub fn new(width: i32, height: i32) -> Result<Self, SurfaceError> {
        if width <= 0 || height <= 0 {
            return Err(SurfaceError::InvalidSize { width, height });
        }
        let surface = cairo::ImageSurface::create(cairo::Format::ARgb32, width, height)?;
        Ok(Self {
            surface,
            width,
            height,
        })
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    /// Clamps a rectangle to this surface, rejecting zero-area results.
    pub fn clamp(&self, rect: Rect) -> Option<Rect> {
        rect.clamp_to_bounds(self.width, self.height)
    }

    /// Creates a Cairo context for stroke and fill primitives.
    ///
    /// The context must be dropped before any operation that writes pixels
    /// directly ([`set_pixels`](Self::set_pixels), [`modify_pixels`](Self::modify_pixels)),
    /// otherwise those report [`SurfaceError::Busy`].
    pub fn context(&self) -> Result<cairo::Context, SurfaceError> {
        Ok(cairo::Context::new(&self.surface)?)
    }

    /// Resets every pixel to transparent black.
    pub fn clear(&mut self) -> Result<(), SurfaceError> {
        let mut data = self.surface.data()?;
        data.fill(0);
        Ok(())
    }

    /// Copies the base image onto the surface at the origin.
    ///
    /// Only the overlapping area is written when sizes differ.
    pub fn draw_base_image(&mut self, image: &BaseImage) -> Result<(), SurfaceError> {
        let width = self.width.min(image.width());
        let height = self.height.min(image.height());
        let stride = self.surface.stride() as usize;
        let mut data = self.surface.data()?;
        for y in 0..height {
            for x in 0..width {
                if let Some(pixel) = image.pixel(x, y) {
                    write_word(&mut data, offset(stride, x, y), pixel);
                }
            }
        }
        Ok(())
    }

    /// Reads a rectangle of pixels.
    ///
    /// The rectangle is clamped to the surface; `Ok(None)` means nothing of it
    /// was on the surface.
    pub fn get_pixels(&self, rect: Rect) -> Result<Option<PixelBlock>, SurfaceError> {
        let Some(rect) = self.clamp(rect) else {
            return Ok(None);
        };

        let stride = self.surface.stride() as usize;
        let mut pixels = Vec::with_capacity(rect.area());
        self.surface.with_data(|data| {
            for y in rect.y..rect.bottom() {
                for x in rect.x..rect.right() {
                    pixels.push(read_word(data, offset(stride, x, y)));
                }
            }
        })?;

        if pixels.len() != rect.area() {
            return Err(SurfaceError::InvalidSize {
                width: rect.width,
                height: rect.height,
            });
        }

        Ok(Some(PixelBlock { rect, pixels }))
    }

    /// Writes a pixel block back at its own rectangle.
    ///
    /// Parts of the block outside the surface are skipped.
    pub fn set_pixels(&mut self, block: &PixelBlock) -> Result<(), SurfaceError> {
        let Some(target) = self.clamp(block.rect) else {
            return Ok(());
        };

        let stride = self.surface.stride() as usize;
        let mut data = self.surface.data()?;
        for y in target.y..target.bottom() {
            for x in target.x..target.right() {
                if let Some(pixel) = block.pixel(x, y) {
                    write_word(&mut data, offset(stride, x, y), pixel);
                }
            }
        }
        Ok(())
    }

    /// Runs `f` over the clamped rectangle with direct pixel access.
    ///
    /// Returns `Ok(false)` without calling `f` when the rectangle clamps to
    /// nothing.
    pub fn modify_pixels<F>(&mut self, rect: Rect, f: F) -> Result<bool, SurfaceError>
    where
        F: FnOnce(&mut PixelRegion<'_>),
    {
        let Some(rect) = self.clamp(rect) else {
            return Ok(false);
        };

        let stride = self.surface.stride() as usize;
        let mut data = self.surface.data()?;
        let mut region = PixelRegion {
            data: &mut data[..],
            stride,
            rect,
        };
        f(&mut region);
        Ok(true)
    }

    /// Reads one pixel as straight (un-premultiplied) RGBA.
    pub fn pixel(&self, x: i32, y: i32) -> Option<[u8; 4]> {
        let rect = Rect::new(x, y, 1, 1)?;
        let block = self.get_pixels(rect).ok().flatten()?;
        block.pixels().first().map(|word| unpremultiply(*word))
    }

    /// Copies the whole surface as straight RGBA bytes, row-major.
    pub fn to_rgba(&self) -> Result<Vec<u8>, SurfaceError> {
        let full = Rect::new(0, 0, self.width, self.height)
            .ok_or(SurfaceError::InvalidSize {
                width: self.width,
                height: self.height,
            })?;
        let block = self
            .get_pixels(full)?
            .ok_or(SurfaceError::InvalidSize {
                width: self.width,
                height: self.height,
            })?;
        Ok(block
            .pixels()
            .iter()
            .flat_map(|word| unpremultiply(*word))
            .collect())
    }

    /// Encodes the surface as PNG into `writer`.
    pub fn write_png<W: Write>(&self, writer: &mut W) -> Result<(), SurfaceError> {
        self.surface.write_to_png(writer)?;
        Ok(())
    }
}

fn offset(stride: usize, x: i32, y: i32) -> usize {
    y as usize * stride + x as usize * 4
}

fn read_word(data: &[u8], offset: usize) -> u32 {
    match data.get(offset..offset + 4) {
        Some(bytes) => u32::from_ne_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]),
        None => 0,
    }
}

fn write_word(data: &mut [u8], offset: usize, pixel: u32) {
    if let Some(bytes) = data.get_mut(offset..offset + 4) {
        bytes.copy_from_slice(&pixel.to_ne_bytes());
    }
}

/// Converts straight RGBA to a premultiplied ARGB32 word.
pub fn premultiply([r, g, b, a]: [u8; 4]) -> u32 {
    let scale = |c: u8| -> u32 {
        if a == 255 {
            c as u32
        } else {
            (c as u32 * a as u32 + 127) / 255
        }
    };
    ((a as u32) << 24) | (scale(r) << 16) | (scale(g) << 8) | scale(b)
}

/// Converts a premultiplied ARGB32 word to straight RGBA.
pub fn unpremultiply(word: u32) -> [u8; 4] {
    let a = (word >> 24) as u8;
    let channel = |shift: u32| -> u8 {
        let c = (word >> shift) & 0xff;
        match a {
            0 => 0,
            255 => c as u8,
            _ => ((c * 255 + a as u32 / 2) / a as u32).min(255) as u8,
        }
    };
    [channel(16), channel(8), channel(0), a]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::draw::WHITE;

    fn white_surface(width: i32, height: i32) -> RasterSurface {
        let mut surface = RasterSurface::new(width, height).unwrap();
        surface
            .draw_base_image(&BaseImage::solid(width, height, WHITE).unwrap())
            .unwrap();
        surface
    }

    #[test]
    fn new_rejects_empty_sizes() {
        assert!(matches!(
            RasterSurface::new(0, 10),
            Err(SurfaceError::InvalidSize { .. })
        ));
    }

    #[test]
    fn premultiply_round_trips_opaque_and_transparent() {
        assert_eq!(premultiply([255, 0, 0, 255]), 0xffff_0000);
        assert_eq!(unpremultiply(0xffff_0000), [255, 0, 0, 255]);
        assert_eq!(unpremultiply(0), [0, 0, 0, 0]);
        assert_eq!(premultiply([200, 100, 50, 0]), 0);
    }

    #[test]
    fn get_pixels_clamps_to_surface() {
        let surface = white_surface(10, 10);
        let block = surface
            .get_pixels(Rect::new(-5, 8, 10, 10).unwrap())
            .unwrap()
            .unwrap();
        assert_eq!(block.rect(), Rect::new(0, 8, 5, 2).unwrap());
        assert_eq!(block.pixels().len(), 10);
        assert!(block.pixels().iter().all(|&p| p == 0xffff_ffff));
    }

    #[test]
    fn get_pixels_off_surface_is_a_no_op() {
        let surface = white_surface(10, 10);
        let result = surface.get_pixels(Rect::new(20, 20, 5, 5).unwrap()).unwrap();
        assert!(result.is_none());
    }

    #[test]
    fn set_pixels_restores_a_captured_block() {
        let mut surface = white_surface(16, 16);
        let rect = Rect::new(4, 4, 6, 6).unwrap();
        let before = surface.get_pixels(rect).unwrap().unwrap();

        surface
            .modify_pixels(rect, |region| {
                let r = region.rect();
                for y in r.y..r.bottom() {
                    for x in r.x..r.right() {
                        region.set(x, y, 0xff00_00ff);
                    }
                }
            })
            .unwrap();
        assert_eq!(surface.pixel(5, 5), Some([0, 0, 255, 255]));

        surface.set_pixels(&before).unwrap();
        assert_eq!(surface.get_pixels(rect).unwrap().unwrap(), before);
        assert_eq!(surface.pixel(5, 5), Some([255, 255, 255, 255]));
    }

    #[test]
    fn direct_pixel_writes_fail_while_a_context_is_alive() {
        let mut surface = white_surface(8, 8);
        let ctx = surface.context().unwrap();
        let result = surface.modify_pixels(Rect::new(0, 0, 2, 2).unwrap(), |_| {});
        assert!(matches!(result, Err(SurfaceError::Busy(_))));
        drop(ctx);
        assert!(surface.clear().is_ok());
    }

    #[test]
    fn to_rgba_matches_surface_size() {
        let surface = white_surface(3, 2);
        let rgba = surface.to_rgba().unwrap();
        assert_eq!(rgba.len(), 3 * 2 * 4);
        assert!(rgba.iter().all(|&b| b == 255));
    }
}
