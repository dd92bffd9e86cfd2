//! Immutable base image (the captured or uploaded screenshot).

use super::color::Color;
use super::surface::premultiply;
use crate::util::{self, Point, Rect};
use std::io::Read;
use std::sync::Arc;
use thiserror::Error;

/// Errors raised while building a base image.
#[derive(Debug, Error)]
pub enum ImageError {
    #[error("image has invalid dimensions {width}x{height}")]
    InvalidSize { width: i32, height: i32 },

    #[error("expected {expected} bytes of RGBA data, got {actual}")]
    LengthMismatch { expected: usize, actual: usize },

    #[error("failed to decode PNG: {0}")]
    Png(#[from] cairo::IoError),

    #[error("failed to read decoded pixels: {0}")]
    Borrow(#[from] cairo::BorrowError),

    #[error("failed to convert decoded pixels: {0}")]
    Cairo(#[from] cairo::Error),
}

/// Raster data the annotations are composited over.
///
/// A base image is never mutated once built; loading a new capture replaces
/// it. Pixels are shared, so clones are cheap.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BaseImage {
    width: i32,
    height: i32,
    pixels: Arc<[u32]>,
}

impl BaseImage {
    /// Builds an image from straight RGBA bytes, row-major.
    pub fn from_rgba(width: i32, height: i32, rgba: &[u8]) -> Result<Self, ImageError> {
        let area = checked_area(width, height)?;
        let expected = area * 4;
        if rgba.len() != expected {
            return Err(ImageError::LengthMismatch {
                expected,
                actual: rgba.len(),
            });
        }

        let pixels = rgba
            .chunks_exact(4)
            .map(|px| premultiply([px[0], px[1], px[2], px[3]]))
            .collect();

        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    /// Builds an image filled with a single color.
    pub fn solid(width: i32, height: i32, color: Color) -> Result<Self, ImageError> {
        let area = checked_area(width, height)?;
        let to_u8 = |c: f64| (c.clamp(0.0, 1.0) * 255.0).round() as u8;
        let word = premultiply([to_u8(color.r), to_u8(color.g), to_u8(color.b), to_u8(color.a)]);
        Ok(Self {
            width,
            height,
            pixels: vec![word; area].into(),
        })
    }

    /// Decodes a PNG stream.
    pub fn from_png<R: Read>(reader: &mut R) -> Result<Self, ImageError> {
        let decoded = cairo::ImageSurface::create_from_png(reader)?;
        let image = Self::from_surface(&decoded)?;
        log::debug!("Decoded {}x{} PNG base image", image.width, image.height);
        Ok(image)
    }

    /// Copies the pixels of a Cairo image surface of any format.
    ///
    /// Formats other than ARGB32 and RGB24 (16-bit PNGs decode to float
    /// formats) are painted onto an ARGB32 surface first.
    pub(crate) fn from_surface(surface: &cairo::ImageSurface) -> Result<Self, ImageError> {
        let width = surface.width();
        let height = surface.height();
        checked_area(width, height)?;

        let format = surface.format();
        if !matches!(format, cairo::Format::ARgb32 | cairo::Format::Rgb24) {
            log::debug!("Converting {:?} surface to ARGB32", format);
            return Self::from_surface(&to_argb32(surface)?);
        }

        // RGB24 leaves the top byte undefined; treat those pixels as opaque.
        let opaque = format == cairo::Format::Rgb24;
        let stride = surface.stride() as usize;
        let mut pixels = Vec::with_capacity(width as usize * height as usize);
        surface.with_data(|data| {
            for y in 0..height as usize {
                let row = &data[y * stride..y * stride + width as usize * 4];
                for px in row.chunks_exact(4) {
                    let word = u32::from_ne_bytes([px[0], px[1], px[2], px[3]]);
                    pixels.push(if opaque { word | 0xff00_0000 } else { word });
                }
            }
        })?;

        Ok(Self {
            width,
            height,
            pixels: pixels.into(),
        })
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    /// Premultiplied ARGB32 word at `(x, y)`.
    pub fn pixel(&self, x: i32, y: i32) -> Option<u32> {
        if x < 0 || y < 0 || x >= self.width || y >= self.height {
            return None;
        }
        self.pixels
            .get(y as usize * self.width as usize + x as usize)
            .copied()
    }

    /// Crops to the area selected by a coarse drag from `start` to `end`.
    ///
    /// Selections that moved less than [`util::MIN_SELECTION_DRAG`] pixels on
    /// both axes, or that miss the image entirely, return `None`.
    pub fn crop(&self, start: Point, end: Point) -> Option<BaseImage> {
        if util::is_degenerate_drag(start, end, util::MIN_SELECTION_DRAG) {
            log::debug!("Ignoring crop selection smaller than {}px", util::MIN_SELECTION_DRAG);
            return None;
        }

        let rect = Rect::from_corners(start, end)?.clamp_to_bounds(self.width, self.height)?;
        let mut pixels = Vec::with_capacity(rect.area());
        for y in rect.y..rect.bottom() {
            for x in rect.x..rect.right() {
                pixels.push(self.pixel(x, y)?);
            }
        }

        Some(BaseImage {
            width: rect.width,
            height: rect.height,
            pixels: pixels.into(),
        })
    }
}

fn to_argb32(source: &cairo::ImageSurface) -> Result<cairo::ImageSurface, ImageError> {
    let converted =
        cairo::ImageSurface::create(cairo::Format::ARgb32, source.width(), source.height())?;
    {
        let ctx = cairo::Context::new(&converted)?;
        ctx.set_operator(cairo::Operator::Source);
        ctx.set_source_surface(source, 0.0, 0.0)?;
        ctx.paint()?;
    }
    converted.flush();
    Ok(converted)
}

fn checked_area(width: i32, height: i32) -> Result<usize, ImageError> {
    if width <= 0 || height <= 0 {
        return Err(ImageError::InvalidSize { width, height });
    }
    (width as usize)
        .checked_mul(height as usize)
        .ok_or(ImageError::InvalidSize { width, height })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::draw::{RED, WHITE};

    #[test]
    fn from_rgba_checks_length() {
        let err = BaseImage::from_rgba(2, 2, &[0; 15]).unwrap_err();
        assert!(matches!(
            err,
            ImageError::LengthMismatch {
                expected: 16,
                actual: 15
            }
        ));
    }

    #[test]
    fn solid_fills_every_pixel() {
        let image = BaseImage::solid(4, 3, RED).unwrap();
        assert_eq!(image.pixel(0, 0), Some(0xffff_0000));
        assert_eq!(image.pixel(3, 2), Some(0xffff_0000));
        assert_eq!(image.pixel(4, 0), None);
    }

    #[test]
    fn crop_extracts_the_selected_area() {
        let mut rgba = Vec::new();
        for y in 0..40u8 {
            for x in 0..40u8 {
                rgba.extend_from_slice(&[x, y, 0, 255]);
            }
        }
        let image = BaseImage::from_rgba(40, 40, &rgba).unwrap();

        let cropped = image
            .crop(Point::new(30.0, 25.0), Point::new(10.0, 5.0))
            .unwrap();
        assert_eq!((cropped.width(), cropped.height()), (20, 20));
        assert_eq!(cropped.pixel(0, 0), image.pixel(10, 5));
        assert_eq!(cropped.pixel(19, 19), image.pixel(29, 24));
    }

    #[test]
    fn crop_ignores_small_selections() {
        let image = BaseImage::solid(100, 100, WHITE).unwrap();
        assert!(image.crop(Point::new(10.0, 10.0), Point::new(19.0, 15.0)).is_none());
        assert!(image.crop(Point::new(10.0, 10.0), Point::new(30.0, 15.0)).is_some());
    }

    #[test]
    fn png_round_trip_preserves_pixels() {
        let surface = cairo::ImageSurface::create(cairo::Format::ARgb32, 3, 2).unwrap();
        {
            let ctx = cairo::Context::new(&surface).unwrap();
            ctx.set_source_rgba(0.0, 0.0, 1.0, 1.0);
            ctx.paint().unwrap();
        }
        let mut encoded = Vec::new();
        surface.write_to_png(&mut encoded).unwrap();

        let image = BaseImage::from_png(&mut encoded.as_slice()).unwrap();
        assert_eq!((image.width(), image.height()), (3, 2));
        assert_eq!(image.pixel(2, 1), Some(0xff00_00ff));
    }

    /// Minimal RGBA PNG with 16 bits per channel, stored uncompressed.
    fn png_rgba16(width: u32, height: u32, pixel: impl Fn(u32, u32) -> [u16; 4]) -> Vec<u8> {
        fn crc32(bytes: &[u8]) -> u32 {
            let mut crc = 0xffff_ffffu32;
            for &byte in bytes {
                crc ^= byte as u32;
                for _ in 0..8 {
                    crc = if crc & 1 != 0 { (crc >> 1) ^ 0xedb8_8320 } else { crc >> 1 };
                }
            }
            !crc
        }
        fn chunk(out: &mut Vec<u8>, kind: &[u8; 4], body: &[u8]) {
            out.extend_from_slice(&(body.len() as u32).to_be_bytes());
            let mut tagged = kind.to_vec();
            tagged.extend_from_slice(body);
            out.extend_from_slice(&tagged);
            out.extend_from_slice(&crc32(&tagged).to_be_bytes());
        }

        let mut raw = Vec::new();
        for y in 0..height {
            raw.push(0);
            for x in 0..width {
                for channel in pixel(x, y) {
                    raw.extend_from_slice(&channel.to_be_bytes());
                }
            }
        }
        assert!(raw.len() <= u16::MAX as usize);

        let (mut a, mut b) = (1u32, 0u32);
        for &byte in &raw {
            a = (a + byte as u32) % 65521;
            b = (b + a) % 65521;
        }
        let mut zlib = vec![0x78, 0x01, 0x01];
        zlib.extend_from_slice(&(raw.len() as u16).to_le_bytes());
        zlib.extend_from_slice(&(!(raw.len() as u16)).to_le_bytes());
        zlib.extend_from_slice(&raw);
        zlib.extend_from_slice(&((b << 16) | a).to_be_bytes());

        let mut header = Vec::new();
        header.extend_from_slice(&width.to_be_bytes());
        header.extend_from_slice(&height.to_be_bytes());
        header.extend_from_slice(&[16, 6, 0, 0, 0]);

        let mut png = b"\x89PNG\r\n\x1a\n".to_vec();
        chunk(&mut png, b"IHDR", &header);
        chunk(&mut png, b"IDAT", &zlib);
        chunk(&mut png, b"IEND", &[]);
        png
    }

    #[test]
    fn sixteen_bit_png_decodes_to_argb32_words() {
        let png = png_rgba16(4, 3, |x, _| {
            if x < 2 {
                [0xffff, 0, 0, 0xffff]
            } else {
                [0, 0, 0xffff, 0xffff]
            }
        });

        let image = BaseImage::from_png(&mut png.as_slice()).unwrap();
        assert_eq!((image.width(), image.height()), (4, 3));
        assert_eq!(image.pixel(0, 0), Some(0xffff_0000));
        assert_eq!(image.pixel(1, 2), Some(0xffff_0000));
        assert_eq!(image.pixel(3, 2), Some(0xff00_00ff));
    }

    #[test]
    fn alpha_only_surface_is_converted() {
        let mask = cairo::ImageSurface::create(cairo::Format::A8, 2, 1).unwrap();
        {
            let ctx = cairo::Context::new(&mask).unwrap();
            ctx.rectangle(0.0, 0.0, 1.0, 1.0);
            ctx.fill().unwrap();
        }

        let image = BaseImage::from_surface(&mask).unwrap();
        assert_eq!(image.pixel(0, 0), Some(0xff00_0000));
        assert_eq!(image.pixel(1, 0), Some(0));
    }
}
