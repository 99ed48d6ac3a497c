//! Decoded source rasters.

use std::fmt;
use std::io::Cursor;

use tiny_skia::{ColorU8, Pixmap, PixmapRef};

/// Largest accepted width or height in pixels.
pub const MAX_DIMENSION: u32 = 8192;

/// Error returned when bytes cannot be turned into a [`SourceBitmap`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    /// The image decoder rejected the data (unsupported or corrupt)
    Image(String),
    /// Decoded image has zero width or height
    EmptyImage,
    /// Image exceeds [`MAX_DIMENSION`] on one side
    TooLarge { width: u32, height: u32 },
    /// Raw RGBA buffer does not match `width * height * 4`
    LengthMismatch { expected: usize, actual: usize },
}

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DecodeError::Image(msg) => write!(f, "failed to decode image: {}", msg),
            DecodeError::EmptyImage => write!(f, "image has no pixels"),
            DecodeError::TooLarge { width, height } => write!(
                f,
                "image is {}x{}, larger than the {}px limit",
                width, height, MAX_DIMENSION
            ),
            DecodeError::LengthMismatch { expected, actual } => write!(
                f,
                "RGBA buffer has {} bytes, expected {}",
                actual, expected
            ),
        }
    }
}

impl std::error::Error for DecodeError {}

/// A decoded raster ready for sampling.
///
/// Pixels are stored premultiplied, the form the rasterizer draws from.
#[derive(Clone, PartialEq)]
pub struct SourceBitmap {
    pixmap: Pixmap,
}

impl SourceBitmap {
    /// Decode PNG, JPEG, WebP, GIF or BMP bytes.
    ///
    /// Dimensions are read from the header and checked against
    /// [`MAX_DIMENSION`] before any pixel data is decoded.
    pub fn decode(bytes: &[u8]) -> Result<Self, DecodeError> {
        let (width, height) = reader(bytes)?
            .into_dimensions()
            .map_err(|e| DecodeError::Image(e.to_string()))?;
        if width > MAX_DIMENSION || height > MAX_DIMENSION {
            return Err(DecodeError::TooLarge { width, height });
        }

        let mut limits = image::io::Limits::default();
        limits.max_image_width = Some(MAX_DIMENSION);
        limits.max_image_height = Some(MAX_DIMENSION);
        let mut reader = reader(bytes)?;
        reader.limits(limits);
        let image = reader
            .decode()
            .map_err(|e| DecodeError::Image(e.to_string()))?;
        let rgba = image.to_rgba8();
        let (width, height) = rgba.dimensions();
        Self::from_rgba(width, height, rgba.as_raw())
    }

    /// Build from straight (non-premultiplied) RGBA bytes.
    pub fn from_rgba(width: u32, height: u32, data: &[u8]) -> Result<Self, DecodeError> {
        if width == 0 || height == 0 {
            return Err(DecodeError::EmptyImage);
        }
        if width > MAX_DIMENSION || height > MAX_DIMENSION {
            return Err(DecodeError::TooLarge { width, height });
        }
        let expected = width as usize * height as usize * 4;
        if data.len() != expected {
            return Err(DecodeError::LengthMismatch {
                expected,
                actual: data.len(),
            });
        }

        let mut pixmap = Pixmap::new(width, height).ok_or(DecodeError::EmptyImage)?;
        for (dst, src) in pixmap.pixels_mut().iter_mut().zip(data.chunks_exact(4)) {
            *dst = ColorU8::from_rgba(src[0], src[1], src[2], src[3]).premultiply();
        }
        Ok(Self { pixmap })
    }

    /// A bitmap of one uniform color.
    pub fn filled(width: u32, height: u32, r: u8, g: u8, b: u8, a: u8) -> Result<Self, DecodeError> {
        let data: Vec<u8> = [r, g, b, a]
            .iter()
            .copied()
            .cycle()
            .take(width as usize * height as usize * 4)
            .collect();
        Self::from_rgba(width, height, &data)
    }

    pub fn width(&self) -> u32 {
        self.pixmap.width()
    }

    pub fn height(&self) -> u32 {
        self.pixmap.height()
    }

    pub(crate) fn as_pixmap(&self) -> PixmapRef<'_> {
        self.pixmap.as_ref()
    }
}

impl fmt::Debug for SourceBitmap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SourceBitmap")
            .field("width", &self.width())
            .field("height", &self.height())
            .finish()
    }
}

fn reader(bytes: &[u8]) -> Result<image::io::Reader<Cursor<&[u8]>>, DecodeError> {
    image::io::Reader::new(Cursor::new(bytes))
        .with_guessed_format()
        .map_err(|e| DecodeError::Image(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tiny_png() -> Vec<u8> {
        let img = image::RgbaImage::from_pixel(2, 3, image::Rgba([10, 20, 30, 255]));
        let mut out = Vec::new();
        image::DynamicImage::ImageRgba8(img)
            .write_to(&mut std::io::Cursor::new(&mut out), image::ImageOutputFormat::Png)
            .unwrap();
        out
    }

    #[test]
    fn test_decode_png() {
        let bitmap = SourceBitmap::decode(&tiny_png()).unwrap();
        assert_eq!((bitmap.width(), bitmap.height()), (2, 3));
    }

    #[test]
    fn test_decode_rejects_oversized_header() {
        let img = image::RgbaImage::new(MAX_DIMENSION + 1, 1);
        let mut out = Vec::new();
        image::DynamicImage::ImageRgba8(img)
            .write_to(&mut std::io::Cursor::new(&mut out), image::ImageOutputFormat::Png)
            .unwrap();
        assert_eq!(
            SourceBitmap::decode(&out).unwrap_err(),
            DecodeError::TooLarge {
                width: MAX_DIMENSION + 1,
                height: 1
            }
        );
    }

    #[test]
    fn test_decode_garbage_fails() {
        let err = SourceBitmap::decode(b"definitely not an image").unwrap_err();
        assert!(matches!(err, DecodeError::Image(_)));
        assert!(err.to_string().starts_with("failed to decode image"));
    }

    #[test]
    fn test_from_rgba_validates_length() {
        let err = SourceBitmap::from_rgba(2, 2, &[0; 15]).unwrap_err();
        assert_eq!(
            err,
            DecodeError::LengthMismatch {
                expected: 16,
                actual: 15
            }
        );
    }

    #[test]
    fn test_from_rgba_rejects_empty_and_huge() {
        assert_eq!(
            SourceBitmap::from_rgba(0, 4, &[]).unwrap_err(),
            DecodeError::EmptyImage
        );
        assert!(matches!(
            SourceBitmap::from_rgba(MAX_DIMENSION + 1, 1, &[]).unwrap_err(),
            DecodeError::TooLarge { .. }
        ));
    }

    #[test]
    fn test_filled_stores_premultiplied() {
        let bitmap = SourceBitmap::filled(1, 1, 200, 100, 50, 128).unwrap();
        let px = bitmap.as_pixmap().pixel(0, 0).unwrap();
        assert_eq!(px.alpha(), 128);
        assert!(px.red() <= 101, "red should be premultiplied, got {}", px.red());
    }
}
