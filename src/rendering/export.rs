//! Grid to PNG export.
//!
//! Cells are drawn as solid squares of `size / 16` pixels with no
//! smoothing. Empty cells stay transparent unless a background is given.

use std::io::Cursor;

use base64::Engine;
use pixel_grid::{Grid, Rgba, GRID_SIZE};
use thiserror::Error;
use tiny_skia::{Paint, Pixmap, Rect, Transform};

/// Sizes offered for clipboard copy and download.
pub const PRESET_SIZES: [u32; 6] = [16, 32, 64, 96, 128, 256];

/// Sizes shown in the preview strip.
pub const PREVIEW_SIZES: [u32; 5] = [16, 32, 64, 96, 128];

/// Left half of a preview tile.
pub const PREVIEW_LIGHT: Rgba = Rgba::opaque(0xFF, 0xD6, 0xD7);

/// Right half of a preview tile.
pub const PREVIEW_DARK: Rgba = Rgba::opaque(0, 0, 0);

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("Unsupported export size: {0} (expected one of 16, 32, 64, 96, 128, 256)")]
    UnsupportedSize(u32),

    #[error("Failed to allocate pixmap")]
    PixmapAllocation,

    #[error("PNG encode error: {0}")]
    PngEncode(String),
}

/// A square output size from [`PRESET_SIZES`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExportSize(u32);

impl ExportSize {
    /// One output pixel per cell.
    pub const NATIVE: ExportSize = ExportSize(16);

    pub fn new(pixels: u32) -> Result<Self, ExportError> {
        if PRESET_SIZES.contains(&pixels) {
            Ok(Self(pixels))
        } else {
            Err(ExportError::UnsupportedSize(pixels))
        }
    }

    pub fn pixels(self) -> u32 {
        self.0
    }

    /// Output pixels per cell edge.
    pub fn cell_span(self) -> u32 {
        self.0 / GRID_SIZE as u32
    }
}

impl TryFrom<u32> for ExportSize {
    type Error = ExportError;

    fn try_from(pixels: u32) -> Result<Self, Self::Error> {
        Self::new(pixels)
    }
}

/// Render the grid onto a fresh `size x size` pixmap.
pub fn render_pixmap(
    grid: &Grid,
    size: ExportSize,
    background: Option<Rgba>,
) -> Result<Pixmap, ExportError> {
    let mut pixmap =
        Pixmap::new(size.pixels(), size.pixels()).ok_or(ExportError::PixmapAllocation)?;
    paint_grid(&mut pixmap, grid, 0, size, background);
    Ok(pixmap)
}

/// Render the grid and encode it as PNG.
pub fn render_png(grid: &Grid, size: ExportSize) -> Result<Vec<u8>, ExportError> {
    encode_png(&render_pixmap(grid, size, None)?)
}

/// Preview tile: the grid on [`PREVIEW_LIGHT`] and on [`PREVIEW_DARK`],
/// side by side, `2 * size` wide.
pub fn render_preview_png(grid: &Grid, size: ExportSize) -> Result<Vec<u8>, ExportError> {
    let mut pixmap =
        Pixmap::new(size.pixels() * 2, size.pixels()).ok_or(ExportError::PixmapAllocation)?;
    paint_grid(&mut pixmap, grid, 0, size, Some(PREVIEW_LIGHT));
    paint_grid(&mut pixmap, grid, size.pixels(), size, Some(PREVIEW_DARK));
    encode_png(&pixmap)
}

/// `data:image/png;base64,...` for the native 16x16 rendering.
pub fn thumbnail_data_uri(grid: &Grid) -> Result<String, ExportError> {
    Ok(data_uri(&render_png(grid, ExportSize::NATIVE)?))
}

pub fn data_uri(png: &[u8]) -> String {
    format!(
        "data:image/png;base64,{}",
        base64::engine::general_purpose::STANDARD.encode(png)
    )
}

/// Download name: every non-alphanumeric ASCII character becomes `_`,
/// then lowercased, plus `.png`.
pub fn download_filename(title: &str) -> String {
    let stem: String = title
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() {
                c.to_ascii_lowercase()
            } else {
                '_'
            }
        })
        .collect();
    format!("{stem}.png")
}

fn paint_grid(pixmap: &mut Pixmap, grid: &Grid, origin_x: u32, size: ExportSize, background: Option<Rgba>) {
    let extent = size.pixels() as f32;
    if let Some(bg) = background {
        fill_square(pixmap, origin_x as f32, 0.0, extent, bg);
    }
    let span = size.cell_span() as f32;
    for (index, cell) in grid.cells().iter().enumerate() {
        let Some(color) = cell.rgba() else {
            continue;
        };
        let col = (index % GRID_SIZE) as f32;
        let row = (index / GRID_SIZE) as f32;
        fill_square(pixmap, origin_x as f32 + col * span, row * span, span, color);
    }
}

fn fill_square(pixmap: &mut Pixmap, x: f32, y: f32, extent: f32, color: Rgba) {
    let Some(rect) = Rect::from_xywh(x, y, extent, extent) else {
        return;
    };
    let mut paint = Paint::default();
    paint.set_color_rgba8(color.r, color.g, color.b, color.a);
    paint.anti_alias = false;
    pixmap.fill_rect(rect, &paint, Transform::identity(), None);
}

/// Encode a pixmap as 8-bit straight-alpha RGBA PNG.
pub fn encode_png(pixmap: &Pixmap) -> Result<Vec<u8>, ExportError> {
    let data: Vec<u8> = pixmap
        .pixels()
        .iter()
        .flat_map(|p| {
            let c = p.demultiply();
            [c.red(), c.green(), c.blue(), c.alpha()]
        })
        .collect();

    let mut buf = Cursor::new(Vec::new());
    {
        let mut encoder = png::Encoder::new(&mut buf, pixmap.width(), pixmap.height());
        encoder.set_color(png::ColorType::Rgba);
        encoder.set_depth(png::BitDepth::Eight);
        encoder.set_compression(png::Compression::Fast);
        let mut writer = encoder
            .write_header()
            .map_err(|e| ExportError::PngEncode(e.to_string()))?;
        writer
            .write_image_data(&data)
            .map_err(|e| ExportError::PngEncode(e.to_string()))?;
    }
    Ok(buf.into_inner())
}
