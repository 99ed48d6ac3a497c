//! Drawing the transformed source and point-sampling it.

use tiny_skia::{FilterQuality, Pixmap, PixmapPaint, Transform};

use super::bitmap::SourceBitmap;
use super::threshold::BackgroundThreshold;
use crate::color::{Color, Rgba};
use crate::grid::{Grid, GRID_SIZE};
use crate::transform::TransformState;

/// Side length of the square working surface.
pub const SURFACE_SIZE: u32 = 320;

/// Surface units per grid cell.
pub const CELL_SPAN: u32 = SURFACE_SIZE / GRID_SIZE as u32;

/// Reduce `source` to a 16x16 grid.
///
/// The source is drawn onto a fresh surface through `transform`, then the
/// pixel at `(col*20+10, row*20+10)` is read for each cell and run through
/// [`classify`]. Always samples from `source`, so repeated calls with
/// changing parameters never accumulate error.
pub fn rasterize(
    source: &SourceBitmap,
    transform: &TransformState,
    threshold: BackgroundThreshold,
) -> Grid {
    let mut grid = Grid::empty();
    let Some(surface) = render_surface(source, transform) else {
        return grid;
    };
    let half = CELL_SPAN / 2;

    for row in 0..GRID_SIZE {
        for col in 0..GRID_SIZE {
            let x = col as u32 * CELL_SPAN + half;
            let y = row as u32 * CELL_SPAN + half;
            let Some(sample) = surface.pixel(x, y).map(|p| p.demultiply()) else {
                continue;
            };
            let rgba = Rgba::new(sample.red(), sample.green(), sample.blue(), sample.alpha());
            if let Some(index) = Grid::index_of(row, col) {
                grid.set(index, classify(rgba, threshold));
            }
        }
    }

    grid
}

/// Draw `source` onto a transparent 320x320 surface.
///
/// Returns `None` only if the surface cannot be allocated.
pub fn render_surface(source: &SourceBitmap, transform: &TransformState) -> Option<Pixmap> {
    let mut surface = Pixmap::new(SURFACE_SIZE, SURFACE_SIZE)?;
    let paint = PixmapPaint {
        quality: FilterQuality::Bilinear,
        ..PixmapPaint::default()
    };
    let matrix = surface_transform(source.width(), source.height(), transform);
    surface.draw_pixmap(0, 0, source.as_pixmap(), &paint, matrix, None);
    Some(surface)
}

/// Matrix mapping source pixels onto the surface.
///
/// Translate to the surface center plus offset, rotate clockwise, then draw
/// the scaled source centered on the origin.
pub fn surface_transform(width: u32, height: u32, transform: &TransformState) -> Transform {
    let state = transform.normalized();
    let (sin, cos) = quarter_sin_cos(state.rotation_degrees);
    let center = SURFACE_SIZE as f32 / 2.0;
    let scaled_w = width as f32 * state.scale;
    let scaled_h = height as f32 * state.scale;

    Transform::from_translate(center + state.offset_x, center + state.offset_y)
        .pre_concat(Transform::from_row(cos, sin, -sin, cos, 0.0, 0.0))
        .pre_translate(-scaled_w / 2.0, -scaled_h / 2.0)
        .pre_scale(state.scale, state.scale)
}

/// Background rule for a single (un-premultiplied) sample.
///
/// Zero alpha is always empty, whatever the threshold.
pub fn classify(sample: Rgba, threshold: BackgroundThreshold) -> Color {
    if sample.a == 0 || threshold.is_background(sample.brightness()) {
        Color::Empty
    } else {
        Color::Rgba(sample)
    }
}

// Exact values for quarter turns keep 90/180/270 free of float noise.
fn quarter_sin_cos(degrees: u16) -> (f32, f32) {
    match degrees {
        0 => (0.0, 1.0),
        90 => (1.0, 0.0),
        180 => (0.0, -1.0),
        270 => (-1.0, 0.0),
        d => (d as f32).to_radians().sin_cos(),
    }
}
