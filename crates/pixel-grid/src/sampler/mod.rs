//! Source bitmaps and the image-to-grid sampler.
//!
//! A [`SourceBitmap`] is drawn through a [`TransformState`](crate::TransformState)
//! onto a 320x320 working surface, then one point per cell is read back and
//! classified against the [`BackgroundThreshold`].

mod bitmap;
mod rasterize;
mod threshold;

pub use bitmap::{DecodeError, SourceBitmap, MAX_DIMENSION};
pub use rasterize::{
    classify, rasterize, render_surface, surface_transform, CELL_SPAN, SURFACE_SIZE,
};
pub use threshold::BackgroundThreshold;
