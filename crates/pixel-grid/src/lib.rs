//! pixel-grid: the 16x16 pixel-art core behind BitBrush
//!
//! This library turns arbitrary bitmaps into a fixed 16x16 grid of colors
//! and provides the editing primitives that operate on that grid.
//!
//! # Quick Start
//!
//! Sample an image into a grid and export it as instruction text:
//!
//! ```
//! use pixel_grid::{instructions, rasterize, BackgroundThreshold, SourceBitmap, TransformState};
//!
//! let bitmap = SourceBitmap::filled(32, 32, 255, 0, 0, 255).unwrap();
//! let state = TransformState::fitted(bitmap.width(), bitmap.height());
//! let grid = rasterize(&bitmap, &state, BackgroundThreshold::DEFAULT);
//!
//! let text = instructions::encode("Red", "A red square.", &grid);
//! assert!(text.starts_with("Title: Red"));
//! assert_eq!(instructions::decode(&text).grid, grid);
//! ```
//!
//! # Editing
//!
//! A [`Session`] owns one grid with its [`History`], the active [`Tool`],
//! and the [`TransformController`] used while positioning an imported
//! bitmap:
//!
//! ```
//! use pixel_grid::{Color, Session};
//!
//! let mut session = Session::new();
//! session.pointer_down(10.0, 10.0);
//! session.pointer_up();
//! assert_eq!(session.grid()[0], Color::WHITE);
//! assert!(session.undo());
//! assert!(session.grid().is_blank());
//! ```
//!
//! # Sampling Model
//!
//! The source is drawn onto a 320x320 surface (20 units per cell) centered
//! at `(160 + offset_x, 160 + offset_y)`, rotated clockwise and scaled.
//! Each cell reads exactly one surface pixel at `(col*20+10, row*20+10)`.
//! Brightness is the plain `(R+G+B)/3` average, and the
//! [`BackgroundThreshold`] decides which samples become [`Color::Empty`].
//!
//! # Text Format
//!
//! See [`instructions`] for the grid interchange format. Grids with up to
//! 26 colors use tokens `A`-`Z`; larger palettes continue with further
//! single-character tokens so every grid round-trips.

pub mod color;
pub mod fill;
pub mod grid;
pub mod history;
pub mod instructions;
pub mod sampler;
pub mod session;
pub mod transform;


pub use color::{pick, pick_hex, Color, ParseColorError, Rgba, DEFAULT_PICK};
pub use fill::flood_fill;
pub use grid::{Grid, CELL_COUNT, GRID_SIZE};
pub use history::History;
pub use instructions::{Decoded, ParseError};
pub use sampler::{
    rasterize, render_surface, BackgroundThreshold, DecodeError, SourceBitmap, CELL_SPAN,
    SURFACE_SIZE,
};
pub use session::{Session, Shortcut, Tool, DEFAULT_COLOR, DEFAULT_DESCRIPTION, DEFAULT_TITLE};
pub use transform::{Mode, TransformController, TransformState, MAX_SCALE, MIN_SCALE, ZOOM_STEP};
