//! The fixed 16x16 cell buffer.

use std::ops::Index;

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::color::Color;

/// Cells per row and per column.
pub const GRID_SIZE: usize = 16;

/// Total number of cells.
pub const CELL_COUNT: usize = GRID_SIZE * GRID_SIZE;

/// A 16x16 grid of cell colors, row-major, origin top-left.
///
/// The length is fixed by the type; every cell always holds a [`Color`].
/// Serializes as an array of 256 canonical color strings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    cells: [Color; CELL_COUNT],
}

impl Grid {
    /// A grid with every cell [`Color::Empty`].
    pub fn empty() -> Self {
        Self::filled(Color::Empty)
    }

    pub fn filled(color: Color) -> Self {
        Self {
            cells: [color; CELL_COUNT],
        }
    }

    pub fn from_cells(cells: [Color; CELL_COUNT]) -> Self {
        Self { cells }
    }

    /// Build from a slice, failing unless it has exactly 256 cells.
    pub fn from_slice(cells: &[Color]) -> Option<Self> {
        let cells: [Color; CELL_COUNT] = cells.try_into().ok()?;
        Some(Self { cells })
    }

    /// Cell index for `(row, col)`, or `None` outside the grid.
    #[inline]
    pub fn index_of(row: usize, col: usize) -> Option<usize> {
        (row < GRID_SIZE && col < GRID_SIZE).then_some(row * GRID_SIZE + col)
    }

    /// Cell under a point on a square surface of `surface_size` units.
    ///
    /// Returns `None` for points outside the surface.
    pub fn cell_at(x: f32, y: f32, surface_size: f32) -> Option<usize> {
        if !(x >= 0.0 && y >= 0.0 && x < surface_size && y < surface_size) {
            return None;
        }
        let span = surface_size / GRID_SIZE as f32;
        Self::index_of((y / span) as usize, (x / span) as usize)
    }

    /// In-bounds 4-connected neighbors of a cell: left, right, up, down.
    ///
    /// Edges do not wrap.
    pub fn neighbors(index: usize) -> impl Iterator<Item = usize> {
        let col = index % GRID_SIZE;
        let row = index / GRID_SIZE;
        [
            (col > 0).then(|| index - 1),
            (col + 1 < GRID_SIZE).then(|| index + 1),
            (row > 0).then(|| index - GRID_SIZE),
            (row + 1 < GRID_SIZE).then(|| index + GRID_SIZE),
        ]
        .into_iter()
        .flatten()
    }

    #[inline]
    pub fn get(&self, index: usize) -> Option<Color> {
        self.cells.get(index).copied()
    }

    /// Set one cell. Returns `false` if the index is out of range.
    #[inline]
    pub fn set(&mut self, index: usize, color: Color) -> bool {
        match self.cells.get_mut(index) {
            Some(cell) => {
                *cell = color;
                true
            }
            None => false,
        }
    }

    pub fn cells(&self) -> &[Color] {
        &self.cells
    }

    pub fn rows(&self) -> impl Iterator<Item = &[Color]> {
        self.cells.chunks(GRID_SIZE)
    }

    /// Distinct colors in first-seen (row-major) order.
    pub fn distinct_colors(&self) -> Vec<Color> {
        let mut seen = Vec::new();
        for &cell in &self.cells {
            if !seen.contains(&cell) {
                seen.push(cell);
            }
        }
        seen
    }

    /// True when every cell is empty.
    pub fn is_blank(&self) -> bool {
        self.cells.iter().all(|c| c.is_empty())
    }
}

impl Default for Grid {
    fn default() -> Self {
        Self::empty()
    }
}

impl Index<usize> for Grid {
    type Output = Color;

    fn index(&self, index: usize) -> &Color {
        &self.cells[index]
    }
}

impl Serialize for Grid {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.cells.as_slice().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Grid {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let cells = Vec::<Color>::deserialize(deserializer)?;
        let len = cells.len();
        Grid::from_slice(&cells)
            .ok_or_else(|| D::Error::invalid_length(len, &"exactly 256 cells"))
    }
}
