//! Iterative 4-connected region fill.

use crate::color::Color;
use crate::grid::Grid;

/// Fill the region around `seed` that holds `target` with `fill`.
///
/// Returns a new grid; the input is never touched. Neighbors are the four
/// orthogonal cells inside the grid (edges do not wrap), and a cell is only
/// written while it still equals `target`, so the result does not depend on
/// visiting order. `target == fill` and an out-of-range seed both return an
/// unchanged copy.
///
/// ```
/// use pixel_grid::{flood_fill, Color, Grid};
///
/// let grid = Grid::empty();
/// let filled = flood_fill(&grid, 0, Color::Empty, Color::WHITE);
/// assert!(filled.cells().iter().all(|&c| c == Color::WHITE));
/// ```
pub fn flood_fill(grid: &Grid, seed: usize, target: Color, fill: Color) -> Grid {
    let mut out = grid.clone();
    if target == fill || out.get(seed) != Some(target) {
        return out;
    }

    let mut stack = vec![seed];
    while let Some(index) = stack.pop() {
        if out.get(index) != Some(target) {
            continue;
        }
        out.set(index, fill);
        stack.extend(Grid::neighbors(index).filter(|&n| out.get(n) == Some(target)));
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Rgba;
    use crate::grid::GRID_SIZE;

    const RED: Color = Color::Rgba(Rgba::opaque(255, 0, 0));

    #[test]
    fn test_same_target_and_fill_is_noop() {
        let grid = Grid::filled(RED);
        assert_eq!(flood_fill(&grid, 10, RED, RED), grid);
    }

    #[test]
    fn test_out_of_range_seed_is_noop() {
        let grid = Grid::empty();
        assert_eq!(flood_fill(&grid, 256, Color::Empty, RED), grid);
    }

    #[test]
    fn test_seed_not_matching_target_is_noop() {
        let grid = Grid::empty();
        assert_eq!(flood_fill(&grid, 0, RED, Color::WHITE), grid);
    }

    #[test]
    fn test_fill_stops_at_wall() {
        // Vertical red wall at column 8 splits the grid in two.
        let mut grid = Grid::empty();
        for row in 0..GRID_SIZE {
            grid.set(Grid::index_of(row, 8).unwrap(), RED);
        }
        let out = flood_fill(&grid, 0, Color::Empty, Color::WHITE);
        for row in 0..GRID_SIZE {
            for col in 0..GRID_SIZE {
                let cell = out[Grid::index_of(row, col).unwrap()];
                let expected = match col {
                    0..=7 => Color::WHITE,
                    8 => RED,
                    _ => Color::Empty,
                };
                assert_eq!(cell, expected, "row {} col {}", row, col);
            }
        }
    }

    #[test]
    fn test_fill_does_not_wrap_rows() {
        // Cell 15 (end of row 0) is empty, cell 16 (start of row 1) is empty,
        // but everything between is red, so only row wrapping would join them.
        let mut grid = Grid::filled(RED);
        grid.set(15, Color::Empty);
        grid.set(16, Color::Empty);
        let out = flood_fill(&grid, 15, Color::Empty, Color::WHITE);
        assert_eq!(out[15], Color::WHITE);
        assert_eq!(out[16], Color::Empty);
    }

    #[test]
    fn test_diagonals_are_not_connected() {
        let mut grid = Grid::filled(RED);
        grid.set(0, Color::Empty);
        grid.set(17, Color::Empty);
        let out = flood_fill(&grid, 0, Color::Empty, Color::WHITE);
        assert_eq!(out[0], Color::WHITE);
        assert_eq!(out[17], Color::Empty);
    }

    #[test]
    fn test_input_untouched() {
        let grid = Grid::empty();
        let _ = flood_fill(&grid, 0, Color::Empty, RED);
        assert!(grid.is_blank());
    }
}
