//! Linear undo/redo over grid snapshots.

use crate::grid::Grid;

/// Snapshot stack with a cursor.
///
/// Never empty: the initial grid is entry 0 and the index always points at
/// an existing entry. Committing drops any redo entries first.
#[derive(Debug, Clone, PartialEq)]
pub struct History {
    entries: Vec<Grid>,
    index: usize,
}

impl History {
    pub fn new(initial: Grid) -> Self {
        Self {
            entries: vec![initial],
            index: 0,
        }
    }

    /// Truncate anything after the cursor, append `grid`, move to it.
    pub fn commit(&mut self, grid: Grid) {
        self.entries.truncate(self.index + 1);
        self.entries.push(grid);
        self.index = self.entries.len() - 1;
    }

    /// Step back. `None` at the oldest entry.
    pub fn undo(&mut self) -> Option<&Grid> {
        if !self.can_undo() {
            return None;
        }
        self.index -= 1;
        self.entries.get(self.index)
    }

    /// Step forward. `None` at the newest entry.
    pub fn redo(&mut self) -> Option<&Grid> {
        if !self.can_redo() {
            return None;
        }
        self.index += 1;
        self.entries.get(self.index)
    }

    pub fn can_undo(&self) -> bool {
        self.index > 0
    }

    pub fn can_redo(&self) -> bool {
        self.index + 1 < self.entries.len()
    }

    /// Replace the whole history with a single entry.
    pub fn reset(&mut self, grid: Grid) {
        self.entries.clear();
        self.entries.push(grid);
        self.index = 0;
    }

    pub fn current(&self) -> &Grid {
        &self.entries[self.index]
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn entries(&self) -> &[Grid] {
        &self.entries
    }
}

impl Default for History {
    fn default() -> Self {
        Self::new(Grid::empty())
    }
}
