//! How each cell should be drawn.

use std::slice::Chunks;

use crate::board::Cell;

/// What a front end should draw for one cell, already resolved in priority order.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum CellView {
    /// A mine shown by an active hint. The cell itself is still hidden.
    MineMarker,
    /// A mine the player uncovered.
    Exploded,
    /// An uncovered cell with no neighbouring mines.
    Blank,
    /// An uncovered cell with the given number of neighbouring mines, 1 through 8.
    Number(u8),
    /// A cell that has not been uncovered.
    Hidden,
}

impl CellView {
    pub(super) fn classify(cell: &Cell, hint_active: bool) -> Self {
        if hint_active && cell.is_mine() {
            CellView::MineMarker
        } else if !cell.is_revealed() {
            CellView::Hidden
        } else if cell.is_mine() {
            CellView::Exploded
        } else if cell.adjacent_mines() == 0 {
            CellView::Blank
        } else {
            CellView::Number(cell.adjacent_mines())
        }
    }
}

/// Snapshot of every cell's [`CellView`] taken by
/// [`Board::render`][crate::Board::render].
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Rendering {
    side: usize,
    cells: Vec<CellView>,
}

impl Rendering {
    pub(super) fn new(side: usize, cells: Vec<CellView>) -> Self {
        debug_assert_eq!(cells.len(), side * side);
        Self { side, cells }
    }

    /// Number of cells along each edge.
    pub fn side(&self) -> usize {
        self.side
    }

    /// Iterate the rows of the snapshot, top row first.
    pub fn rows(&self) -> Chunks<'_, CellView> {
        self.cells.chunks(self.side)
    }

    /// Look up a single cell's view.
    pub fn get(&self, row: usize, col: usize) -> Option<CellView> {
        if row < self.side && col < self.side {
            self.cells.get(row * self.side + col).copied()
        } else {
            None
        }
    }
}
