//! Flat storage for the cells of a board.

use std::ops::{Index, IndexMut};

use crate::board::{Cell, Coordinate, SquareDimensions};

/// Row-major grid of [`Cell`]s.
#[derive(Debug)]
pub(super) struct Grid {
    /// Dimensions of this board.
    pub(super) dim: SquareDimensions,
    /// Cells that make up this board.
    pub(super) cells: Box<[Cell]>,
}

impl Grid {
    /// Allocate an empty grid, or `None` if the cells do not fit in memory.
    pub(super) fn try_new(dim: SquareDimensions) -> Option<Self> {
        let mut cells = Vec::new();
        cells.try_reserve_exact(dim.total_size()).ok()?;
        cells.resize_with(dim.total_size(), Cell::default);
        Some(Self {
            dim,
            cells: cells.into_boxed_slice(),
        })
    }

    /// Get a reference to the cell at the given [`Coordinate`].
    pub(super) fn get(&self, coord: &Coordinate) -> Option<&Cell> {
        self.dim
            .try_linearize(coord)
            .and_then(|i| self.cells.get(i))
    }

    /// Get a mutable reference to the cell at the given [`Coordinate`].
    pub(super) fn get_mut(&mut self, coord: &Coordinate) -> Option<&mut Cell> {
        self.dim
            .try_linearize(coord)
            .and_then(move |i| self.cells.get_mut(i))
    }

    /// Count the mines among the neighbours of `coord`.
    pub(super) fn count_adjacent_mines(&self, coord: Coordinate) -> u8 {
        self.dim
            .neighbors(coord)
            .filter(|n| self[*n].is_mine())
            .count() as u8
    }
}

impl Index<Coordinate> for Grid {
    type Output = Cell;

    fn index(&self, coord: Coordinate) -> &Self::Output {
        self.get(&coord).expect("coordinate out of bounds")
    }
}

impl IndexMut<Coordinate> for Grid {
    fn index_mut(&mut self, coord: Coordinate) -> &mut Self::Output {
        self.get_mut(&coord).expect("coordinate out of bounds")
    }
}
