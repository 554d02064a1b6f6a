//! Square board dimensions.
use std::convert::TryFrom;

use crate::board::Coordinate;

/// Offsets of the eight neighbours of a cell, scanned top row first.
const NEIGHBOR_OFFSETS: [(isize, isize); 8] = [
    (-1, -1),
    (-1, 0),
    (-1, 1),
    (0, -1),
    (0, 1),
    (1, -1),
    (1, 0),
    (1, 1),
];

/// Dimensions of a square board with `side` cells along each edge.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct SquareDimensions {
    side: usize,
}

impl SquareDimensions {
    /// Create new [`SquareDimensions`] with the given side length.
    /// Returns `None` if `side` is 0 or `side * side` exceeds `usize::max_value()`.
    pub fn try_new(side: usize) -> Option<Self> {
        if side == 0 {
            None
        } else {
            side.checked_mul(side).map(|_| Self { side })
        }
    }

    /// Number of cells along each edge.
    pub fn side(&self) -> usize {
        self.side
    }

    /// Total number of cells. Used to allocate storage for the board.
    pub fn total_size(&self) -> usize {
        self.side * self.side
    }

    /// Convert a coordinate to a row-major index.
    /// Returns `None` if the coordinate is out of bounds.
    pub fn try_linearize(&self, coord: &Coordinate) -> Option<usize> {
        self.check_bounds(coord)
            .map(|coord| coord.row * self.side + coord.col)
    }

    /// Get back a coordinate from a row-major index. The index must be below
    /// [`total_size`][Self::total_size].
    pub fn un_linearize(&self, idx: usize) -> Coordinate {
        debug_assert!(idx < self.total_size(), "index {} out of bounds", idx);
        Coordinate {
            row: idx / self.side,
            col: idx % self.side,
        }
    }

    /// Turn signed player input into a [`Coordinate`], or `None` if either part is
    /// negative or past the edge of the board.
    pub fn checked_coordinate(&self, row: i64, col: i64) -> Option<Coordinate> {
        let row = usize::try_from(row).ok()?;
        let col = usize::try_from(col).ok()?;
        self.check_bounds(&Coordinate { row, col })
    }

    /// Iterate the up-to-8 in-bounds neighbours of the given coordinate. Yields nothing
    /// if the coordinate itself is out of bounds.
    pub fn neighbors(&self, coord: Coordinate) -> Neighbors {
        Neighbors {
            side: self.side,
            coord,
            // Out of bounds coordinates skip straight to the end.
            step: match self.check_bounds(&coord) {
                Some(_) => 0,
                None => NEIGHBOR_OFFSETS.len(),
            },
        }
    }

    /// Get an iterator over rows of this grid. Each row is an iterator over the
    /// coordinates of that row.
    pub fn iter_coordinates(&self) -> impl Iterator<Item = impl Iterator<Item = Coordinate>> {
        let side = self.side;
        (0..side).map(move |row| (0..side).map(move |col| Coordinate { row, col }))
    }

    /// Return the coordinate if it is in bounds.
    #[inline]
    fn check_bounds(&self, coord: &Coordinate) -> Option<Coordinate> {
        if coord.row < self.side && coord.col < self.side {
            Some(*coord)
        } else {
            None
        }
    }
}

/// Iterator over the neighbours of a coordinate, clipped at the board edges.
#[derive(Debug, Clone)]
pub struct Neighbors {
    side: usize,
    coord: Coordinate,
    step: usize,
}

impl Iterator for Neighbors {
    type Item = Coordinate;

    fn next(&mut self) -> Option<Coordinate> {
        while let Some(&(dr, dc)) = NEIGHBOR_OFFSETS.get(self.step) {
            self.step += 1;
            let row = offset(self.coord.row, dr, self.side);
            let col = offset(self.coord.col, dc, self.side);
            if let (Some(row), Some(col)) = (row, col) {
                return Some(Coordinate { row, col });
            }
        }
        None
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, Some(NEIGHBOR_OFFSETS.len() - self.step))
    }
}

/// Shift `base` by `delta`, returning `None` if that leaves `[0, side)`.
fn offset(base: usize, delta: isize, side: usize) -> Option<usize> {
    let shifted = if delta < 0 {
        base.checked_sub(delta.unsigned_abs())?
    } else {
        base.checked_add(delta as usize)?
    };
    if shifted < side {
        Some(shifted)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn neighbors_of(dim: &SquareDimensions, row: usize, col: usize) -> Vec<(usize, usize)> {
        dim.neighbors(Coordinate::new(row, col)).map(Into::into).collect()
    }

    #[test]
    fn rejects_empty_and_overflowing_sides() {
        assert!(SquareDimensions::try_new(0).is_none());
        assert!(SquareDimensions::try_new(usize::max_value()).is_none());
        assert_eq!(SquareDimensions::try_new(4).unwrap().total_size(), 16);
    }

    #[test]
    fn corner_has_three_neighbors() {
        let dim = SquareDimensions::try_new(3).unwrap();
        assert_eq!(neighbors_of(&dim, 0, 0), vec![(0, 1), (1, 0), (1, 1)]);
        assert_eq!(neighbors_of(&dim, 2, 2), vec![(1, 1), (1, 2), (2, 1)]);
    }

    #[test]
    fn center_neighbors_in_scan_order() {
        let dim = SquareDimensions::try_new(3).unwrap();
        assert_eq!(
            neighbors_of(&dim, 1, 1),
            vec![(0, 0), (0, 1), (0, 2), (1, 0), (1, 2), (2, 0), (2, 1), (2, 2)]
        );
    }

    #[test]
    fn single_cell_board_has_no_neighbors() {
        let dim = SquareDimensions::try_new(1).unwrap();
        assert!(neighbors_of(&dim, 0, 0).is_empty());
        assert!(neighbors_of(&dim, 5, 0).is_empty());
    }

    #[test]
    fn checked_coordinate_rejects_out_of_range() {
        let dim = SquareDimensions::try_new(5).unwrap();
        assert_eq!(dim.checked_coordinate(-1, 0), None);
        assert_eq!(dim.checked_coordinate(0, -3), None);
        assert_eq!(dim.checked_coordinate(5, 0), None);
        assert_eq!(dim.checked_coordinate(0, 5), None);
        assert_eq!(dim.checked_coordinate(4, 2), Some(Coordinate::new(4, 2)));
    }

    #[test]
    fn linearize_is_row_major() {
        let dim = SquareDimensions::try_new(4).unwrap();
        assert_eq!(dim.try_linearize(&Coordinate::new(2, 1)), Some(9));
        assert_eq!(dim.try_linearize(&Coordinate::new(4, 0)), None);
        assert_eq!(dim.un_linearize(9), Coordinate::new(2, 1));
        let flat: Vec<_> = dim.iter_coordinates().flatten().collect();
        assert_eq!(flat.len(), 16);
        assert_eq!(flat[5], Coordinate::new(1, 1));
    }
}
