//! A single position on the board.

/// What uncovering a [`Cell`] found underneath.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum CellReveal {
    /// The cell held no mine.
    Safe,
    /// The cell held a mine.
    HitMine,
}

/// One grid position. Mines are laid once during setup and a cell only ever goes from
/// hidden to revealed.
#[derive(Debug, Default, Clone, Eq, PartialEq)]
pub struct Cell {
    /// Whether a mine sits under this cell.
    mine: bool,

    /// Whether the player has uncovered this cell.
    revealed: bool,

    /// Number of mines among the up-to-8 neighbours. Only computed for cells without a
    /// mine.
    adjacent_mines: u8,
}

impl Cell {
    /// Lay a mine under this cell. Calling it again has no further effect.
    pub(super) fn mark_as_mine(&mut self) {
        self.mine = true;
    }

    pub(super) fn set_adjacent_mines(&mut self, count: u8) {
        debug_assert!(count <= 8, "a cell has at most 8 neighbours, got {}", count);
        self.adjacent_mines = count;
    }

    /// Uncover the cell and report what was under it. This does not check whether the
    /// cell was already revealed; the board guards against that.
    pub(super) fn reveal(&mut self) -> CellReveal {
        self.revealed = true;
        if self.mine {
            CellReveal::HitMine
        } else {
            CellReveal::Safe
        }
    }

    /// Whether a mine sits under this cell.
    pub fn is_mine(&self) -> bool {
        self.mine
    }

    /// Whether this cell has been uncovered.
    pub fn is_revealed(&self) -> bool {
        self.revealed
    }

    /// Number of neighbouring mines. Meaningless for a cell that is itself a mine.
    pub fn adjacent_mines(&self) -> u8 {
        self.adjacent_mines
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reveal_reports_mine() {
        let mut cell = Cell::default();
        cell.mark_as_mine();
        cell.mark_as_mine();
        assert!(cell.is_mine());
        assert!(!cell.is_revealed());
        assert_eq!(cell.reveal(), CellReveal::HitMine);
        assert!(cell.is_revealed());
    }

    #[test]
    fn reveal_is_unconditional() {
        let mut cell = Cell::default();
        cell.set_adjacent_mines(3);
        assert_eq!(cell.reveal(), CellReveal::Safe);
        assert_eq!(cell.reveal(), CellReveal::Safe);
        assert!(cell.is_revealed());
        assert_eq!(cell.adjacent_mines(), 3);
    }
}
