//! Types that make up the game board.

use enumflags2::BitFlags;
use log::{debug, info, trace};

use crate::{power_ups::PowerUp, random::RandomSource};

use self::grid::Grid;
pub use self::{
    cell::{Cell, CellReveal},
    coordinate::Coordinate,
    dimensions::{Neighbors, SquareDimensions},
    errors::BoardError,
    render::{CellView, Rendering},
};

mod cell;
mod coordinate;
mod dimensions;
mod errors;
mod grid;
mod render;

/// Result of asking the board to uncover a cell.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum RevealOutcome {
    /// The row or column was off the board. Nothing changed.
    InvalidCoordinates,
    /// The cell was already uncovered. Nothing changed.
    AlreadyRevealed,
    /// The cell was safe. If it had no neighbouring mines the surrounding empty region
    /// was uncovered as well.
    Safe,
    /// The cell held a mine and no shield was available. The game is lost.
    HitMine,
    /// The cell held a mine but the armed shield absorbed it. The mine stays uncovered
    /// and the shield is spent.
    ShieldAbsorbed,
}

impl RevealOutcome {
    /// Whether this outcome ends the game in a loss.
    pub fn is_loss(self) -> bool {
        self == RevealOutcome::HitMine
    }
}

/// What [`Board::reveal_tile`] did, together with whether the shield is still armed
/// afterwards.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct Reveal {
    /// What uncovering the cell led to.
    pub outcome: RevealOutcome,
    /// Whether the caller's shield remains armed. Only cleared when the shield absorbs a
    /// mine.
    pub shield_armed: bool,
}

/// A square minesweeper board and the power-ups spent on it.
#[derive(Debug)]
pub struct Board {
    /// Cells of the board.
    grid: Grid,

    /// Number of mines the board holds once they are laid.
    mine_count: usize,

    /// Set once mines have been laid.
    mines_placed: bool,

    /// Power-ups already used up this game.
    spent: BitFlags<PowerUp>,

    /// Show mines on the next render only.
    hint_active: bool,
}

impl Board {
    /// Create an empty board with `side` cells per edge that will hold `mine_count` mines
    /// once [`initialize_mines`][Self::initialize_mines] is called.
    pub fn new(side: usize, mine_count: usize) -> Result<Self, BoardError> {
        let dim = dimensions_for(side)?;
        if mine_count >= dim.total_size() {
            return Err(BoardError::TooManyMines {
                mines: mine_count,
                cells: dim.total_size(),
            });
        }
        Ok(Self {
            grid: allocate(dim)?,
            mine_count,
            mines_placed: false,
            spent: BitFlags::empty(),
            hint_active: false,
        })
    }

    /// Create a board with mines at exactly the given coordinates. Repeated coordinates
    /// count once.
    pub fn with_mines(side: usize, mines: &[Coordinate]) -> Result<Self, BoardError> {
        let dim = dimensions_for(side)?;
        let mut grid = allocate(dim)?;
        let mut mine_count = 0;
        for &coord in mines {
            let cell = grid
                .get_mut(&coord)
                .ok_or(BoardError::MineOutOfBounds { coord })?;
            if !cell.is_mine() {
                cell.mark_as_mine();
                mine_count += 1;
            }
        }
        if mine_count >= dim.total_size() {
            return Err(BoardError::TooManyMines {
                mines: mine_count,
                cells: dim.total_size(),
            });
        }
        let mut board = Self {
            grid,
            mine_count,
            mines_placed: true,
            spent: BitFlags::empty(),
            hint_active: false,
        };
        board.count_adjacent_mines();
        Ok(board)
    }

    /// Lay the mines by drawing random cells until enough distinct ones hold a mine, then
    /// count the neighbouring mines of every safe cell. Mines are laid once per board.
    pub fn initialize_mines<R: RandomSource + ?Sized>(
        &mut self,
        rng: &mut R,
    ) -> Result<(), BoardError> {
        if self.mines_placed {
            return Err(BoardError::MinesAlreadyPlaced);
        }
        let side = self.side();
        let mut placed = 0;
        let mut draws = 0usize;
        while placed < self.mine_count {
            let coord = Coordinate::new(rng.next_index(side), rng.next_index(side));
            draws += 1;
            let cell = &mut self.grid[coord];
            if !cell.is_mine() {
                cell.mark_as_mine();
                placed += 1;
            }
        }
        self.mines_placed = true;
        self.count_adjacent_mines();
        debug!(
            "laid {} mines on a {}x{} board in {} draws",
            placed, side, side, draws
        );
        Ok(())
    }

    fn count_adjacent_mines(&mut self) {
        for idx in 0..self.grid.cells.len() {
            let coord = self.grid.dim.un_linearize(idx);
            if !self.grid[coord].is_mine() {
                let count = self.grid.count_adjacent_mines(coord);
                self.grid[coord].set_adjacent_mines(count);
            }
        }
    }

    /// Get the [`SquareDimensions`] of this board.
    pub fn dimensions(&self) -> &SquareDimensions {
        &self.grid.dim
    }

    /// Number of cells along each edge.
    pub fn side(&self) -> usize {
        self.grid.dim.side()
    }

    /// Number of mines on the board.
    pub fn mine_count(&self) -> usize {
        self.mine_count
    }

    /// Whether mines have been laid yet.
    pub fn mines_placed(&self) -> bool {
        self.mines_placed
    }

    /// Get the cell at the given coordinate, or `None` if it is out of bounds.
    pub fn get(&self, coord: Coordinate) -> Option<&Cell> {
        self.grid.get(&coord)
    }

    /// Uncover the cell at `row`, `col`. Signed input is accepted so that negative
    /// coordinates typed by the player come back as
    /// [`InvalidCoordinates`][RevealOutcome::InvalidCoordinates] instead of wrapping.
    ///
    /// `shield_armed` says whether the player armed the shield; the returned [`Reveal`]
    /// carries the armed state to use on the next call.
    pub fn reveal_tile(&mut self, row: i64, col: i64, shield_armed: bool) -> Reveal {
        match self.grid.dim.checked_coordinate(row, col) {
            Some(coord) => self.reveal(coord, shield_armed),
            None => Reveal {
                outcome: RevealOutcome::InvalidCoordinates,
                shield_armed,
            },
        }
    }

    /// Uncover the cell at `coord`. See [`reveal_tile`][Self::reveal_tile].
    pub fn reveal(&mut self, coord: Coordinate, shield_armed: bool) -> Reveal {
        let unchanged = |outcome| Reveal {
            outcome,
            shield_armed,
        };
        let cell = match self.grid.get_mut(&coord) {
            None => return unchanged(RevealOutcome::InvalidCoordinates),
            Some(cell) if cell.is_revealed() => {
                return unchanged(RevealOutcome::AlreadyRevealed)
            }
            Some(cell) => cell,
        };

        match cell.reveal() {
            CellReveal::HitMine if shield_armed && !self.spent.contains(PowerUp::Shield) => {
                self.spent.insert(PowerUp::Shield);
                debug!("shield absorbed the mine at {:?}", coord);
                Reveal {
                    outcome: RevealOutcome::ShieldAbsorbed,
                    shield_armed: false,
                }
            }
            CellReveal::HitMine => {
                info!("uncovered the mine at {:?}", coord);
                unchanged(RevealOutcome::HitMine)
            }
            CellReveal::Safe => {
                if cell.adjacent_mines() == 0 {
                    let uncovered = self.flood_from(coord);
                    trace!("flood fill from {:?} uncovered {} cells", coord, uncovered);
                }
                unchanged(RevealOutcome::Safe)
            }
        }
    }

    /// Uncover the region of empty cells connected to `start` plus the numbered cells
    /// bordering it. `start` must already be uncovered with no neighbouring mines. Uses an
    /// explicit stack so large empty boards do not grow the call stack.
    fn flood_from(&mut self, start: Coordinate) -> usize {
        let mut pending = vec![start];
        let mut uncovered = 0;
        while let Some(coord) = pending.pop() {
            for neighbor in self.grid.dim.neighbors(coord) {
                let cell = &mut self.grid[neighbor];
                if cell.is_revealed() {
                    continue;
                }
                // Every neighbour of an empty cell is safe.
                let found = cell.reveal();
                debug_assert_eq!(
                    found,
                    CellReveal::Safe,
                    "flood fill uncovered a mine at {:?}",
                    neighbor
                );
                uncovered += 1;
                if cell.adjacent_mines() == 0 {
                    pending.push(neighbor);
                }
            }
        }
        uncovered
    }

    /// Returns true once every cell without a mine has been uncovered. Uncovered mines
    /// (absorbed by the shield) do not matter.
    pub fn all_safe_tiles_revealed(&self) -> bool {
        self.grid
            .cells
            .iter()
            .all(|cell| cell.is_mine() || cell.is_revealed())
    }

    /// Number of safe cells still hidden.
    pub fn hidden_safe_count(&self) -> usize {
        self.grid
            .cells
            .iter()
            .filter(|cell| !cell.is_mine() && !cell.is_revealed())
            .count()
    }

    /// Try to use a power-up, returning whether it took effect.
    ///
    /// The hint is spent immediately and shows every mine on the next
    /// [`render`][Self::render]. The shield is only checked here: it stays available until
    /// it absorbs a mine in [`reveal_tile`][Self::reveal_tile], so the caller keeps track
    /// of it being armed.
    pub fn activate(&mut self, power_up: PowerUp) -> bool {
        if self.spent.contains(power_up) {
            debug!("{:?} was already used", power_up);
            return false;
        }
        if power_up == PowerUp::Hint {
            self.spent.insert(PowerUp::Hint);
            self.hint_active = true;
            debug!("hint activated");
        }
        true
    }

    /// Activate the hint if `command` is `h` or `H` and the hint is unused.
    pub fn activate_hint(&mut self, command: char) -> bool {
        PowerUp::from_command(command) == Some(PowerUp::Hint) && self.activate(PowerUp::Hint)
    }

    /// Returns true if `command` is `s` or `S` and the shield has not absorbed a mine yet.
    pub fn activate_shield(&mut self, command: char) -> bool {
        PowerUp::from_command(command) == Some(PowerUp::Shield)
            && self.activate(PowerUp::Shield)
    }

    /// Whether the hint can still be activated.
    pub fn hint_available(&self) -> bool {
        !self.spent.contains(PowerUp::Hint)
    }

    /// Whether the shield can still absorb a mine.
    pub fn shield_available(&self) -> bool {
        !self.spent.contains(PowerUp::Shield)
    }

    /// Show every mine on the next [`render`][Self::render] without spending the hint,
    /// e.g. for the final screen of a lost game.
    pub fn show_mines_on_next_render(&mut self) {
        self.hint_active = true;
    }

    /// Whether the next render will show the mines.
    pub fn hint_active(&self) -> bool {
        self.hint_active
    }

    /// How the cell at `coord` would be drawn right now, or `None` if it is out of bounds.
    pub fn view(&self, coord: Coordinate) -> Option<CellView> {
        self.grid
            .get(&coord)
            .map(|cell| CellView::classify(cell, self.hint_active))
    }

    /// Snapshot how every cell should be drawn. An active hint shows in this snapshot
    /// and is then cleared.
    pub fn render(&mut self) -> Rendering {
        let hint_active = std::mem::take(&mut self.hint_active);
        let cells = self
            .grid
            .cells
            .iter()
            .map(|cell| CellView::classify(cell, hint_active))
            .collect();
        Rendering::new(self.side(), cells)
    }
}

fn dimensions_for(side: usize) -> Result<SquareDimensions, BoardError> {
    if side == 0 {
        return Err(BoardError::ZeroSize);
    }
    SquareDimensions::try_new(side).ok_or(BoardError::TooLarge { side })
}

fn allocate(dim: SquareDimensions) -> Result<Grid, BoardError> {
    Grid::try_new(dim).ok_or(BoardError::TooLarge { side: dim.side() })
}
