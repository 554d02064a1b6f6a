//! Engine for a single-player game of minesweeper on a square board.
//!
//! [`board`] holds the cells, places the mines, counts neighbours, flood-fills reveals and
//! tracks the one-time [`PowerUp`]s. [`game`] wraps a [`Board`] with the turn logic a
//! front end needs: it decides when the game is won or lost and keeps the shield armed
//! between turns.
//!
//! ```
//! use minefield::{Board, Coordinate, RevealOutcome};
//!
//! let mut board = Board::with_mines(3, &[Coordinate::new(0, 0)]).unwrap();
//! let reveal = board.reveal_tile(2, 2, false);
//! assert_eq!(reveal.outcome, RevealOutcome::Safe);
//! assert!(board.all_safe_tiles_revealed());
//! ```

pub use self::{
    board::{
        Board, BoardError, Cell, CellReveal, CellView, Coordinate, Reveal, RevealOutcome,
        Rendering, SquareDimensions,
    },
    game::{default_mine_count, Command, Game, Status, Turn},
    power_ups::PowerUp,
    random::RandomSource,
};

pub mod board;
pub mod game;
mod power_ups;
mod random;
