//! Errors used when building a [`Board`][crate::Board].

use thiserror::Error;

use crate::board::Coordinate;

/// Reason a board could not be built or mined.
#[derive(Debug, Error, Copy, Clone, Eq, PartialEq)]
pub enum BoardError {
    /// The side length was zero.
    #[error("the board must be at least 1x1")]
    ZeroSize,
    /// The side length squared does not fit in `usize`.
    #[error("a {side}x{side} board is too large")]
    TooLarge { side: usize },
    /// At least one cell must stay free of mines.
    #[error("{mines} mines do not fit on a board with {cells} cells")]
    TooManyMines { mines: usize, cells: usize },
    /// A fixed mine layout named a cell off the board.
    #[error("mine at {coord:?} is outside the board")]
    MineOutOfBounds { coord: Coordinate },
    /// Mines are laid exactly once per board.
    #[error("mines were already placed on this board")]
    MinesAlreadyPlaced,
}
