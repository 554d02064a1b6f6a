//! Turn-by-turn play on a single [`Board`]. Decides when the game is won or lost and
//! keeps the shield armed between turns, leaving input and drawing to the front end.
use log::info;

use crate::{
    board::{Board, BoardError, Rendering, RevealOutcome},
    power_ups::PowerUp,
    random::RandomSource,
};

/// Number of mines laid per cell of side length on a standard board.
const MINES_PER_SIDE: usize = 2;

/// Mine count for a standard game on a board with `side` cells per edge.
pub fn default_mine_count(side: usize) -> usize {
    side.saturating_mul(MINES_PER_SIDE)
}

/// A single player action.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Command {
    /// Uncover the cell at the given row and column. Values off the board are reported
    /// rather than rejected up front.
    Reveal { row: i64, col: i64 },
    /// Show the mines on the next render.
    Hint,
    /// Arm the shield against the next mine.
    Shield,
}

/// Whether the game is still going.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Status {
    Playing,
    Won,
    Lost,
}

/// What a [`Command`] did.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Turn {
    /// A reveal that left the game going.
    Revealed(RevealOutcome),
    /// The reveal uncovered the last safe cell.
    Won,
    /// The reveal hit a mine with no shield to absorb it.
    Lost,
    /// The mines will show on the next render.
    HintShown,
    /// The hint was already used.
    HintUnavailable,
    /// The shield will absorb the next mine.
    ShieldArmed,
    /// The shield already absorbed a mine.
    ShieldUnavailable,
    /// The game already ended; nothing changed.
    GameOver,
}

/// A game in progress.
#[derive(Debug)]
pub struct Game {
    board: Board,
    shield_armed: bool,
    status: Status,
}

impl Game {
    /// Start a game on a board whose mines are already laid.
    pub fn new(board: Board) -> Self {
        debug_assert!(board.mines_placed(), "game started before mines were laid");
        Self {
            board,
            shield_armed: false,
            status: Status::Playing,
        }
    }

    /// Build a board with `side` cells per edge, lay `mines` mines on it from `rng`, and
    /// start a game.
    pub fn generate<R: RandomSource + ?Sized>(
        side: usize,
        mines: usize,
        rng: &mut R,
    ) -> Result<Self, BoardError> {
        let mut board = Board::new(side, mines)?;
        board.initialize_mines(rng)?;
        Ok(Self::new(board))
    }

    /// Apply one player command.
    pub fn play(&mut self, command: Command) -> Turn {
        if self.status != Status::Playing {
            return Turn::GameOver;
        }
        match command {
            Command::Reveal { row, col } => {
                let reveal = self.board.reveal_tile(row, col, self.shield_armed);
                self.shield_armed = reveal.shield_armed;
                match reveal.outcome {
                    outcome if outcome.is_loss() => {
                        self.status = Status::Lost;
                        info!("game lost at ({}, {})", row, col);
                        Turn::Lost
                    }
                    _ if self.board.all_safe_tiles_revealed() => {
                        self.status = Status::Won;
                        info!("game won");
                        Turn::Won
                    }
                    outcome => Turn::Revealed(outcome),
                }
            }
            Command::Hint if self.board.activate(PowerUp::Hint) => Turn::HintShown,
            Command::Hint => Turn::HintUnavailable,
            Command::Shield if self.board.activate(PowerUp::Shield) => {
                self.shield_armed = true;
                Turn::ShieldArmed
            }
            Command::Shield => Turn::ShieldUnavailable,
        }
    }

    /// Current state of the game.
    pub fn status(&self) -> Status {
        self.status
    }

    /// Whether the shield will absorb the next mine.
    pub fn shield_armed(&self) -> bool {
        self.shield_armed
    }

    /// The board being played.
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Snapshot the board for drawing. See [`Board::render`].
    pub fn render(&mut self) -> Rendering {
        self.board.render()
    }

    /// Snapshot the board with every mine shown, for the final screen. Cells are not
    /// changed.
    pub fn render_solution(&mut self) -> Rendering {
        self.board.show_mines_on_next_render();
        self.board.render()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::{CellView, Coordinate};

    fn game(side: usize, mines: &[(usize, usize)]) -> Game {
        let mines: Vec<Coordinate> = mines.iter().copied().map(Coordinate::from).collect();
        Game::new(Board::with_mines(side, &mines).unwrap())
    }

    #[test]
    fn default_mines_are_twice_the_side() {
        assert_eq!(default_mine_count(8), 16);
        assert_eq!(default_mine_count(30), 60);
    }

    #[test]
    fn hitting_a_mine_loses() {
        let mut game = game(3, &[(1, 1)]);
        assert_eq!(game.play(Command::Reveal { row: 1, col: 1 }), Turn::Lost);
        assert_eq!(game.status(), Status::Lost);
        assert_eq!(game.play(Command::Reveal { row: 0, col: 0 }), Turn::GameOver);
        assert_eq!(game.play(Command::Hint), Turn::GameOver);
    }

    #[test]
    fn last_safe_cell_wins() {
        let mut game = game(2, &[(0, 0)]);
        let reveal = |row, col| Command::Reveal { row, col };
        assert_eq!(game.play(reveal(0, 1)), Turn::Revealed(RevealOutcome::Safe));
        assert_eq!(
            game.play(reveal(0, 1)),
            Turn::Revealed(RevealOutcome::AlreadyRevealed)
        );
        assert_eq!(
            game.play(reveal(-1, 0)),
            Turn::Revealed(RevealOutcome::InvalidCoordinates)
        );
        assert_eq!(game.play(reveal(1, 0)), Turn::Revealed(RevealOutcome::Safe));
        assert_eq!(game.play(reveal(1, 1)), Turn::Won);
        assert_eq!(game.status(), Status::Won);
    }

    #[test]
    fn armed_shield_carries_over_turns() {
        let mut game = game(3, &[(0, 0), (2, 2)]);
        assert_eq!(game.play(Command::Shield), Turn::ShieldArmed);
        assert_eq!(
            game.play(Command::Reveal { row: 0, col: 2 }),
            Turn::Revealed(RevealOutcome::Safe)
        );
        assert!(game.shield_armed());
        assert_eq!(
            game.play(Command::Reveal { row: 0, col: 0 }),
            Turn::Revealed(RevealOutcome::ShieldAbsorbed)
        );
        assert!(!game.shield_armed());
        assert_eq!(game.status(), Status::Playing);
        assert_eq!(game.play(Command::Shield), Turn::ShieldUnavailable);
        assert_eq!(game.play(Command::Reveal { row: 2, col: 2 }), Turn::Lost);
    }

    #[cfg(feature = "rng_gen")]
    #[test]
    fn generate_lays_requested_mines() {
        use rand::{rngs::StdRng, SeedableRng};

        let mut rng = StdRng::seed_from_u64(42);
        let game = Game::generate(8, 16, &mut rng).unwrap();
        assert_eq!(game.board().mine_count(), 16);
        assert_eq!(game.board().hidden_safe_count(), 48);
        assert_eq!(game.status(), Status::Playing);

        assert_eq!(
            Game::generate(3, 9, &mut rng).unwrap_err(),
            BoardError::TooManyMines { mines: 9, cells: 9 }
        );
    }

    #[test]
    fn hint_shows_once() {
        let mut game = game(3, &[(2, 0)]);
        assert_eq!(game.play(Command::Hint), Turn::HintShown);
        assert_eq!(game.render().get(2, 0), Some(CellView::MineMarker));
        assert_eq!(game.render().get(2, 0), Some(CellView::Hidden));
        assert_eq!(game.play(Command::Hint), Turn::HintUnavailable);
    }

    #[test]
    fn solution_shows_mines_without_revealing() {
        let mut game = game(3, &[(2, 0)]);
        assert_eq!(game.render_solution().get(2, 0), Some(CellView::MineMarker));
        assert!(!game.board().get(Coordinate::new(2, 0)).unwrap().is_revealed());
        assert!(game.board().hint_available());
    }
}
