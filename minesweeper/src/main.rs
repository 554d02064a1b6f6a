use std::{
    fmt,
    io::{self, BufRead, Write},
    num::ParseIntError,
    str::FromStr,
};

use clap::{value_t, App, Arg, ArgMatches};
use flexi_logger::{FlexiLoggerError, Logger, LoggerHandle};
use once_cell::sync::Lazy;
use rand::{rngs::StdRng, SeedableRng};
use regex::Regex;
use thiserror::Error;

use minefield::{
    default_mine_count, BoardError, CellView, Command, Game, Rendering, RevealOutcome, Turn,
};

/// Log level used when neither `--log-level` nor `RUST_LOG` is set. Anything chattier
/// would interleave with the board on the terminal.
const DEFAULT_LOG_LEVEL: &str = "warn";

/// Errors that end the program early.
#[derive(Error)]
enum AppError {
    #[error("i/o error: {0}")]
    Io(#[from] io::Error),
    #[error("could not start logging: {0}")]
    Logger(#[from] FlexiLoggerError),
    #[error("cannot start that game: {0}")]
    Board(#[from] BoardError),
}

impl fmt::Debug for AppError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

fn main() -> Result<(), AppError> {
    let matches = App::new("Minesweeper")
        .version("1.0")
        .author("Zachary Stewart <zachary@zstewart.com>")
        .about("Command line minesweeper with a one-time hint and shield.")
        .arg(
            Arg::with_name("size")
                .short("s")
                .long("size")
                .value_name("SIZE")
                .help("number of cells along each edge of the board; asked for if omitted")
                .takes_value(true)
                .validator(|v| parse_arg::<usize>(&v)),
        )
        .arg(
            Arg::with_name("mines")
                .short("m")
                .long("mines")
                .value_name("MINES")
                .help("number of mines to lay [default: twice the size]")
                .takes_value(true)
                .validator(|v| parse_arg::<usize>(&v)),
        )
        .arg(
            Arg::with_name("seed")
                .long("seed")
                .value_name("SEED")
                .help("seed for laying mines, to replay the same board")
                .takes_value(true)
                .validator(|v| parse_arg::<u64>(&v)),
        )
        .arg(
            Arg::with_name("log_level")
                .long("log-level")
                .value_name("LEVEL")
                .help("log filter for messages on stderr, e.g. debug [default: RUST_LOG or warn]")
                .takes_value(true),
        )
        .get_matches();

    let _logger = start_logger(&matches)?;

    let stdin = io::stdin();
    let mut input = InputReader::new(stdin.lock());
    let mut rng = match optional_arg::<u64>(&matches, "seed") {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let result = choose_game(&matches, &mut rng, &mut input)
        .and_then(|mut game| Ok(play(&mut game, &mut input)?));
    match result {
        // Closing stdin quits the game.
        Err(AppError::Io(err)) if err.kind() == io::ErrorKind::UnexpectedEof => {
            println!();
            Ok(())
        }
        result => result,
    }
}

/// Install the stderr logger. An explicit `--log-level` wins over `RUST_LOG`.
fn start_logger(matches: &ArgMatches) -> Result<LoggerHandle, FlexiLoggerError> {
    let logger = match matches.value_of("log_level") {
        Some(level) => Logger::try_with_str(level)?,
        None => Logger::try_with_env_or_str(DEFAULT_LOG_LEVEL)?,
    };
    logger.log_to_stderr().start()
}

/// Validator for numeric arguments.
fn parse_arg<T>(value: &str) -> Result<(), String>
where
    T: FromStr<Err = ParseIntError>,
{
    value
        .parse::<T>()
        .map(|_| ())
        .map_err(|err| format!("{} is not a valid number: {}", value, err))
}

/// Get an argument that was already checked by [`parse_arg`], if it was given.
fn optional_arg<T>(matches: &ArgMatches, name: &str) -> Option<T>
where
    T: FromStr,
{
    matches.value_of(name)?;
    Some(value_t!(matches, name, T).unwrap_or_else(|err| err.exit()))
}

/// Build the game from the command line, or ask for the board size if it was not given.
fn choose_game(
    matches: &ArgMatches,
    rng: &mut StdRng,
    input: &mut InputReader<impl BufRead>,
) -> Result<Game, AppError> {
    let mines = optional_arg::<usize>(matches, "mines");
    if let Some(size) = optional_arg::<usize>(matches, "size") {
        let mines = mines.unwrap_or_else(|| default_mine_count(size));
        return Ok(Game::generate(size, mines, &mut *rng)?);
    }
    Ok(input.read_input(
        "Enter the board size (beginner is usually 8, hard 30):",
        |line| {
            let size = match line.parse::<usize>() {
                Ok(size) => size,
                Err(_) => {
                    println!("The board size must be a whole number, got \"{}\".", line);
                    return None;
                }
            };
            let mines = mines.unwrap_or_else(|| default_mine_count(size));
            match Game::generate(size, mines, &mut *rng) {
                Ok(game) => Some(game),
                Err(err) => {
                    println!("Cannot start that game: {}.", err);
                    None
                }
            }
        },
    )?)
}

/// Run the turn loop until the game is won, lost, or the player quits.
fn play(game: &mut Game, input: &mut InputReader<impl BufRead>) -> io::Result<()> {
    println!();
    println!("Uncover every safe tile. Type help or ? for commands.");
    loop {
        println!();
        show_status(game);
        show_board(&game.render());
        println!();

        let command = input.read_input_lower(
            "Enter the row and column to reveal (e.g. 1 1), h for a hint or s for the shield:",
            |line| match parse_input(line) {
                Ok(parsed) => Some(parsed),
                Err(err) => {
                    println!("{}. Use '?' for help.", err);
                    None
                }
            },
        )?;
        let command = match command {
            PlayerInput::Help => {
                print_help();
                continue;
            }
            PlayerInput::Quit => return Ok(()),
            PlayerInput::Play(command) => command,
        };

        match game.play(command) {
            Turn::Revealed(RevealOutcome::Safe) => {}
            Turn::Revealed(RevealOutcome::InvalidCoordinates) => println!(
                "Invalid coordinates! Rows and columns run from 0 to {}.",
                game.board().side() - 1
            ),
            Turn::Revealed(RevealOutcome::AlreadyRevealed) => println!("Tile already revealed!"),
            Turn::Revealed(RevealOutcome::ShieldAbsorbed) => {
                println!("Shield activated! You are safe this time.")
            }
            Turn::Revealed(RevealOutcome::HitMine) | Turn::Lost => {
                println!();
                show_board(&game.render_solution());
                println!();
                println!("You lost, you hit a mine!");
                return Ok(());
            }
            Turn::Won => {
                println!();
                show_board(&game.render());
                println!();
                println!("You've won!");
                return Ok(());
            }
            Turn::HintShown => println!("Hint: the mines are marked with M, this turn only."),
            Turn::HintUnavailable => println!("The hint was already used!"),
            Turn::ShieldArmed => println!("Shield armed! It will absorb the next mine."),
            Turn::ShieldUnavailable => println!("Shield already used or unavailable!"),
            Turn::GameOver => return Ok(()),
        }
    }
}

/// A line of player input.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
enum PlayerInput {
    Play(Command),
    Help,
    Quit,
}

/// Why a line of player input was rejected.
#[derive(Debug, Error, Clone, Eq, PartialEq)]
enum InputError {
    #[error("invalid command \"{0}\"")]
    Unrecognized(String),
    #[error("coordinate {0} is far too large")]
    CoordinateOverflow(String),
}

/// Parse one already lower-cased, trimmed line of input.
fn parse_input(input: &str) -> Result<PlayerInput, InputError> {
    /// Two integers separated by whitespace and/or a comma.
    static REVEAL: Lazy<Regex> = Lazy::new(|| {
        Regex::new(
            r"^(?x)(?:(?:reveal|open|r)\s+)?
        (?P<row>-?[0-9]+)(?:\s*,\s*|\s+)(?P<col>-?[0-9]+)$",
        )
        .unwrap()
    });

    match input {
        "?" | "help" => Ok(PlayerInput::Help),
        "q" | "quit" | "exit" => Ok(PlayerInput::Quit),
        "h" | "hint" => Ok(PlayerInput::Play(Command::Hint)),
        "s" | "shield" => Ok(PlayerInput::Play(Command::Shield)),
        other => match REVEAL.captures(other) {
            Some(captures) => {
                let coord = |name: &str| {
                    let text = &captures[name];
                    text.parse::<i64>()
                        .map_err(|_| InputError::CoordinateOverflow(text.to_owned()))
                };
                Ok(PlayerInput::Play(Command::Reveal {
                    row: coord("row")?,
                    col: coord("col")?,
                }))
            }
            None => Err(InputError::Unrecognized(other.to_owned())),
        },
    }
}

fn print_help() {
    println!(
        "Available Commands:
    <row> <col>     reveal the tile at the given row and column, e.g. \"3 4\" or \"3,4\".
    h, hint         show where the mines are for one turn. Can be used once per game.
    s, shield       arm the shield: the next mine you reveal does not end the game.
        The shield stays armed until it absorbs a mine and can absorb only one.
    ?, help         show this help.
    q, quit         leave the game.

Board:
    +   hidden tile
    1-8 number of mines touching the tile
    M   mine shown by a hint
    S   revealed mine"
    );
}

/// Print the counters above the board.
fn show_status(game: &Game) {
    let board = game.board();
    let shield = if game.shield_armed() {
        "armed"
    } else if board.shield_available() {
        "available"
    } else {
        "used"
    };
    let hint = if board.hint_available() {
        "available"
    } else {
        "used"
    };
    println!(
        "There are {} mines to be found! Safe tiles left: {}. Hint: {}. Shield: {}.",
        board.mine_count(),
        board.hidden_safe_count(),
        hint,
        shield
    );
}

/// Show the board by printing the grid with row and column numbers.
fn show_board(rendering: &Rendering) {
    let width = (rendering.side() - 1).to_string().len() + 1;
    print!("{:width$} ", "", width = width);
    for col in 0..rendering.side() {
        print!("{:^width$}", col, width = width + 1);
    }
    println!();
    for (row, cells) in rendering.rows().enumerate() {
        print!("{:>width$} ", row, width = width);
        for &cell in cells {
            print!("{:^width$}", CellGlyph(cell), width = width + 1);
        }
        println!();
    }
}

/// Display helper that prints the marker for a cell.
struct CellGlyph(CellView);

impl fmt::Display for CellGlyph {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self.0 {
            CellView::MineMarker => f.pad("M"),
            CellView::Exploded => f.pad("S"),
            CellView::Blank => f.pad(" "),
            CellView::Number(count) => {
                let digit = [b'0' + count];
                f.pad(std::str::from_utf8(&digit).unwrap_or("?"))
            }
            CellView::Hidden => f.pad("+"),
        }
    }
}

/// Helper to read input from the player.
struct InputReader<B> {
    read: B,
    buf: String,
}

impl<B> InputReader<B> {
    fn new(read: B) -> Self {
        Self {
            read,
            buf: String::new(),
        }
    }
}

impl<B: BufRead> InputReader<B> {
    /// Repeatedly tries to read input until the input checker returns `Some`. Converts
    /// to ascii lower before running the checker.
    fn read_input_lower<F, T>(&mut self, prompt: &str, mut checker: F) -> io::Result<T>
    where
        F: FnMut(&str) -> Option<T>,
    {
        loop {
            self.read_input_inner(prompt)?;
            self.buf.make_ascii_lowercase();
            if let Some(val) = checker(self.buf.trim()) {
                return Ok(val);
            }
        }
    }

    /// Repeatedly tries to read input until the input checker returns `Some`.
    fn read_input<F, T>(&mut self, prompt: &str, mut checker: F) -> io::Result<T>
    where
        F: FnMut(&str) -> Option<T>,
    {
        loop {
            self.read_input_inner(prompt)?;
            if let Some(val) = checker(self.buf.trim()) {
                return Ok(val);
            }
        }
    }

    /// Helper to print the prompt, clear the string buffer and read a line. Fails with
    /// [`io::ErrorKind::UnexpectedEof`] once the input is closed.
    fn read_input_inner(&mut self, prompt: &str) -> io::Result<()> {
        print!("{} ", prompt);
        io::stdout().flush()?;
        self.buf.clear();
        if self.read.read_line(&mut self.buf)? == 0 {
            return Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                "input closed",
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reveal(row: i64, col: i64) -> PlayerInput {
        PlayerInput::Play(Command::Reveal { row, col })
    }

    #[test]
    fn parses_coordinates() {
        assert_eq!(parse_input("1 2"), Ok(reveal(1, 2)));
        assert_eq!(parse_input("10,3"), Ok(reveal(10, 3)));
        assert_eq!(parse_input("4 , 5"), Ok(reveal(4, 5)));
        assert_eq!(parse_input("reveal 0 7"), Ok(reveal(0, 7)));
        assert_eq!(parse_input("-1 0"), Ok(reveal(-1, 0)));
    }

    #[test]
    fn parses_power_ups() {
        assert_eq!(parse_input("h"), Ok(PlayerInput::Play(Command::Hint)));
        assert_eq!(parse_input("hint"), Ok(PlayerInput::Play(Command::Hint)));
        assert_eq!(parse_input("s"), Ok(PlayerInput::Play(Command::Shield)));
        assert_eq!(parse_input("shield"), Ok(PlayerInput::Play(Command::Shield)));
        assert_eq!(parse_input("?"), Ok(PlayerInput::Help));
        assert_eq!(parse_input("quit"), Ok(PlayerInput::Quit));
    }

    #[test]
    fn rejects_malformed_input() {
        assert_eq!(
            parse_input("x"),
            Err(InputError::Unrecognized("x".to_owned()))
        );
        assert_eq!(
            parse_input("1"),
            Err(InputError::Unrecognized("1".to_owned()))
        );
        assert_eq!(
            parse_input("1 2 3"),
            Err(InputError::Unrecognized("1 2 3".to_owned()))
        );
        assert_eq!(
            parse_input("99999999999999999999 1"),
            Err(InputError::CoordinateOverflow(
                "99999999999999999999".to_owned()
            ))
        );
    }

    #[test]
    fn glyphs_match_markers() {
        assert_eq!(CellGlyph(CellView::Hidden).to_string(), "+");
        assert_eq!(CellGlyph(CellView::MineMarker).to_string(), "M");
        assert_eq!(CellGlyph(CellView::Exploded).to_string(), "S");
        assert_eq!(CellGlyph(CellView::Blank).to_string(), " ");
        assert_eq!(CellGlyph(CellView::Number(3)).to_string(), "3");
        assert_eq!(format!("{:^3}", CellGlyph(CellView::Number(8))), " 8 ");
    }

    #[test]
    fn input_reader_retries_until_accepted() {
        let mut input = InputReader::new(&b"nope\n  5 \n"[..]);
        let size = input
            .read_input("size?", |line| line.parse::<usize>().ok())
            .unwrap();
        assert_eq!(size, 5);
    }

    #[test]
    fn input_reader_reports_closed_input() {
        let mut input = InputReader::new(&b"nope\n"[..]);
        let err = input
            .read_input_lower("move?", |line| parse_input(line).ok())
            .unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::UnexpectedEof);
    }
}
