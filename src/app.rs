//! The app module wires the terminal to the engine. It parses the command line, sets up logging,
//! and runs the loop that reads a key, applies the matching command to the game and draws the next
//! frame.
//!
//! The best score and the clock live here rather than in the game, since they span several games
//! and nothing about them affects how tiles move. The loop blocks on the next key, so the clock on
//! screen only moves forward when a key is pressed; any unbound key redraws it.

use std::time::Instant;

use anyhow::Result;
use clap::Parser;
use console::Term;
use dialoguer::theme::ColorfulTheme;
use dialoguer::Confirm;
use env_logger::Env;
use fastrand::Rng;
use log::info;

use crate::config::Config;
use crate::frame::{self, Scene};
use crate::game::Game;
use crate::input::{read_command, Command};

/// This struct holds the command-line arguments, parsed through clap's derive attributes.
#[derive(Parser)]
#[command(name = "tiles2048", version, about)]
#[command(next_line_help = true)]
struct Cli {
    /// The seed for the tiles that show up, for a game that can be played again move by move.
    ///
    /// Every game gets a fresh seed from the system when this is not set.
    #[arg(long, env = "TILES2048_SEED", value_name = "SEED")]
    seed: Option<u64>,
    /// The number of rows and columns of the board.
    #[arg(short, long, default_value_t = 4, value_parser = clap::value_parser!(u8).range(2..=8))]
    #[arg(env = "TILES2048_SIZE", value_name = "N")]
    size: u8,
    /// Ends the game as soon as the winning tile shows up instead of playing on until no move is
    /// left.
    #[arg(long)]
    stop_on_win: bool,
    /// The tile that wins the game; must be a power of two no smaller than 4.
    #[arg(short, long, default_value_t = Config::DEFAULT_WINNING_VALUE)]
    #[arg(env = "TILES2048_TARGET", value_name = "VALUE")]
    target: u64,
}

/// This structure holds what the terminal session keeps track of across games.
#[derive(Debug)]
struct Session {
    /// This field contains the best score reached during this session.
    best: u64,
    /// This field contains the game being played.
    game: Game,
    /// This field contains whether the key bindings are listed under the board.
    show_help: bool,
    /// This field contains the moment the current game started.
    started: Instant,
    /// This field contains whether reaching the winning tile ends the game.
    stop_on_win: bool,
}

impl Session {
    /// This function starts a session around a freshly seeded game.
    fn new(game: Game, stop_on_win: bool) -> Self {
        Self {
            best: 0,
            game,
            show_help: false,
            started: Instant::now(),
            stop_on_win,
        }
    }

    /// This function returns what the next frame should show.
    fn scene(&self) -> Scene<'_> {
        Scene {
            best: self.best,
            elapsed: self.started.elapsed(),
            game: &self.game,
            show_help: self.show_help,
        }
    }

    /// This function keeps the best score up to date with the game's score.
    fn record_score(&mut self) {
        self.best = self.best.max(self.game.score());
    }

    /// This function returns whether the game has come to an end and input should stop going to it.
    const fn is_finished(&self) -> bool {
        self.game.is_over() || (self.stop_on_win && self.game.has_won())
    }

    /// This function throws the current game away, and resets the clock along with it.
    fn restart(&mut self) {
        self.record_score();
        self.game.restart();
        self.started = Instant::now();
    }
}

/// Initializes the game state and runs the game loop until the player quits. This is the `main()`
/// function of sorts of the binary.
///
/// # Errors
///
/// The function may return any one of the following errors:
///
/// - `tiles2048::SetupError`, when the board size or the winning tile are invalid
/// - `io::Error`, when the terminal can't be read from or written to
/// - `dialoguer::Error`, when the prompt to play again fails
pub fn init() -> Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();
    let config = Config::new(usize::from(cli.size), cli.target)?;
    let rng = cli.seed.map_or_else(Rng::new, Rng::with_seed);
    let term = Term::stdout();
    let mut session = Session::new(Game::with_rng(config, rng), cli.stop_on_win);

    info!(
        "starting a {size}x{size} board aiming for {}",
        config.winning_value(),
        size = config.grid_size()
    );

    term.set_title("tiles2048");
    term.hide_cursor()?;
    let outcome = run(&term, &mut session);
    term.show_cursor()?;

    info!("leaving with a best score of {}", session.best);
    outcome
}

/// This function runs the game loop proper: draw, check whether the game is still on, read a
/// command, apply it.
///
/// The end of the game is checked right after drawing rather than after a move, so that a game
/// which starts or restarts already finished asks to play again instead of waiting for a key.
fn run(term: &Term, session: &mut Session) -> Result<()> {
    loop {
        term.clear_screen()?;
        frame::draw(term, session.scene())?;

        if session.is_finished() {
            session.record_score();
            if !play_again(term)? {
                break Ok(());
            }
            session.restart();
            continue;
        }

        match read_command(term)? {
            Command::Quit => break Ok(()),
            Command::Restart => session.restart(),
            Command::ToggleHelp => session.show_help = !session.show_help,
            Command::Pass => {}
            Command::Move(direction) => {
                if session.game.apply_move(direction).changed {
                    session.record_score();
                }
            }
        }
    }
}

/// This function asks the player whether to start another game once the current one has ended.
fn play_again(term: &Term) -> Result<bool> {
    term.show_cursor()?;
    let answer = Confirm::with_theme(&ColorfulTheme::default())
        .with_prompt("Play again?")
        .default(true)
        .interact_on(term)?;
    term.hide_cursor()?;

    Ok(answer)
}

#[cfg(test)]
mod tests {
    use std::thread;
    use std::time::Duration;

    use super::*;
    use crate::grid::{Direction, Grid};

    fn session(rows: Vec<Vec<u64>>, winning_value: u64, stop_on_win: bool) -> Session {
        let grid = Grid::from_rows(rows).expect("test grids are valid");
        let game =
            Game::from_grid(grid, winning_value, Rng::with_seed(11)).expect("valid winning value");
        Session::new(game, stop_on_win)
    }

    #[test]
    fn test_cli_defaults() {
        let cli = Cli::try_parse_from(["tiles2048"]).expect("no arguments are required");
        assert_eq!(cli.size, 4);
        assert_eq!(cli.target, 2048);
        assert_eq!(cli.seed, None);
        assert!(!cli.stop_on_win);
    }

    #[test]
    fn test_cli_arguments() {
        let cli = Cli::try_parse_from([
            "tiles2048",
            "--size",
            "5",
            "-t",
            "4096",
            "--seed",
            "9",
            "--stop-on-win",
        ])
        .expect("valid arguments");
        assert_eq!(cli.size, 5);
        assert_eq!(cli.target, 4096);
        assert_eq!(cli.seed, Some(9));
        assert!(cli.stop_on_win);
    }

    #[test]
    fn test_cli_rejects_out_of_range_size() {
        assert!(Cli::try_parse_from(["tiles2048", "--size", "1"]).is_err());
        assert!(Cli::try_parse_from(["tiles2048", "--size", "9"]).is_err());
    }

    #[test]
    fn test_session_tracks_best_score() {
        let mut session = session(vec![vec![2, 2, 0], vec![0; 3], vec![0; 3]], 2048, false);
        assert!(session.game.apply_move(Direction::Left).changed);
        session.record_score();
        assert_eq!(session.best, 4);

        session.restart();
        assert_eq!(session.game.score(), 0);
        assert_eq!(session.best, 4);
    }

    #[test]
    fn test_session_finishes_on_loss() {
        let session = session(vec![vec![2, 4], vec![4, 2]], 2048, false);
        assert!(session.is_finished());
    }

    #[test]
    fn test_session_finishes_on_win_only_when_asked() {
        let playing_on = session(vec![vec![8, 0], vec![0, 0]], 8, false);
        assert!(!playing_on.is_finished());

        let stopping = session(vec![vec![8, 0], vec![0, 0]], 8, true);
        assert!(stopping.is_finished());
    }

    #[test]
    fn test_session_finished_from_the_start() {
        let config = Config::new(2, 4).expect("valid config");
        let seed = (0..1000)
            .find(|seed| Game::with_seed(config, *seed).has_won())
            .expect("some seed spawns a 4 right away");

        let stopping = Session::new(Game::with_seed(config, seed), true);
        assert!(stopping.is_finished());

        let mut restarted = session(vec![vec![4, 0], vec![0, 0]], 4, true);
        assert!(restarted.is_finished());
        restarted.restart();
        assert_eq!(restarted.game.score(), 0);
        assert_eq!(restarted.is_finished(), restarted.game.has_won());
    }

    #[test]
    fn test_scene_clock_is_read_when_drawn() {
        let session = session(vec![vec![2, 0], vec![0, 0]], 2048, false);
        let first = session.scene().elapsed;
        thread::sleep(Duration::from_millis(5));
        assert!(session.scene().elapsed > first);
    }
}
