//! The library components of the game. They hold the sliding-tile engine, which knows nothing about
//! terminals, and the terminal front-end that drives it.
//!
//! The engine starts at the game.rs file, which contains the state of a game and the order in which
//! a move resolves. The front-end starts at the app.rs file, which contains the main game loop.

#![expect(
    clippy::cargo_common_metadata,
    reason = "The package has not yet been pushed to a remote."
)]

mod app;
mod config;
mod frame;
mod game;
mod grid;
mod input;
mod line;

pub use app::init;
pub use config::{Config, SetupError};
pub use game::{Game, TerminalState};
pub use grid::{Direction, Grid, MoveResult, Position};
