//! This module contains everything related to taking input from the player. Keys are read straight
//! from the terminal through the `console` crate, without waiting for a newline, and turned into the
//! commands the game loop understands.

use anyhow::Result;
use console::{Key, Term};

use crate::grid::Direction;

/// This enum holds the commands the player can issue while a game is on screen.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Command {
    /// This variant is used when the tiles should slide in the given direction.
    Move(Direction),
    /// This variant is used when the key isn't bound to anything and the frame only needs to be
    /// drawn again.
    Pass,
    /// This variant is used when the player wants to leave the game.
    Quit,
    /// This variant is used when the player wants to throw the current game away.
    Restart,
    /// This variant is used to show or hide the panel listing the key bindings.
    ToggleHelp,
}

/// This function blocks until the player presses a key and returns the command bound to it.
pub(crate) fn read_command(term: &Term) -> Result<Command> {
    let key = term.read_key()?;

    Ok(command_for(&key))
}

/// This function maps a single key to its command. The arrow keys, WASD and the vi keys all move the
/// tiles.
fn command_for(key: &Key) -> Command {
    match *key {
        Key::ArrowUp | Key::Char('w' | 'W' | 'k') => Command::Move(Direction::Up),
        Key::ArrowDown | Key::Char('s' | 'S' | 'j') => Command::Move(Direction::Down),
        Key::ArrowLeft | Key::Char('a' | 'A' | 'h') => Command::Move(Direction::Left),
        Key::ArrowRight | Key::Char('d' | 'D' | 'l') => Command::Move(Direction::Right),
        Key::Char('r' | 'R') => Command::Restart,
        Key::Char('?' | 'H') => Command::ToggleHelp,
        Key::Escape | Key::Char('q' | 'Q') => Command::Quit,
        _ => Command::Pass,
    }
}
