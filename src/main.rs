//! # tiles2048
//!
//! This crate is the sliding-tile game in which equal tiles merge into their sum, played on the
//! terminal until the board fills up. Reaching the winning tile, 2048 by default, is celebrated but
//! doesn't end the game unless asked to.
//!
//! The game logic itself lives in the library crate and never touches the terminal, so it can be
//! driven by any other front-end. This binary only starts the terminal one.

#![expect(
    unused_crate_dependencies,
    reason = "The dependencies are used in the library crate."
)]

use anyhow::Result;
use tiles2048::init;

fn main() -> Result<()> {
    init()
}
