//! This module draws the game on the terminal: a header with the score, the session's best score
//! and the elapsed time, the board itself, a status line and, when asked for, the key bindings.
//!
//! Nothing in here touches the game; it only reads from it. A frame is drawn after every key, so
//! the clock shows the time of the last key press and stands still while the player thinks.

use std::time::Duration;

use anyhow::Result;
use console::{pad_str, style, Alignment, Color, Style, Term};

use crate::game::{Game, TerminalState};
use crate::grid::Position;

/// Background colours for the tiles, indexed by the exponent of their value. Tiles past the end of
/// the palette use its last colour.
const PALETTE: [u8; 12] = [237, 230, 223, 215, 209, 203, 197, 228, 227, 226, 220, 214];

/// The key bindings shown in the help panel.
const HELP: [&str; 5] = [
    "arrows, wasd or hjkl   slide the tiles",
    "r                      restart",
    "? or H                 hide this help",
    "q or esc               quit",
    "any other key          refresh the clock",
];

/// This structure links together everything a single frame needs to show.
#[derive(Clone, Copy, Debug)]
pub(crate) struct Scene<'game> {
    /// This field contains the best score of the session, kept in memory only.
    pub(crate) best: u64,
    /// This field contains the time spent on the current game, measured when the scene was built.
    /// It is not updated while the frame sits on screen.
    pub(crate) elapsed: Duration,
    /// This field contains the game being played.
    pub(crate) game: &'game Game,
    /// This field contains whether the key bindings should be listed under the board.
    pub(crate) show_help: bool,
}

/// This function draws a whole frame, centred on the terminal.
pub(crate) fn draw(term: &Term, scene: Scene) -> Result<()> {
    let (rows, cols) = term.size();
    let lines = compose(scene);
    let fill = usize::from(rows).saturating_sub(lines.len()) / 2;

    for _ in 0..fill {
        term.write_line("")?;
    }

    for line in &lines {
        let output = pad_str(line, usize::from(cols), Alignment::Center, None);
        term.write_line(&output)?;
    }

    Ok(())
}

/// This function builds every line of the frame, from the title down to the help panel.
fn compose(scene: Scene) -> Vec<String> {
    let game = scene.game;
    let config = game.config();
    let width = cell_width(game.highest_tile().max(config.winning_value()));
    let mut lines = vec![
        format!("{}", style(config.winning_value()).bold().cyan()),
        format!(
            "Score {}   Best {}   Time {}",
            style(game.score()).bold(),
            style(scene.best.max(game.score())).bold(),
            style(format_elapsed(scene.elapsed)).bold()
        ),
        String::new(),
    ];

    for (row, values) in game.grid_snapshot().iter().enumerate() {
        let cells: Vec<String> = values
            .iter()
            .enumerate()
            .map(|(col, value)| {
                let spawned = game.last_spawn() == Some(Position { col, row });
                render_tile(*value, width, spawned)
            })
            .collect();
        lines.push(cells.join(" "));
    }

    lines.push(String::new());
    lines.push(status(game));

    if scene.show_help {
        lines.push(String::new());
        lines.extend(HELP.iter().map(|line| format!("{}", style(line).dim())));
    } else {
        lines.push(format!("{}", style("press ? for help").dim()));
    }

    lines
}

/// This function returns the line shown under the board, which depends on how the game stands.
fn status(game: &Game) -> String {
    let target = game.config().winning_value();

    match game.classify() {
        TerminalState::Ongoing => String::new(),
        TerminalState::Won if game.is_over() => format!(
            "{}",
            style(format!("You reached {target}, but no moves are left")).bold().green()
        ),
        TerminalState::Won => format!(
            "{}",
            style(format!("You reached {target}! Keep going")).bold().green()
        ),
        TerminalState::Lost => format!("{}", style("No moves left").bold().red()),
    }
}

/// This function renders a tile centred in a cell `width` characters wide, coloured by its value.
fn render_tile(value: u64, width: usize, spawned: bool) -> String {
    let text = if value == 0 {
        String::from(".")
    } else {
        value.to_string()
    };
    let mut tile = tile_style(value);
    if spawned {
        tile = tile.underlined();
    }

    format!("{}", tile.apply_to(format!("{text:^width$}")))
}

/// This function picks the colours of a tile. Empty cells and the smallest tiles use dark text, the
/// rest use white text.
fn tile_style(value: u64) -> Style {
    let exponent = usize::try_from(value.trailing_zeros()).unwrap_or(usize::MAX);
    let index = if value == 0 { 0 } else { exponent };
    let background = PALETTE
        .get(index)
        .or_else(|| PALETTE.last())
        .copied()
        .unwrap_or(0);
    let foreground = if value <= 4 {
        Color::Color256(238)
    } else {
        Color::White
    };

    Style::new().bg(Color::Color256(background)).fg(foreground).bold()
}

/// This function returns the width of a cell able to hold `value` with a space on either side.
fn cell_width(value: u64) -> usize {
    value.to_string().len() + 2
}

/// This function formats the time spent on a game as `mm:ss`, or as `hh:mm:ss` past the first hour.
fn format_elapsed(elapsed: Duration) -> String {
    let total = elapsed.as_secs();
    let (hours, minutes, seconds) = (total / 3600, total % 3600 / 60, total % 60);

    if hours > 0 {
        format!("{hours:02}:{minutes:02}:{seconds:02}")
    } else {
        format!("{minutes:02}:{seconds:02}")
    }
}

#[cfg(test)]
mod tests {
    use fastrand::Rng;

    use super::*;
    use crate::grid::Grid;

    fn scene_game(rows: Vec<Vec<u64>>, winning_value: u64) -> Game {
        let grid = Grid::from_rows(rows).expect("test grids are valid");
        Game::from_grid(grid, winning_value, Rng::with_seed(3)).expect("valid winning value")
    }

    #[test]
    fn test_format_elapsed() {
        assert_eq!(format_elapsed(Duration::from_secs(0)), "00:00");
        assert_eq!(format_elapsed(Duration::from_secs(75)), "01:15");
        assert_eq!(format_elapsed(Duration::from_millis(3_599_999)), "59:59");
        assert_eq!(format_elapsed(Duration::from_secs(3600)), "01:00:00");
        assert_eq!(format_elapsed(Duration::from_secs(36_061)), "10:01:01");
    }

    #[test]
    fn test_cell_width() {
        assert_eq!(cell_width(2048), 6);
        assert_eq!(cell_width(8), 3);
        assert_eq!(cell_width(131_072), 8);
    }

    #[test]
    fn test_render_tile_is_centred() {
        let rendered = render_tile(16, 6, false);
        assert_eq!(console::strip_ansi_codes(&rendered), "  16  ");

        let empty = render_tile(0, 4, true);
        assert_eq!(console::strip_ansi_codes(&empty), " .  ");
    }

    #[test]
    fn test_compose_layout() {
        let game = scene_game(vec![vec![2, 0], vec![0, 4]], 2048);
        let lines: Vec<String> = compose(Scene {
            best: 100,
            elapsed: Duration::from_secs(5),
            game: &game,
            show_help: false,
        })
        .iter()
        .map(|line| console::strip_ansi_codes(line).into_owned())
        .collect();

        assert_eq!(lines.len(), 8);
        assert_eq!(lines.first().map(String::as_str), Some("2048"));
        assert_eq!(
            lines.get(1).map(String::as_str),
            Some("Score 0   Best 100   Time 00:05")
        );
        assert_eq!(lines.get(3).map(String::as_str), Some("  2      .   "));
        assert_eq!(lines.get(4).map(String::as_str), Some("  .      4   "));
        assert_eq!(lines.get(6).map(String::as_str), Some(""));
    }

    #[test]
    fn test_compose_with_help() {
        let game = scene_game(vec![vec![2, 0], vec![0, 4]], 2048);
        let scene = Scene {
            best: 0,
            elapsed: Duration::ZERO,
            game: &game,
            show_help: true,
        };
        let lines = compose(scene);
        assert_eq!(lines.len(), 7 + 1 + HELP.len());
        assert!(lines
            .iter()
            .any(|line| console::strip_ansi_codes(line).contains("refresh the clock")));
    }

    #[test]
    fn test_status_lines() {
        let lost = scene_game(vec![vec![2, 4], vec![4, 2]], 2048);
        assert_eq!(console::strip_ansi_codes(&status(&lost)), "No moves left");

        let won = scene_game(vec![vec![8, 0], vec![0, 0]], 8);
        assert_eq!(
            console::strip_ansi_codes(&status(&won)),
            "You reached 8! Keep going"
        );

        let won_and_stuck = scene_game(vec![vec![8, 4], vec![4, 2]], 8);
        assert_eq!(
            console::strip_ansi_codes(&status(&won_and_stuck)),
            "You reached 8, but no moves are left"
        );
    }
}
