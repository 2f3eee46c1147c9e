//! The game module contains the state of a single game: the grid, the score, and whether the game
//! has been won or lost.
//!
//! Every move goes through [`Game::apply_move()`], which slides the tiles, adds the merges to the
//! score, spawns a new tile and re-evaluates the terminal state, in that order. Randomness comes
//! from a generator owned by the game, which makes a game fully reproducible from its seed.

use fastrand::Rng;
use log::{debug, info};

use crate::config::{Config, SetupError};
use crate::grid::{Direction, Grid, MoveResult, Position};

/// Number of tiles placed on the grid when a game starts.
const STARTING_TILES: usize = 2;

/// This enum holds the classification of a game after its latest move.
#[expect(
    clippy::arbitrary_source_item_ordering,
    reason = "The variants follow the course of a game."
)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TerminalState {
    /// The winning tile hasn't shown up yet and there are moves left.
    Ongoing,
    /// The winning tile has shown up at some point. This never reverts until the game restarts.
    Won,
    /// The winning tile never showed up and no move can change the grid anymore.
    Lost,
}

/// The state of a game in progress.
#[derive(Debug)]
pub struct Game {
    /// The settings this game was created with; they survive restarts.
    config: Config,
    /// The grid the game is played on.
    grid: Grid,
    /// Whether the winning tile has ever been on the grid.
    has_won: bool,
    /// Whether the grid is full and no two adjacent tiles can merge.
    is_over: bool,
    /// The position of the most recently spawned tile.
    last_spawn: Option<Position>,
    /// The generator behind every spawned tile.
    rng: Rng,
    /// The sum of every merged tile since the game started.
    score: u64,
}

impl Game {
    /// Starts a new game seeded from the system's entropy.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self::with_rng(config, Rng::new())
    }

    /// Starts a new game whose tiles all come from the given seed.
    #[must_use]
    pub fn with_seed(config: Config, seed: u64) -> Self {
        Self::with_rng(config, Rng::with_seed(seed))
    }

    /// Starts a new game with two tiles spawned from `rng`.
    #[must_use]
    pub fn with_rng(config: Config, rng: Rng) -> Self {
        let mut game = Self {
            config,
            grid: Grid::empty(config.grid_size()),
            has_won: false,
            is_over: false,
            last_spawn: None,
            rng,
            score: 0,
        };
        game.seed_tiles();
        game
    }

    /// Resumes a game from an existing grid, with a score of zero.
    ///
    /// The terminal state is evaluated right away, so a grid that already holds `winning_value`
    /// counts as won and a stuck grid counts as lost.
    ///
    /// # Errors
    ///
    /// Fails with [`SetupError::InvalidWinningValue`] when `winning_value` is not a power of two of
    /// at least 4, and with [`SetupError::GridTooLarge`] when the grid has more rows than
    /// [`Config::MAX_GRID_SIZE`].
    pub fn from_grid(grid: Grid, winning_value: u64, rng: Rng) -> Result<Self, SetupError> {
        let config = Config::new(grid.size(), winning_value)?;
        let mut game = Self {
            config,
            grid,
            has_won: false,
            is_over: false,
            last_spawn: None,
            rng,
            score: 0,
        };
        game.evaluate();
        Ok(game)
    }

    /// Slides the tiles in `direction`.
    ///
    /// If the grid changed, the merges are added to the score, a new tile is spawned and the
    /// terminal state is evaluated again. A move that changes nothing leaves the whole game as it
    /// was.
    pub fn apply_move(&mut self, direction: Direction) -> MoveResult {
        let result = self.grid.apply_move(direction);
        if !result.changed {
            debug!("moving {direction} left the grid unchanged");
            return result;
        }

        self.score = self.score.saturating_add(result.score_delta);
        debug!(
            "moved {direction}: +{} points, score {}",
            result.score_delta, self.score
        );

        self.last_spawn = self.grid.spawn_random_tile(&mut self.rng);
        self.evaluate();

        result
    }

    /// Spawns a tile on a random empty cell and evaluates the terminal state again.
    ///
    /// Moves already spawn their own tile, so this is only meant for collaborators that drive the
    /// spawning themselves. Returns `None` when the grid is full.
    pub fn spawn_random_tile(&mut self) -> Option<Position> {
        let position = self.grid.spawn_random_tile(&mut self.rng);
        if position.is_some() {
            self.last_spawn = position;
            self.evaluate();
        }
        position
    }

    /// Classifies the game. A game that has ever been won stays won, even if the grid gets stuck
    /// afterwards; use [`Game::is_over()`] to know whether any move is left.
    #[must_use]
    pub const fn classify(&self) -> TerminalState {
        if self.has_won {
            TerminalState::Won
        } else if self.is_over {
            TerminalState::Lost
        } else {
            TerminalState::Ongoing
        }
    }

    /// Throws the current game away and starts a new one with the same settings. The generator
    /// keeps going from where it was, so the new game deals different tiles.
    pub fn restart(&mut self) {
        info!("restarting after scoring {}", self.score);
        self.grid = Grid::empty(self.config.grid_size());
        self.score = 0;
        self.has_won = false;
        self.is_over = false;
        self.last_spawn = None;
        self.seed_tiles();
    }

    /// Returns the settings this game runs with.
    #[must_use]
    pub const fn config(&self) -> Config {
        self.config
    }

    /// Returns the grid.
    #[must_use]
    pub const fn grid(&self) -> &Grid {
        &self.grid
    }

    /// Returns a copy of the grid values, row by row.
    #[must_use]
    pub fn grid_snapshot(&self) -> Vec<Vec<u64>> {
        self.grid.rows()
    }

    /// Returns the score accumulated since the game started.
    #[must_use]
    pub const fn score(&self) -> u64 {
        self.score
    }

    /// Returns the largest tile on the grid.
    #[must_use]
    pub fn highest_tile(&self) -> u64 {
        self.grid.highest_tile()
    }

    /// Returns whether the winning tile has ever been on the grid.
    #[must_use]
    pub const fn has_won(&self) -> bool {
        self.has_won
    }

    /// Returns whether no move can change the grid anymore.
    #[must_use]
    pub const fn is_over(&self) -> bool {
        self.is_over
    }

    /// Returns where the most recent tile was spawned, if any was spawned since the game started.
    #[must_use]
    pub const fn last_spawn(&self) -> Option<Position> {
        self.last_spawn
    }

    /// Places the starting tiles on an empty grid.
    fn seed_tiles(&mut self) {
        for _ in 0..STARTING_TILES {
            self.last_spawn = self.grid.spawn_random_tile(&mut self.rng);
        }
        self.evaluate();
        info!(
            "new {size}x{size} game aiming for {}: {}",
            self.config.winning_value(),
            self.grid,
            size = self.config.grid_size()
        );
    }

    /// Updates the win and loss flags from the current grid.
    fn evaluate(&mut self) {
        if !self.has_won && self.grid.contains(self.config.winning_value()) {
            self.has_won = true;
            info!(
                "reached {} with a score of {}",
                self.config.winning_value(),
                self.score
            );
        }

        let was_over = self.is_over;
        self.is_over = self.grid.is_stuck();
        if self.is_over && !was_over {
            info!("no moves left, final score {}", self.score);
        }
    }
}
