//! This module holds the settings a game is created with and the errors that setting one up can
//! produce.
//!
//! Once a game runs there is nothing left that can fail, so these are the only errors the engine
//! ever reports.

/// This enum holds every way in which the settings or the starting grid of a game may be invalid.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum SetupError {
    /// The grid is larger than [`Config::MAX_GRID_SIZE`] cells per side.
    #[error("the grid holds at most {max} rows and columns, got {0}", max = Config::MAX_GRID_SIZE)]
    GridTooLarge(usize),
    /// The grid is smaller than two cells per side.
    #[error("the grid needs at least 2 rows and columns, got {0}")]
    GridTooSmall(usize),
    /// A cell holds something other than nothing or a power of two.
    #[error("{value} at row {row}, column {col} is neither empty nor a power of two")]
    InvalidTile {
        /// The zero-based column of the cell.
        col: usize,
        /// The zero-based row of the cell.
        row: usize,
        /// The value found in the cell.
        value: u64,
    },
    /// The tile that wins the game can't be built out of spawned tiles.
    #[error("the winning tile must be a power of two no smaller than 4, got {0}")]
    InvalidWinningValue(u64),
    /// One of the rows handed over doesn't match the number of rows.
    #[error("row {row} holds {len} cells but the grid is {size} cells wide")]
    NotSquare {
        /// The number of cells found in that row.
        len: usize,
        /// The zero-based index of the offending row.
        row: usize,
        /// The number of rows, and so the width each row should have.
        size: usize,
    },
}

/// The settings a game is played with.
///
/// The fields are only reachable through accessors so that a `Config` is valid by construction.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Config {
    /// The number of rows, which is also the number of columns.
    grid_size: usize,
    /// The tile value that counts as a win once it shows up on the grid.
    winning_value: u64,
}

impl Config {
    /// The side of the grid used when none is given.
    pub const DEFAULT_GRID_SIZE: usize = 4;
    /// The winning tile used when none is given.
    pub const DEFAULT_WINNING_VALUE: u64 = 2048;
    /// The largest number of rows, and of columns, a grid may have.
    pub const MAX_GRID_SIZE: usize = 16;

    /// Creates a new configuration after checking both settings.
    ///
    /// # Errors
    ///
    /// Fails with [`SetupError::GridTooSmall`] when `grid_size` is below 2, with
    /// [`SetupError::GridTooLarge`] when it is above [`Config::MAX_GRID_SIZE`], and with
    /// [`SetupError::InvalidWinningValue`] when `winning_value` is not a power of two or is smaller
    /// than 4.
    pub const fn new(grid_size: usize, winning_value: u64) -> Result<Self, SetupError> {
        if grid_size < 2 {
            return Err(SetupError::GridTooSmall(grid_size));
        }
        if grid_size > Self::MAX_GRID_SIZE {
            return Err(SetupError::GridTooLarge(grid_size));
        }
        if winning_value < 4 || !winning_value.is_power_of_two() {
            return Err(SetupError::InvalidWinningValue(winning_value));
        }

        Ok(Self {
            grid_size,
            winning_value,
        })
    }

    /// Returns the number of rows, which is also the number of columns.
    #[must_use]
    pub const fn grid_size(&self) -> usize {
        self.grid_size
    }

    /// Returns the tile value that wins the game.
    #[must_use]
    pub const fn winning_value(&self) -> u64 {
        self.winning_value
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            grid_size: Self::DEFAULT_GRID_SIZE,
            winning_value: Self::DEFAULT_WINNING_VALUE,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.grid_size(), 4);
        assert_eq!(config.winning_value(), 2048);
        assert_eq!(Config::new(4, 2048), Ok(config));
    }

    #[test]
    fn test_grid_too_small() {
        assert_eq!(Config::new(1, 2048), Err(SetupError::GridTooSmall(1)));
        assert_eq!(Config::new(0, 2048), Err(SetupError::GridTooSmall(0)));
        assert!(Config::new(2, 2048).is_ok());
    }

    #[test]
    fn test_grid_too_large() {
        assert!(Config::new(Config::MAX_GRID_SIZE, 2048).is_ok());
        assert_eq!(Config::new(17, 2048), Err(SetupError::GridTooLarge(17)));
        assert_eq!(
            Config::new(usize::MAX / 2, 2048),
            Err(SetupError::GridTooLarge(usize::MAX / 2))
        );
        assert_eq!(
            SetupError::GridTooLarge(17).to_string(),
            "the grid holds at most 16 rows and columns, got 17"
        );
    }

    #[test]
    fn test_invalid_winning_value() {
        for value in [0, 1, 2, 3, 6, 1000, 2047] {
            assert_eq!(
                Config::new(4, value),
                Err(SetupError::InvalidWinningValue(value)),
                "{value} should be rejected"
            );
        }
        for value in [4, 8, 64, 65_536] {
            assert!(Config::new(4, value).is_ok(), "{value} should be accepted");
        }
    }

    #[test]
    fn test_error_messages() {
        assert_eq!(
            SetupError::GridTooSmall(1).to_string(),
            "the grid needs at least 2 rows and columns, got 1"
        );
        assert_eq!(
            SetupError::InvalidWinningValue(100).to_string(),
            "the winning tile must be a power of two no smaller than 4, got 100"
        );
    }
}
