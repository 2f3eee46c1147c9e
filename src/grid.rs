//! This module contains the grid the game is played on, along with the directions a move can take
//! and the operations that only depend on the cells themselves: applying a move to every line,
//! spawning a tile and telling whether any move is left.

use std::fmt;

use fastrand::Rng;
use log::trace;

use crate::config::{Config, SetupError};
use crate::line;

/// Chance out of ten that a spawned tile is a 4 instead of a 2.
const FOUR_CHANCE_IN_TEN: u8 = 1;

/// One of the four directions in which the tiles can be slid.
#[expect(
    clippy::arbitrary_source_item_ordering,
    reason = "Directions read best paired by axis."
)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Direction {
    /// Slides every column toward the top row.
    Up,
    /// Slides every column toward the bottom row.
    Down,
    /// Slides every row toward the leftmost column.
    Left,
    /// Slides every row toward the rightmost column.
    Right,
}

impl Direction {
    /// All four directions, in no meaningful order.
    pub const ALL: [Self; 4] = [Self::Up, Self::Down, Self::Left, Self::Right];

    /// Returns whether the lines this direction slides are rows or columns.
    const fn axis(self) -> Axis {
        match self {
            Self::Up | Self::Down => Axis::Column,
            Self::Left | Self::Right => Axis::Row,
        }
    }

    /// Returns whether a line has to be read back to front so that its leading edge sits at index
    /// `0`.
    const fn is_reversed(self) -> bool {
        matches!(self, Self::Down | Self::Right)
    }
}

impl fmt::Display for Direction {
    #[expect(
        clippy::renamed_function_params,
        reason = "The formatter reads better under its full name."
    )]
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match *self {
            Self::Up => "up",
            Self::Down => "down",
            Self::Left => "left",
            Self::Right => "right",
        };
        formatter.write_str(name)
    }
}

/// The kind of line a direction operates on.
#[derive(Clone, Copy)]
enum Axis {
    /// The direction slides each column of the grid.
    Column,
    /// The direction slides each row of the grid.
    Row,
}

/// A cell position on the grid, counted from the top left corner.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Position {
    /// The zero-based column of the cell.
    pub col: usize,
    /// The zero-based row of the cell.
    pub row: usize,
}

/// The outcome of sliding the whole grid in one direction.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct MoveResult {
    /// Whether any cell holds a different value than before the move.
    pub changed: bool,
    /// The sum of the values of every tile created by a merge during the move.
    pub score_delta: u64,
}

/// A square grid of cells, each of them either empty (`0`) or holding a power of two no smaller
/// than `2`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Grid {
    /// The cell values in row-major order.
    cells: Vec<u64>,
    /// The number of rows, which is also the number of columns.
    size: usize,
}

impl Grid {
    /// Creates a grid with every cell empty.
    pub(crate) fn empty(size: usize) -> Self {
        Self {
            cells: vec![0; size * size],
            size,
        }
    }

    /// Builds a grid out of its rows.
    ///
    /// # Errors
    ///
    /// Fails with [`SetupError::GridTooSmall`] when there are fewer than two rows, with
    /// [`SetupError::GridTooLarge`] when there are more than [`Config::MAX_GRID_SIZE`], with
    /// [`SetupError::NotSquare`] when a row doesn't have as many cells as there are rows and with
    /// [`SetupError::InvalidTile`] when a cell is neither `0` nor a power of two of at least `2`.
    pub fn from_rows(rows: Vec<Vec<u64>>) -> Result<Self, SetupError> {
        let size = rows.len();
        if size < 2 {
            return Err(SetupError::GridTooSmall(size));
        }
        if size > Config::MAX_GRID_SIZE {
            return Err(SetupError::GridTooLarge(size));
        }

        let mut cells = Vec::with_capacity(size * size);
        for (row, values) in rows.into_iter().enumerate() {
            if values.len() != size {
                return Err(SetupError::NotSquare {
                    len: values.len(),
                    row,
                    size,
                });
            }
            if let Some((col, value)) = values
                .iter()
                .copied()
                .enumerate()
                .find(|&(_, value)| !is_tile_value(value))
            {
                return Err(SetupError::InvalidTile { col, row, value });
            }
            cells.extend(values);
        }

        Ok(Self { cells, size })
    }

    /// Returns the number of rows, which is also the number of columns.
    #[must_use]
    pub const fn size(&self) -> usize {
        self.size
    }

    /// Returns the value at the given position, or `None` if it falls outside the grid.
    #[must_use]
    pub fn get(&self, position: Position) -> Option<u64> {
        self.index(position)
            .and_then(|index| self.cells.get(index).copied())
    }

    /// Returns a copy of the grid as a list of rows.
    #[must_use]
    pub fn rows(&self) -> Vec<Vec<u64>> {
        self.cells
            .chunks(self.size)
            .map(<[u64]>::to_vec)
            .collect()
    }

    /// Returns the positions of all the empty cells, row by row.
    #[must_use]
    pub fn empty_positions(&self) -> Vec<Position> {
        self.cells
            .iter()
            .enumerate()
            .filter(|&(_, value)| *value == 0)
            .map(|(index, _)| self.position(index))
            .collect()
    }

    /// Returns the number of cells holding a tile.
    #[must_use]
    pub fn occupied(&self) -> usize {
        self.cells.iter().filter(|value| **value != 0).count()
    }

    /// Returns the largest value on the grid, `0` when it is empty.
    #[must_use]
    pub fn highest_tile(&self) -> u64 {
        self.cells.iter().copied().max().unwrap_or(0)
    }

    /// Returns whether any cell holds exactly `value`.
    #[must_use]
    pub fn contains(&self, value: u64) -> bool {
        self.cells.contains(&value)
    }

    /// Returns whether two horizontally or vertically adjacent cells share the same non-zero value
    /// that can still be doubled.
    #[must_use]
    pub fn has_adjacent_pair(&self) -> bool {
        self.cells.chunks(self.size).any(|row| {
            row.windows(2)
                .any(|pair| matches!(*pair, [left, right] if left == right && line::can_merge(left)))
        }) || self
            .cells
            .iter()
            .zip(self.cells.iter().skip(self.size))
            .any(|(above, below)| above == below && line::can_merge(*above))
    }

    /// Returns whether no move can change the grid anymore: no cell is empty and no two adjacent
    /// cells can merge.
    #[must_use]
    pub fn is_stuck(&self) -> bool {
        !self.cells.contains(&0) && !self.has_adjacent_pair()
    }

    /// Slides every line of the grid in `direction`, merging equal tiles along the way.
    ///
    /// Each line is read so that its leading edge comes first, resolved on its own and written back
    /// in the same order. The grid is left untouched when no line changes.
    pub fn apply_move(&mut self, direction: Direction) -> MoveResult {
        let mut result = MoveResult::default();

        for line in 0..self.size {
            let indices = self.line_indices(direction, line);
            let values: Vec<u64> = indices
                .iter()
                .filter_map(|index| self.cells.get(*index).copied())
                .collect();
            let resolved = line::resolve(&values);
            result.score_delta = result.score_delta.saturating_add(resolved.score_delta);

            for (index, value) in indices.into_iter().zip(resolved.cells) {
                if let Some(cell) = self.cells.get_mut(index) {
                    if *cell != value {
                        *cell = value;
                        result.changed = true;
                    }
                }
            }
        }

        self.debug_check();
        result
    }

    /// Places a 2 (nine times out of ten) or a 4 on an empty cell picked uniformly at random.
    ///
    /// Returns the position the tile landed on, or `None` if there was no empty cell left, in which
    /// case the grid is not modified.
    pub fn spawn_random_tile(&mut self, rng: &mut Rng) -> Option<Position> {
        let empty = self.empty_positions();
        if empty.is_empty() {
            return None;
        }

        let position = empty.get(rng.usize(..empty.len())).copied()?;
        let value = if rng.u8(..10) < FOUR_CHANCE_IN_TEN { 4 } else { 2 };
        let cell = self.index(position).and_then(|index| self.cells.get_mut(index))?;
        *cell = value;
        trace!("spawned a {value} at {position:?}");

        Some(position)
    }

    /// Returns the flat indices of the cells in the `line`-th row or column touched by a move in
    /// `direction`, leading edge first.
    fn line_indices(&self, direction: Direction, line: usize) -> Vec<usize> {
        let size = self.size;
        let indices = (0..size).map(|step| match direction.axis() {
            Axis::Row => line * size + step,
            Axis::Column => step * size + line,
        });

        if direction.is_reversed() {
            indices.rev().collect()
        } else {
            indices.collect()
        }
    }

    /// Converts a position into a flat index, if it falls inside the grid.
    const fn index(&self, position: Position) -> Option<usize> {
        if position.row < self.size && position.col < self.size {
            Some(position.row * self.size + position.col)
        } else {
            None
        }
    }

    /// Converts a flat index back into a position.
    const fn position(&self, index: usize) -> Position {
        Position {
            col: index % self.size,
            row: index / self.size,
        }
    }

    /// Asserts, in debug builds, that every cell holds a valid value.
    fn debug_check(&self) {
        debug_assert!(
            self.cells.iter().all(|value| is_tile_value(*value)),
            "the grid holds a value that is neither empty nor a power of two: {self}"
        );
    }
}

impl fmt::Display for Grid {
    #[expect(
        clippy::renamed_function_params,
        reason = "The formatter reads better under its full name."
    )]
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (number, row) in self.cells.chunks(self.size).enumerate() {
            if number > 0 {
                formatter.write_str(" / ")?;
            }
            for (col, value) in row.iter().enumerate() {
                if col > 0 {
                    formatter.write_str(" ")?;
                }
                write!(formatter, "{value}")?;
            }
        }
        Ok(())
    }
}

/// Returns whether `value` may sit in a cell: either `0` or a power of two no smaller than `2`.
pub(crate) const fn is_tile_value(value: u64) -> bool {
    value == 0 || (value >= 2 && value.is_power_of_two())
}
