//! This module contains the line resolution algorithm, which is the one piece of the game every
//! move is built on top of.
//!
//! A line is either a row or a column of the grid, read in the order in which its tiles slide.
//! Resolving it means compacting the tiles toward index `0` and then merging equal neighbours in a
//! single left-to-right sweep.

/// This structure holds the result of resolving a single line.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct Resolved {
    /// This field contains the cells of the line after sliding and merging. It always has the same
    /// length as the line that was resolved.
    pub(crate) cells: Vec<u64>,
    /// This field contains the sum of the values of every tile created by a merge in this line.
    pub(crate) score_delta: u64,
}

/// Resolves a line of cells sliding toward index `0`.
///
/// Non-zero values are compacted first, keeping their relative order. The compacted tiles are then
/// paired greedily from the front: a tile merges with the one right behind it if both share a
/// value, and the resulting tile is not considered again during the same sweep. This means
/// `[2, 2, 2, 2]` resolves to `[4, 4, 0, 0]` and never to `[8, 0, 0, 0]`.
pub(crate) fn resolve(line: &[u64]) -> Resolved {
    let mut tiles = line.iter().copied().filter(|value| *value != 0).peekable();
    let mut cells = Vec::with_capacity(line.len());
    let mut score_delta = 0_u64;

    while let Some(value) = tiles.next() {
        let merged = value
            .checked_mul(2)
            .filter(|_| tiles.next_if_eq(&value).is_some());
        if let Some(merged) = merged {
            score_delta = score_delta.saturating_add(merged);
            cells.push(merged);
        } else {
            cells.push(value);
        }
    }
    cells.resize(line.len(), 0);

    Resolved { cells, score_delta }
}

/// Returns whether two tiles holding `value` may merge. The largest power of two a `u64` holds has
/// no double, so those tiles stay where they are.
pub(crate) const fn can_merge(value: u64) -> bool {
    value != 0 && value.checked_mul(2).is_some()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn check(line: &[u64], cells: &[u64], score_delta: u64) {
        let resolved = resolve(line);
        assert_eq!(resolved.cells, cells, "unexpected cells for {line:?}");
        assert_eq!(resolved.score_delta, score_delta, "unexpected score for {line:?}");
    }

    #[test]
    fn test_resolve_empty_line() {
        check(&[0, 0, 0, 0], &[0, 0, 0, 0], 0);
    }

    #[test]
    fn test_resolve_chain_merges_pairwise() {
        check(&[2, 2, 2, 2], &[4, 4, 0, 0], 8);
    }

    #[test]
    fn test_resolve_compacts_before_merging() {
        check(&[2, 0, 2, 4], &[4, 4, 0, 0], 4);
    }

    #[test]
    fn test_resolve_three_in_a_row_merges_leading_pair() {
        check(&[2, 2, 2, 0], &[4, 2, 0, 0], 4);
        check(&[0, 4, 4, 4], &[8, 4, 0, 0], 8);
    }

    #[test]
    fn test_resolve_new_tile_does_not_merge_again() {
        check(&[4, 4, 8, 0], &[8, 8, 0, 0], 8);
        check(&[2, 2, 4, 8], &[4, 4, 8, 0], 4);
    }

    #[test]
    fn test_resolve_two_pairs() {
        check(&[2, 2, 4, 4], &[4, 8, 0, 0], 12);
        check(&[8, 8, 8, 8], &[16, 16, 0, 0], 32);
    }

    #[test]
    fn test_resolve_gap_between_equal_tiles() {
        check(&[2, 0, 0, 2], &[4, 0, 0, 0], 4);
        check(&[0, 0, 0, 2], &[2, 0, 0, 0], 0);
    }

    #[test]
    fn test_resolve_settled_line_is_unchanged() {
        for line in [[2, 4, 8, 16], [2, 4, 2, 4], [4, 2, 0, 0], [1024, 0, 0, 0]] {
            check(&line, &line, 0);
        }
    }

    #[test]
    fn test_resolve_never_overflows() {
        const TOP: u64 = 1 << 63;
        check(&[TOP, TOP, 0, 0], &[TOP, TOP, 0, 0], 0);
        check(&[0, TOP, 0, TOP], &[TOP, TOP, 0, 0], 0);
        check(&[TOP / 2, TOP / 2, TOP, 0], &[TOP, TOP, 0, 0], TOP);
        assert!(!can_merge(TOP));
        assert!(can_merge(TOP / 2));
        assert!(!can_merge(0));
    }

    #[test]
    fn test_resolve_keeps_line_length() {
        check(&[2, 2], &[4, 0], 4);
        check(&[2, 0, 2, 0, 2, 0, 2, 0, 2], &[4, 4, 2, 0, 0, 0, 0, 0, 0], 8);
    }
}
