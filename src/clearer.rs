//! Removal of completed rows.
//!
//! Only rows written by the latest placement can have become full, so the
//! clearer checks just those. Removal unlinks the row in O(1); the column
//! height index is repaired by [`Grid::remove`].

use crate::grid::{Grid, RowId};

/// Removes every full row among `touched` (given bottom row first) and
/// returns how many were removed.
///
/// Rows are handled from the top down. A row that is no longer in the stack
/// is skipped, so running the check twice is harmless.
pub fn clear_full_rows(grid: &mut Grid, touched: &[RowId]) -> usize {
    let mut cleared = 0;
    for &row in touched.iter().rev() {
        if !grid.is_full(row) {
            continue;
        }
        if grid.remove(row) {
            cleared += 1;
            tracing::debug!(height = grid.height(), "row cleared");
        }
    }
    cleared
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::{COLUMNS, FULL_ROW};
    use crate::pieces::{Shape, I, Q};
    use crate::resolver::drop_shape;

    fn place(grid: &mut Grid, shape: &Shape, lane: usize) -> usize {
        let landing = drop_shape(grid, shape, lane).unwrap();
        let cleared = clear_full_rows(grid, &landing.rows);
        grid.check_invariants().unwrap();
        cleared
    }

    #[test]
    fn test_nothing_to_clear() {
        let mut grid = Grid::new();
        assert_eq!(place(&mut grid, &Q, 0), 0);
        assert_eq!(grid.height(), 2);
    }

    #[test]
    fn test_single_row_clear() {
        let mut grid = Grid::new();
        assert_eq!(place(&mut grid, &I, 0), 0);
        assert_eq!(place(&mut grid, &I, 4), 0);
        assert_eq!(place(&mut grid, &Q, 8), 1);
        assert_eq!(grid.height(), 1);
        let row = grid.rows_top_down().next().unwrap();
        assert_eq!(row.mask(), 0b11 << 8);
        assert_eq!(grid.surface(8), row.id());
        assert!(grid.surface(0).is_floor());
    }

    #[test]
    fn test_double_clear_from_one_piece() {
        let mut grid = Grid::new();
        for lane in [0, 2, 4, 6] {
            assert_eq!(place(&mut grid, &Q, lane), 0);
        }
        assert_eq!(place(&mut grid, &Q, 8), 2);
        assert!(grid.is_empty());
        for column in 0..COLUMNS {
            assert!(grid.surface(column).is_floor());
        }
    }

    #[test]
    fn test_clear_below_remaining_rows_collapses_stack() {
        let single = Shape::from_rows(&[0b1]);
        let domino = Shape::from_rows(&[0b11]);
        let bar = Shape::from_rows(&[0b111]);
        let mut grid = Grid::new();

        // row 0 holds everything but column 4
        place(&mut grid, &I, 0);
        place(&mut grid, &I, 5);
        place(&mut grid, &single, 9);
        // row 1 = {2,3,4,5}, row 2 = {4,5}
        place(&mut grid, &bar, 2);
        place(&mut grid, &single, 5);
        place(&mut grid, &domino, 4);
        assert_eq!(grid.height(), 3);
        let old_top = grid.top();

        place(&mut grid, &domino, 0);
        place(&mut grid, &domino, 6);
        assert_eq!(place(&mut grid, &domino, 8), 1);

        // row 2 now rests directly on row 0
        assert_eq!(grid.height(), 2);
        assert_eq!(grid.top(), old_top);
        assert_eq!(grid.surface(4), old_top);
        assert_eq!(grid.surface(5), old_top);
        let bottom = grid.below(old_top);
        assert_eq!(grid.surface(2), bottom);
        assert_eq!(grid.surface(9), bottom);
        assert!(grid.below(bottom).is_floor());
    }

    #[test]
    fn test_clear_is_idempotent() {
        let mut grid = Grid::new();
        place(&mut grid, &I, 0);
        place(&mut grid, &I, 4);
        let landing = drop_shape(&mut grid, &Q, 8).unwrap();
        assert_eq!(clear_full_rows(&mut grid, &landing.rows), 1);
        assert_eq!(clear_full_rows(&mut grid, &landing.rows), 0);
        assert_eq!(grid.height(), 1);
        grid.check_invariants().unwrap();
    }

    #[test]
    fn test_full_row_mask_matches_width() {
        assert_eq!(FULL_ROW.count_ones() as usize, COLUMNS);
    }
}
