//! Shape normalization utilities.
//!
//! Custom pieces can be described as a loose list of cells anywhere in the
//! plane. Before a shape can be dropped it is translated so its lowest row
//! and leftmost column sit at the origin, then folded into one column mask
//! per row.

use crate::error::{Error, Result};
use crate::pieces::MAX_PIECE_SIZE;

/// A cell position as `(row, column)`. Rows grow upward.
pub type Coord = (i32, i32);

/// Translates cells so the minimum row and column are both zero.
///
/// Duplicate cells are removed. Returns `None` for an empty cell list.
pub fn normalize_to_origin(mut cells: Vec<Coord>) -> Option<Vec<Coord>> {
    let min_row = cells.iter().map(|&(row, _)| row).min()?;
    let min_column = cells.iter().map(|&(_, column)| column).min()?;

    for (row, column) in &mut cells {
        *row -= min_row;
        *column -= min_column;
    }

    cells.sort_unstable();
    cells.dedup();
    Some(cells)
}

/// Folds normalized cells into per-row column masks, bottom row first.
///
/// Returns the masks together with the number of rows used.
pub fn row_masks(cells: &[Coord]) -> Result<([u8; MAX_PIECE_SIZE], usize)> {
    let mut masks = [0u8; MAX_PIECE_SIZE];
    let mut height = 0;

    for &(row, column) in cells {
        let (Ok(row), Ok(column)) = (usize::try_from(row), usize::try_from(column)) else {
            return Err(Error::InvalidShape {
                reason: "cells must be normalized before folding",
            });
        };
        if row >= MAX_PIECE_SIZE || column >= MAX_PIECE_SIZE {
            return Err(Error::InvalidShape {
                reason: "shape spans more than 4 rows or columns",
            });
        }
        masks[row] |= 1 << column;
        height = height.max(row + 1);
    }

    // an empty row inside the piece would be pushed onto the stack and
    // never clear
    if masks[..height].contains(&0) {
        return Err(Error::InvalidShape {
            reason: "shape has an empty row between occupied rows",
        });
    }

    Ok((masks, height))
}
