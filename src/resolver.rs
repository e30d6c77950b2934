//! Collision resolution for a vertical drop.
//!
//! A piece falls until one of its columns lands on that column's surface.
//! For column `c` with lowest piece cell at offset `base(c)`, the piece base
//! can rest no lower than `surface(c) + 1 - base(c)`; the binding column is
//! the one where that bound is largest.
//!
//! Rows have no stored positions, so bounds are compared relative to the
//! highest surface row among the piece's columns. A surface row more than
//! `MAX_PIECE_SIZE - 1` rows below that one can never bind, which keeps the
//! downward walk to at most four rows.

use arrayvec::ArrayVec;

use crate::error::{Error, Result};
use crate::grid::{Grid, RowId, COLUMNS};
use crate::pieces::{Shape, MAX_PIECE_SIZE};

/// Rows written by one placement, bottom row first.
pub type TouchedRows = ArrayVec<RowId, MAX_PIECE_SIZE>;

/// Where a dropped piece came to rest.
#[derive(Clone, Debug)]
pub struct Landing {
    /// Rows holding the piece's cells, bottom row first.
    pub rows: TouchedRows,
    /// Grid column whose stack stopped the piece.
    pub binding_column: usize,
}

/// Rejects lanes that would push the piece past the right edge.
pub fn check_lane(shape: &Shape, lane: usize) -> Result<()> {
    match lane.checked_add(shape.width()) {
        Some(end) if end <= COLUMNS => Ok(()),
        _ => Err(Error::LaneOutOfRange {
            lane,
            width: shape.width(),
            columns: COLUMNS,
        }),
    }
}

/// Drops `shape` at `lane`, writes its cells into the grid and returns the
/// touched rows.
///
/// The lane is validated before the grid is touched; once validation
/// passes the placement cannot fail.
pub fn drop_shape(grid: &mut Grid, shape: &Shape, lane: usize) -> Result<Landing> {
    check_lane(shape, lane)?;

    let (base, binding_column) = resting_base(grid, shape, lane);

    let mut rows = TouchedRows::new();
    let mut row = base;
    for offset in 0..shape.height() {
        if offset > 0 {
            row = grid.above_or_push(row);
        }
        rows.push(row);
    }

    for (offset, &row) in rows.iter().enumerate() {
        grid.occupy(row, u16::from(shape.row_mask(offset)) << lane);
    }

    tracing::debug!(
        lane,
        binding_column,
        rows = rows.len(),
        height = grid.height(),
        "piece placed"
    );
    Ok(Landing {
        rows,
        binding_column,
    })
}

/// Finds the row the piece's bottom row lands in, appending it if it lies
/// just above the current top. Also returns the binding column.
fn resting_base(grid: &mut Grid, shape: &Shape, lane: usize) -> (RowId, usize) {
    let columns: ArrayVec<(usize, usize, RowId), MAX_PIECE_SIZE> = shape
        .columns()
        .map(|(column, base)| (lane + column, base, grid.surface(lane + column)))
        .collect();
    debug_assert!(!columns.is_empty(), "shape without cells");

    let anchor = columns
        .iter()
        .map(|&(_, _, surface)| surface)
        .max_by_key(|&surface| grid.stamp(surface))
        .unwrap_or(RowId::FLOOR);

    // depth of each column's surface below the anchor, if within reach
    let mut depths: ArrayVec<Option<usize>, MAX_PIECE_SIZE> =
        columns.iter().map(|_| None).collect();
    let mut row = anchor;
    for depth in 0..MAX_PIECE_SIZE {
        for (slot, &(_, _, surface)) in depths.iter_mut().zip(&columns) {
            if slot.is_none() && surface == row {
                *slot = Some(depth);
            }
        }
        if row.is_floor() {
            break;
        }
        row = grid.below(row);
    }

    // rest offset of the piece base relative to the row above the anchor
    let mut best: Option<(isize, usize)> = None;
    for (&(column, base, _), depth) in columns.iter().zip(&depths) {
        let Some(depth) = *depth else {
            continue;
        };
        let rest = -(depth as isize) - base as isize;
        if best.map_or(true, |(best_rest, _)| rest > best_rest) {
            best = Some((rest, column));
        }
    }
    let (rest, binding_column) = best.unwrap_or((0, lane));

    // rest is in -(MAX_PIECE_SIZE - 1)..=0; step 1 + rest rows from the anchor
    let base = if rest == 0 {
        grid.above_or_push(anchor)
    } else {
        let mut row = anchor;
        for _ in 0..(-rest - 1) {
            debug_assert!(!row.is_floor(), "piece base below the floor");
            row = grid.below(row);
        }
        row
    };
    (base, binding_column)
}
