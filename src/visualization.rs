//! Plain-text rendering of the grid and of piece shapes.
//!
//! Grid cells render as `x` (topmost occupied cell of its column), `o`
//! (occupied, covered from above) or `-` (empty). Each row is labelled with
//! its position counted from the floor, derived while walking the stack.

use std::fmt::Write;

use crate::grid::{CellState, Grid, COLUMNS};
use crate::pieces::{Catalog, Shape};

fn cell_char(cell: CellState) -> char {
    match cell {
        CellState::Empty => '-',
        CellState::Occupied => 'o',
        CellState::Visible => 'x',
    }
}

/// Renders the grid from the top row down, ending with a column ruler.
pub fn format_grid(grid: &Grid) -> String {
    let mut output = format!("stack height = {}\n", grid.height());

    for (depth, row) in grid.rows_top_down().enumerate() {
        let position = grid.height() - 1 - depth;
        let _ = write!(output, "{position:<3}|");
        output.extend(row.cells().map(cell_char));
        output.push_str("|\n");
    }

    output.push_str("   |");
    output.extend((0..COLUMNS).map(|column| char::from(b'0' + column as u8)));
    output.push_str("|\n");
    output
}

/// Renders a shape top row first, `#` for cells and `.` for gaps.
pub fn format_shape(shape: &Shape) -> String {
    let mut output = String::new();
    for row in (0..shape.height()).rev() {
        let mask = shape.row_mask(row);
        for column in 0..shape.width() {
            output.push(if mask & (1 << column) != 0 { '#' } else { '.' });
        }
        output.push('\n');
    }
    output
}

/// Renders every catalog entry under its identifier.
pub fn format_catalog(catalog: &Catalog) -> String {
    let mut output = String::new();
    for id in catalog.ids() {
        if let Ok(shape) = catalog.shape_of(id) {
            let _ = writeln!(output, "{id}:");
            output.push_str(&format_shape(shape));
            output.push('\n');
        }
    }
    output
}
