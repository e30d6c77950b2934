//! Falling-block stacking engine.
//!
//! Pieces are dropped straight down at a fixed lane of a 10-column grid,
//! completed rows are removed, and the resulting stack height is reported.
//! The grid keeps its rows in a linked arena so a row can be removed from
//! anywhere in a tall stack without renumbering the rows above it.

pub mod clearer;
pub mod error;
pub mod geometry;
pub mod grid;
pub mod input;
pub mod pieces;
pub mod resolver;
pub mod simulation;
pub mod visualization;

pub use error::{Error, Result};
pub use grid::{CellState, Grid, RowId, COLUMNS};
pub use pieces::{Catalog, Shape};
pub use simulation::{DropOutcome, ErrorPolicy, LineReport, Simulation};

/// Final stack height after dropping every token of `line` onto an empty
/// grid with the standard pieces.
pub fn stack_height(line: &str) -> Result<usize> {
    let mut simulation = Simulation::standard();
    simulation
        .run_line(line, ErrorPolicy::Halt)
        .map(|report| report.height)
}
