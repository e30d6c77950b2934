//! Sequential driver: look up a piece, drop it, clear completed rows.

use crate::clearer::clear_full_rows;
use crate::error::Result;
use crate::grid::Grid;
use crate::input::{parse_token, split_tokens};
use crate::pieces::Catalog;
use crate::resolver::drop_shape;

/// What to do with a token that cannot be applied.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ErrorPolicy {
    /// Stop the line and report the error.
    #[default]
    Halt,
    /// Log the error and carry on with the next token.
    Skip,
}

/// Result of a single drop.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DropOutcome {
    pub rows_cleared: usize,
    pub binding_column: usize,
    /// Stack height after clearing.
    pub height: usize,
}

/// Summary of one processed input line.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct LineReport {
    pub height: usize,
    pub placed: usize,
    pub skipped: usize,
    pub rows_cleared: usize,
}

/// A grid being filled from a piece catalog.
#[derive(Clone, Debug)]
pub struct Simulation<'c> {
    catalog: &'c Catalog,
    grid: Grid,
    pieces_placed: u64,
    rows_cleared: u64,
}

impl Simulation<'static> {
    /// Simulation over the standard pieces.
    pub fn standard() -> Self {
        Self::new(Catalog::standard_ref())
    }
}

impl<'c> Simulation<'c> {
    pub fn new(catalog: &'c Catalog) -> Self {
        Self {
            catalog,
            grid: Grid::new(),
            pieces_placed: 0,
            rows_cleared: 0,
        }
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    /// Current stack height.
    pub fn height(&self) -> usize {
        self.grid.height()
    }

    /// Pieces placed since creation or the last reset.
    pub fn pieces_placed(&self) -> u64 {
        self.pieces_placed
    }

    /// Rows cleared since creation or the last reset.
    pub fn rows_cleared(&self) -> u64 {
        self.rows_cleared
    }

    /// Empties the grid and zeroes the counters.
    pub fn reset(&mut self) {
        self.grid = Grid::new();
        self.pieces_placed = 0;
        self.rows_cleared = 0;
    }

    /// Drops piece `id` at `lane` and clears any rows it completes.
    ///
    /// On error the grid is left exactly as it was.
    pub fn drop_piece(&mut self, id: &str, lane: usize) -> Result<DropOutcome> {
        let catalog = self.catalog;
        let shape = catalog.shape_of(id)?;
        let landing = drop_shape(&mut self.grid, shape, lane)?;
        let rows_cleared = clear_full_rows(&mut self.grid, &landing.rows);

        self.pieces_placed += 1;
        self.rows_cleared += rows_cleared as u64;
        Ok(DropOutcome {
            rows_cleared,
            binding_column: landing.binding_column,
            height: self.grid.height(),
        })
    }

    /// Decodes and applies one raw token such as `T7`.
    pub fn apply_token(&mut self, token: &str) -> Result<DropOutcome> {
        let token = parse_token(token)?;
        self.drop_piece(token.piece, token.lane)
    }

    /// Applies every token of `line` in order.
    ///
    /// Under [`ErrorPolicy::Halt`] the first failing token aborts the line
    /// with its error; drops before it stay applied.
    pub fn run_line(&mut self, line: &str, policy: ErrorPolicy) -> Result<LineReport> {
        let mut report = LineReport::default();
        for token in split_tokens(line) {
            match self.apply_token(token) {
                Ok(outcome) => {
                    report.placed += 1;
                    report.rows_cleared += outcome.rows_cleared;
                }
                Err(err) if policy == ErrorPolicy::Skip => {
                    tracing::warn!(%err, "skipping token");
                    report.skipped += 1;
                }
                Err(err) => return Err(err),
            }
        }
        report.height = self.grid.height();
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::pieces::I;

    #[test]
    fn test_drop_piece_reports_clears() {
        let mut sim = Simulation::standard();
        sim.drop_piece("I", 0).unwrap();
        sim.drop_piece("I", 4).unwrap();
        let outcome = sim.drop_piece("Q", 8).unwrap();
        assert_eq!(
            outcome,
            DropOutcome {
                rows_cleared: 1,
                binding_column: 8,
                height: 1
            }
        );
        assert_eq!(sim.pieces_placed(), 3);
        assert_eq!(sim.rows_cleared(), 1);
    }

    #[test]
    fn test_rejected_drop_leaves_grid_unchanged() {
        let mut sim = Simulation::standard();
        sim.drop_piece("T", 1).unwrap();
        let before = sim.grid().rows_top_down().map(|row| row.mask()).collect::<Vec<_>>();

        assert!(matches!(
            sim.drop_piece("X", 0),
            Err(Error::UnknownPiece { .. })
        ));
        assert!(matches!(
            sim.drop_piece("I", 7),
            Err(Error::LaneOutOfRange { .. })
        ));
        assert!(matches!(
            sim.apply_token("T"),
            Err(Error::MalformedInput { .. })
        ));

        let after = sim.grid().rows_top_down().map(|row| row.mask()).collect::<Vec<_>>();
        assert_eq!(before, after);
        assert_eq!(sim.pieces_placed(), 1);
        sim.grid().check_invariants().unwrap();
    }

    #[test]
    fn test_run_line_halt_stops_at_first_error() {
        let mut sim = Simulation::standard();
        let err = sim.run_line("Q0,X1,Q2", ErrorPolicy::Halt).unwrap_err();
        assert_eq!(err, Error::UnknownPiece { id: "X".into() });
        assert_eq!(sim.pieces_placed(), 1);
    }

    #[test]
    fn test_run_line_skip_continues() {
        let mut sim = Simulation::standard();
        let report = sim.run_line("Q0,X1,I9,Q2", ErrorPolicy::Skip).unwrap();
        assert_eq!(
            report,
            LineReport {
                height: 2,
                placed: 2,
                skipped: 2,
                rows_cleared: 0
            }
        );
    }

    #[test]
    fn test_custom_catalog() {
        let catalog = Catalog::builder().shape("I", I).unwrap().build();
        let mut sim = Simulation::new(&catalog);
        sim.run_line("I0 I4", ErrorPolicy::Halt).unwrap();
        assert!(sim.drop_piece("Q", 0).is_err());
        assert_eq!(sim.height(), 1);
    }

    #[test]
    fn test_reset() {
        let mut sim = Simulation::standard();
        sim.run_line("Q0,Q2", ErrorPolicy::Halt).unwrap();
        sim.reset();
        assert_eq!(sim.height(), 0);
        assert_eq!(sim.pieces_placed(), 0);
        assert!(sim.grid().is_empty());
    }
}
