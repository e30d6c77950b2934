//! Piece shapes and the catalog that maps identifiers to them.
//!
//! A shape is stored bottom row first, one column mask per row, with column
//! bits relative to the lane the piece is dropped at. The collision resolver
//! only needs the lowest occupied row of each column, which is precomputed.

use std::sync::OnceLock;

use rustc_hash::FxHashMap;

use crate::error::{Error, Result};
use crate::geometry::{normalize_to_origin, row_masks, Coord};

/// Maximum number of rows or columns a single piece may span.
pub const MAX_PIECE_SIZE: usize = 4;

/// Marker for a column the piece does not occupy.
const NO_CELL: u8 = u8::MAX;

/// Geometry of a piece, normalized so its lowest row and leftmost column are 0.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Shape {
    rows: [u8; MAX_PIECE_SIZE],
    column_base: [u8; MAX_PIECE_SIZE],
    height: u8,
    width: u8,
}

impl Shape {
    /// Builds a shape from per-row column masks, bottom row first.
    ///
    /// Panics (at compile time when used in a `const`) if the rows are not
    /// normalized: every row and the leftmost column must be occupied.
    pub const fn from_rows(rows: &[u8]) -> Self {
        assert!(!rows.is_empty(), "shape needs at least one row");
        assert!(rows.len() <= MAX_PIECE_SIZE, "shape exceeds MAX_PIECE_SIZE rows");
        let mut masks = [0u8; MAX_PIECE_SIZE];
        let mut i = 0;
        while i < rows.len() {
            assert!(
                rows[i] < 1 << MAX_PIECE_SIZE,
                "shape exceeds MAX_PIECE_SIZE columns"
            );
            assert!(rows[i] != 0, "every row must be occupied");
            masks[i] = rows[i];
            i += 1;
        }
        let shape = Self::build(masks, rows.len());
        assert!(shape.column_base[0] != NO_CELL, "leftmost column must be occupied");
        shape
    }

    /// Builds a shape from arbitrary cells, translating them to the origin.
    pub fn from_cells(cells: &[Coord]) -> Result<Self> {
        let normalized = normalize_to_origin(cells.to_vec()).ok_or(Error::InvalidShape {
            reason: "shape has no cells",
        })?;
        let (masks, height) = row_masks(&normalized)?;
        Ok(Self::build(masks, height))
    }

    const fn build(rows: [u8; MAX_PIECE_SIZE], height: usize) -> Self {
        let mut column_base = [NO_CELL; MAX_PIECE_SIZE];
        let mut width = 0;
        let mut row = 0;
        while row < height {
            let mut column = 0;
            while column < MAX_PIECE_SIZE {
                if rows[row] & (1 << column) != 0 {
                    if column_base[column] == NO_CELL {
                        column_base[column] = row as u8;
                    }
                    if column + 1 > width {
                        width = column + 1;
                    }
                }
                column += 1;
            }
            row += 1;
        }
        Self {
            rows,
            column_base,
            height: height as u8,
            width: width as u8,
        }
    }

    /// Number of rows spanned by the piece.
    pub fn height(&self) -> usize {
        self.height as usize
    }

    /// Number of columns spanned by the piece, counted from the lane.
    pub fn width(&self) -> usize {
        self.width as usize
    }

    /// Column mask of row `row`, relative to the lane.
    pub fn row_mask(&self, row: usize) -> u8 {
        self.rows[row]
    }

    /// Occupied columns with the row offset of their lowest cell.
    pub fn columns(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.column_base
            .iter()
            .enumerate()
            .filter(|&(_, &base)| base != NO_CELL)
            .map(|(column, &base)| (column, base as usize))
    }

    /// All occupied cells as `(row, column)`, bottom row first.
    pub fn cells(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        (0..self.height()).flat_map(move |row| {
            (0..MAX_PIECE_SIZE)
                .filter(move |&column| self.rows[row] & (1 << column) != 0)
                .map(move |column| (row, column))
        })
    }
}

pub const I: Shape = Shape::from_rows(&[0b1111]);
pub const Q: Shape = Shape::from_rows(&[0b11, 0b11]);
pub const T: Shape = Shape::from_rows(&[0b010, 0b111]);
pub const S: Shape = Shape::from_rows(&[0b011, 0b110]);
pub const Z: Shape = Shape::from_rows(&[0b110, 0b011]);
pub const L: Shape = Shape::from_rows(&[0b11, 0b01, 0b01]);
pub const J: Shape = Shape::from_rows(&[0b11, 0b10, 0b10]);

/// The standard pieces. `O` is accepted as another name for the square.
pub const STANDARD_PIECES: &[(&str, Shape)] = &[
    ("I", I),
    ("J", J),
    ("L", L),
    ("O", Q),
    ("Q", Q),
    ("S", S),
    ("T", T),
    ("Z", Z),
];

/// Read-only lookup from piece identifier to shape.
#[derive(Clone, Debug, Default)]
pub struct Catalog {
    shapes: FxHashMap<Box<str>, Shape>,
}

impl Catalog {
    /// Catalog holding the standard pieces.
    pub fn standard() -> Self {
        let shapes = STANDARD_PIECES
            .iter()
            .map(|&(id, shape)| (Box::from(id), shape))
            .collect();
        Self { shapes }
    }

    /// Shared standard catalog, built on first use.
    pub fn standard_ref() -> &'static Catalog {
        static STANDARD: OnceLock<Catalog> = OnceLock::new();
        STANDARD.get_or_init(Catalog::standard)
    }

    /// Starts an empty catalog for a project-specific piece set.
    pub fn builder() -> CatalogBuilder {
        CatalogBuilder::default()
    }

    /// Looks up the shape for `id`.
    pub fn shape_of(&self, id: &str) -> Result<&Shape> {
        self.shapes
            .get(id)
            .ok_or_else(|| Error::UnknownPiece { id: id.to_owned() })
    }

    /// Registered identifiers in sorted order.
    pub fn ids(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = self.shapes.keys().map(|id| &**id).collect();
        ids.sort_unstable();
        ids
    }

    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }
}

/// Collects shapes for a custom [`Catalog`].
#[derive(Default)]
pub struct CatalogBuilder {
    shapes: FxHashMap<Box<str>, Shape>,
}

impl CatalogBuilder {
    /// Registers `shape` under `id`, replacing any earlier entry.
    pub fn shape(mut self, id: &str, shape: Shape) -> Result<Self> {
        if id.is_empty() || !id.bytes().all(|b| b.is_ascii_alphabetic()) {
            return Err(Error::InvalidShape {
                reason: "piece identifier must be ASCII letters",
            });
        }
        self.shapes.insert(Box::from(id), shape);
        Ok(self)
    }

    /// Registers a shape described by loose cells under `id`.
    pub fn cells(self, id: &str, cells: &[Coord]) -> Result<Self> {
        let shape = Shape::from_cells(cells)?;
        self.shape(id, shape)
    }

    pub fn build(self) -> Catalog {
        Catalog {
            shapes: self.shapes,
        }
    }
}
