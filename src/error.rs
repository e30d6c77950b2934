//! Error kinds surfaced by the stacking engine.
//!
//! Every variant is detected before the grid is touched, so a rejected token
//! never leaves a partially placed piece behind.

use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// The piece identifier is not in the catalog.
    UnknownPiece { id: String },
    /// The token could not be decoded into a piece identifier and lane.
    MalformedInput { token: String, reason: &'static str },
    /// The piece would stick out past the right edge of the grid.
    LaneOutOfRange {
        lane: usize,
        width: usize,
        columns: usize,
    },
    /// A custom shape could not be registered in a catalog.
    InvalidShape { reason: &'static str },
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::UnknownPiece { id } => write!(f, "unknown piece '{id}'"),
            Error::MalformedInput { token, reason } => {
                write!(f, "malformed token '{token}': {reason}")
            }
            Error::LaneOutOfRange {
                lane,
                width,
                columns,
            } => write!(
                f,
                "lane {lane} with piece width {width} does not fit in {columns} columns"
            ),
            Error::InvalidShape { reason } => write!(f, "invalid shape: {reason}"),
        }
    }
}

impl std::error::Error for Error {}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_messages() {
        let unknown = Error::UnknownPiece { id: "X".into() };
        assert_eq!(unknown.to_string(), "unknown piece 'X'");

        let lane = Error::LaneOutOfRange {
            lane: 8,
            width: 4,
            columns: 10,
        };
        assert_eq!(
            lane.to_string(),
            "lane 8 with piece width 4 does not fit in 10 columns"
        );
    }
}
