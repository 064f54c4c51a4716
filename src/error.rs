use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    #[error("{what} has length {found}, expected {expected}")]
    DimensionMismatch {
        what: &'static str,
        expected: usize,
        found: usize,
    },
    #[error("{what} contains a non-finite value at index {index}")]
    NonFinite { what: &'static str, index: usize },
    #[error("variable {index} is not declared in the model")]
    UnknownVariable { index: usize },
    #[error("problem has no decision variables")]
    Empty,
    #[error("constraint {row} is not a <= constraint; the plain simplex method only accepts <=")]
    UnsupportedSense { row: usize },
    #[error("constraint {row} has a negative right hand side; the plain simplex method needs b >= 0")]
    NegativeRhs { row: usize },
    #[error("invalid solver option {name}: {value}")]
    InvalidOption { name: &'static str, value: f64 },
    // Numerical failure, not a property of the linear program.
    #[error("pivot element at ({row}, {column}) is numerically zero: {value:e}")]
    DegeneratePivot { row: usize, column: usize, value: f64 },
}
