//! Error types for butterfly-closure
//!
//! The recursive engine itself has no recoverable failures: out-of-range intervals inside the
//! recursion are programming errors and are caught by debug assertions. Errors here cover the
//! public boundary only (configuration, matrix construction, matrix files).

use thiserror::Error;

/// Main error type for butterfly-closure operations
#[derive(Debug, Error)]
pub enum Error {
    /// Base-case threshold must be positive
    #[error("Invalid block size {0}: the base-case threshold must be at least 1")]
    InvalidBlockSize(usize),

    /// Parallel cutoff must be positive
    #[error("Invalid parallel cutoff {0}: must be at least 1")]
    InvalidParallelCutoff(usize),

    /// Backing storage does not hold exactly `dim * dim` cells
    #[error("Dimension mismatch: expected {expected} cells, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    /// A row of a square matrix has the wrong number of columns
    #[error("Row {row} has {actual} columns, expected {expected}")]
    RaggedRow {
        row: usize,
        expected: usize,
        actual: usize,
    },

    /// Interval does not lie within the matrix index domain
    #[error("Interval [{begin}, {end}) is outside the index domain [0, {dim})")]
    IntervalOutOfRange {
        begin: usize,
        end: usize,
        dim: usize,
    },

    /// Malformed matrix file
    #[error("Parse error on line {line}: {message}")]
    Parse { line: usize, message: String },

    /// File I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid configuration or parameters
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

/// Convenience result type for butterfly-closure operations
pub type Result<T> = std::result::Result<T, Error>;
