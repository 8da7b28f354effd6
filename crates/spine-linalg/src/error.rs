use spine_tensor::ArrayError;
use thiserror::Error;

use crate::norm::NormOrd;

/// An error type for the linear-algebra routines.
#[derive(Error, Debug, PartialEq)]
pub enum LinalgError {
    /// The input is not a 2-D array.
    #[error("Expected a 2-D matrix, got an array with {ndim} dimensions")]
    NotMatrix {
        /// Number of dimensions of the input
        ndim: usize,
    },

    /// The input matrix is not square.
    #[error("Expected a square matrix, got {rows}x{cols}")]
    NotSquare {
        /// Number of rows
        rows: usize,
        /// Number of columns
        cols: usize,
    },

    /// The norm order is not one of `fro`, `1` or `2`.
    #[error("Unsupported norm order '{0}', expected one of 'fro', '1', '2'")]
    UnsupportedNorm(String),

    /// The requested norm is only defined for 2-D arrays.
    #[error("The '{ord}' norm requires a 2-D matrix, got an array with {ndim} dimensions")]
    NormRequiresMatrix {
        /// Requested norm order
        ord: NormOrd,
        /// Number of dimensions of the input
        ndim: usize,
    },

    /// Error raised by the underlying array.
    #[error("Error with the array: {0}")]
    Array(#[from] ArrayError),
}
