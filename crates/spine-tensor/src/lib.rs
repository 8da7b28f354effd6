#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]
//!
//! # Overview
//!
//! `spine-tensor` provides [`NDArray`], a dense multi-dimensional array that owns a flat
//! `f64` buffer laid out in row-major order. It is the leaf data structure of the
//! workspace: every decomposition in `spine-linalg` reads from and returns instances of it.
//!
//! # Architecture
//!
//! - **NDArray**: owned buffer, shape and row-major strides with bounds-checked
//!   element access. Cloning always deep-copies, two arrays never share a buffer.
//! - **DType**: an informational element-type tag. Storage is always `f64`.
//! - **ArrayError**: shape and index failures raised at the array boundary.
//! - **ops**: a handful of matrix helpers (`eye`, `transpose`, `matmul`, ...) used by the
//!   decompositions and their tests.
//!
//! # Quick Start
//!
//! ```rust
//! use spine_tensor::NDArray;
//!
//! let a = NDArray::from_shape_vec(vec![2, 3], vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0]).unwrap();
//! assert_eq!(a.size(), 6);
//! assert_eq!(a.strides(), &[3, 1]);
//! assert_eq!(a.get_item(&[1, 2]).unwrap(), 6.0);
//!
//! // shape mismatches are rejected at construction
//! assert!(NDArray::from_shape_vec(vec![2, 2], vec![1.0, 2.0, 3.0]).is_err());
//! ```

/// Array module containing [`NDArray`] and its error type.
pub mod array;

/// Element type tags.
pub mod dtype;

/// Matrix helpers built on top of [`NDArray`].
pub mod ops;

/// Binary encoding of arrays, enabled with the `bincode` feature.
#[cfg(feature = "bincode")]
pub mod bincode;

/// Serde support for arrays, enabled with the `serde` feature.
#[cfg(feature = "serde")]
pub mod serde;

pub use crate::array::{get_strides_from_shape, ArrayError, NDArray};
pub use crate::dtype::DType;
