#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]
//!
//! All algorithms are free functions over 2-D [`NDArray`]s. They copy their input into owned
//! working buffers and return freshly allocated results, so the caller's array is never
//! modified.
//!
//! | function | algorithm | result |
//! |----------|-----------|--------|
//! | [`eig`] | cyclic Jacobi rotations (symmetric input) | [`EigResult`] |
//! | [`svd`] | Jacobi on the normal matrix `AᵗA` | [`SvdResult`] |
//! | [`qr`] | modified Gram-Schmidt | [`QrResult`] |
//! | [`norm`] | Frobenius, max column sum, spectral | `f64` |
//!
//! Eigenvalues and singular values are returned sorted by descending magnitude, with the
//! matching vectors permuted in lockstep.
//!
//! ```rust
//! use spine_linalg::{eig, norm, NormOrd};
//! use spine_tensor::NDArray;
//!
//! let a = NDArray::from_rows(&[[2.0, 0.0], [0.0, 3.0]]).unwrap();
//! let res = eig(&a).unwrap();
//! assert!(res.convergence.is_converged());
//! assert_eq!(res.eigenvalues, vec![3.0, 2.0]);
//!
//! let two = norm(&a, NormOrd::Two).unwrap();
//! assert!((two - 3.0).abs() < 1e-12);
//! ```

/// Symmetric eigen-decomposition with Jacobi rotations.
pub mod eig;

/// Error types for the decompositions.
pub mod error;

/// Matrix norms.
pub mod norm;

/// QR factorization with modified Gram-Schmidt.
pub mod qr;

/// Singular value decomposition built on [`eig`].
pub mod svd;

mod utils;

pub use crate::eig::{eig, eig_with_criteria, Convergence, EigResult, JacobiCriteria};
pub use crate::error::LinalgError;
pub use crate::norm::{norm, norm_str, NormOrd};
pub use crate::qr::{qr, QrResult};
pub use crate::svd::{svd, svd_with_criteria, SvdResult};

pub use spine_tensor::NDArray;
