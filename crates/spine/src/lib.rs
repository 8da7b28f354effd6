//! Spine numerics: dense arrays and the decompositions built on them.
//!
//! ```rust
//! use spine::linalg::{qr, NormOrd};
//! use spine::tensor::NDArray;
//!
//! let a = NDArray::from_rows(&[[1.0, 2.0], [3.0, 4.0]]).unwrap();
//! let res = qr(&a).unwrap();
//! assert_eq!(res.r.shape(), &[2, 2]);
//! assert!(spine::linalg::norm(&a, NormOrd::One).unwrap() == 6.0);
//! ```

#[doc(inline)]
pub use spine_tensor as tensor;

#[doc(inline)]
pub use spine_linalg as linalg;
