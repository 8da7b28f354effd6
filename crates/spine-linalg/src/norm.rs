use std::fmt;
use std::str::FromStr;

use spine_tensor::NDArray;

use crate::error::LinalgError;
use crate::svd::svd;
use crate::utils::matrix_dims;

/// Order of a matrix norm.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum NormOrd {
    /// Square root of the sum of squared entries. Defined for any number of dimensions.
    #[default]
    Frobenius,
    /// Maximum absolute column sum.
    One,
    /// Spectral norm, the largest singular value.
    Two,
}

impl FromStr for NormOrd {
    type Err = LinalgError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "fro" => Ok(NormOrd::Frobenius),
            "1" => Ok(NormOrd::One),
            "2" => Ok(NormOrd::Two),
            other => Err(LinalgError::UnsupportedNorm(other.to_string())),
        }
    }
}

impl fmt::Display for NormOrd {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            NormOrd::Frobenius => "fro",
            NormOrd::One => "1",
            NormOrd::Two => "2",
        };
        f.write_str(s)
    }
}

/// Computes a matrix norm.
///
/// The spectral norm is the maximum over all singular values returned by [`svd`], not the
/// first one.
///
/// # Errors
///
/// [`NormOrd::One`] and [`NormOrd::Two`] fail with [`LinalgError::NormRequiresMatrix`] for
/// arrays that are not 2-D.
///
/// # Example
///
/// ```
/// use spine_linalg::{norm, NormOrd};
/// use spine_tensor::NDArray;
///
/// let a = NDArray::from_rows(&[[1.0, -2.0], [3.0, 4.0]]).unwrap();
/// assert!((norm(&a, NormOrd::Frobenius).unwrap() - 30.0_f64.sqrt()).abs() < 1e-12);
/// assert_eq!(norm(&a, NormOrd::One).unwrap(), 6.0);
/// ```
pub fn norm(a: &NDArray, ord: NormOrd) -> Result<f64, LinalgError> {
    match ord {
        NormOrd::Frobenius => Ok(a.iter().map(|x| x * x).sum::<f64>().sqrt()),
        NormOrd::One => {
            let (rows, cols) = matrix_2d(a, ord)?;
            let data = a.as_slice();
            Ok((0..cols)
                .map(|j| (0..rows).map(|i| data[i * cols + j].abs()).sum::<f64>())
                .fold(0.0, f64::max))
        }
        NormOrd::Two => {
            matrix_2d(a, ord)?;
            Ok(svd(a)?.max_singular_value())
        }
    }
}

/// Computes a matrix norm from its string name: `"fro"`, `"1"` or `"2"`.
///
/// # Errors
///
/// Fails with [`LinalgError::UnsupportedNorm`] for any other name, otherwise as [`norm`].
pub fn norm_str(a: &NDArray, ord: &str) -> Result<f64, LinalgError> {
    norm(a, ord.parse()?)
}

fn matrix_2d(a: &NDArray, ord: NormOrd) -> Result<(usize, usize), LinalgError> {
    matrix_dims(a).map_err(|_| LinalgError::NormRequiresMatrix {
        ord,
        ndim: a.ndim(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_norm_frobenius_any_ndim() -> Result<(), Box<dyn std::error::Error>> {
        let v = NDArray::from_shape_vec([2, 1, 2], vec![1.0, 2.0, 2.0, 4.0])?;
        assert_relative_eq!(norm(&v, NormOrd::Frobenius)?, 5.0);
        assert_eq!(norm(&v, NormOrd::default())?, norm_str(&v, "fro")?);
        Ok(())
    }

    #[test]
    fn test_norm_one() -> Result<(), Box<dyn std::error::Error>> {
        let a = NDArray::from_rows(&[[1.0, -7.0], [-2.0, -3.0]])?;
        assert_eq!(norm(&a, NormOrd::One)?, 10.0);
        assert_eq!(norm_str(&a, "1")?, 10.0);
        Ok(())
    }

    #[test]
    fn test_norm_two_is_max_singular_value() -> Result<(), Box<dyn std::error::Error>> {
        let a = NDArray::from_rows(&[[1.0, 2.0], [3.0, 4.0], [5.0, 6.0]])?;
        let s = svd(&a)?.s;
        let max = s.iter().copied().fold(f64::MIN, f64::max);
        assert_eq!(norm(&a, NormOrd::Two)?, max);
        assert_relative_eq!(norm(&a, NormOrd::Two)?, 9.525518091565107, epsilon = 1e-8);
        Ok(())
    }

    #[test]
    fn test_norm_two_diagonal_unordered_input() -> Result<(), Box<dyn std::error::Error>> {
        // the largest singular value sits in the last diagonal slot
        let a = NDArray::from_rows(&[[1.0, 0.0, 0.0], [0.0, 2.0, 0.0], [0.0, 0.0, 5.0]])?;
        assert_relative_eq!(norm(&a, NormOrd::Two)?, 5.0, epsilon = 1e-12);
        Ok(())
    }

    #[test]
    fn test_norm_nan_input_propagates() -> Result<(), Box<dyn std::error::Error>> {
        let a = NDArray::from_rows(&[[1.0, f64::NAN], [f64::NAN, 2.0]])?;
        assert!(norm(&a, NormOrd::Frobenius)?.is_nan());
        assert!(norm(&a, NormOrd::Two)?.is_nan());
        Ok(())
    }

    #[test]
    fn test_norm_requires_matrix() {
        let v = NDArray::zeros([3]);
        assert_eq!(
            norm(&v, NormOrd::One),
            Err(LinalgError::NormRequiresMatrix {
                ord: NormOrd::One,
                ndim: 1
            })
        );
        assert!(norm(&v, NormOrd::Two).is_err());
    }

    #[test]
    fn test_norm_unsupported() {
        let a = NDArray::zeros([2, 2]);
        assert_eq!(
            norm_str(&a, "nuc"),
            Err(LinalgError::UnsupportedNorm("nuc".to_string()))
        );
        assert_eq!("2".parse::<NormOrd>(), Ok(NormOrd::Two));
        assert_eq!(NormOrd::One.to_string(), "1");
    }
}
