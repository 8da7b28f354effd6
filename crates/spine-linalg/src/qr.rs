use spine_tensor::NDArray;

use crate::error::LinalgError;
use crate::utils::matrix_dims;

/// Columns whose remaining norm is at or below this threshold are treated as dependent.
const RANK_EPSILON: f64 = 1e-10;

/// Result of [`qr`] such that `A ≈ Q · R`.
#[derive(Debug, Clone, PartialEq)]
pub struct QrResult {
    /// `m x n` matrix with orthonormal columns.
    pub q: NDArray,
    /// `n x n` upper triangular matrix.
    pub r: NDArray,
}

/// Computes the thin QR factorization of a 2-D matrix with modified Gram-Schmidt.
///
/// Each column is normalized in turn and immediately projected out of every later column
/// of a working copy. There is no pivoting: for a column that is (numerically) a combination
/// of the previous ones, `R[j][j]` holds the tiny remaining norm, the matching column of `Q`
/// is left as zeros and a warning is logged. Tall or square input (`m >= n`) is expected.
///
/// # Errors
///
/// Fails with [`LinalgError::NotMatrix`] if `a` is not 2-D.
///
/// # Example
///
/// ```
/// use spine_linalg::qr;
/// use spine_tensor::{ops, NDArray};
///
/// let res = qr(&ops::eye(2)).unwrap();
/// assert_eq!(res.q, ops::eye(2));
/// assert_eq!(res.r, ops::eye(2));
/// ```
pub fn qr(a: &NDArray) -> Result<QrResult, LinalgError> {
    let (m, n) = matrix_dims(a)?;

    let mut w = a.as_slice().to_vec();
    let mut q = vec![0.0; m * n];
    let mut r = vec![0.0; n * n];

    for j in 0..n {
        let norm = (0..m).map(|i| w[i * n + j] * w[i * n + j]).sum::<f64>().sqrt();
        r[j * n + j] = norm;

        if norm <= RANK_EPSILON {
            log::warn!(
                "qr: column {} is linearly dependent (norm {:e}), leaving Q column zero",
                j,
                norm
            );
            continue;
        }

        for i in 0..m {
            q[i * n + j] = w[i * n + j] / norm;
        }

        for k in j + 1..n {
            let rjk: f64 = (0..m).map(|i| q[i * n + j] * w[i * n + k]).sum();
            r[j * n + k] = rjk;
            for i in 0..m {
                w[i * n + k] -= rjk * q[i * n + j];
            }
        }
    }

    Ok(QrResult {
        q: NDArray::from_shape_vec([m, n], q)?,
        r: NDArray::from_shape_vec([n, n], r)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use spine_tensor::ops;

    #[test]
    fn test_qr_identity() -> Result<(), Box<dyn std::error::Error>> {
        let res = qr(&ops::eye(2))?;
        assert_eq!(res.q, ops::eye(2));
        assert_eq!(res.r, ops::eye(2));
        Ok(())
    }

    #[test]
    fn test_qr_3x3() -> Result<(), Box<dyn std::error::Error>> {
        let a = NDArray::from_rows(&[
            [12.0, -51.0, 4.0],
            [6.0, 167.0, -68.0],
            [-4.0, 24.0, -41.0],
        ])?;
        let res = qr(&a)?;

        // classic textbook example, R = [[14, 21, -14], [0, 175, -70], [0, 0, 35]]
        assert_relative_eq!(res.r.get_item(&[0, 0])?, 14.0, epsilon = 1e-10);
        assert_relative_eq!(res.r.get_item(&[0, 1])?, 21.0, epsilon = 1e-10);
        assert_relative_eq!(res.r.get_item(&[1, 1])?, 175.0, epsilon = 1e-10);
        assert_relative_eq!(res.r.get_item(&[1, 2])?, -70.0, epsilon = 1e-10);
        assert_relative_eq!(res.r.get_item(&[2, 2])?, 35.0, epsilon = 1e-10);

        let qtq = ops::matmul(&ops::transpose(&res.q)?, &res.q)?;
        assert!(ops::max_abs_diff(&qtq, &ops::eye(3))? < 1e-12);
        assert!(ops::max_abs_diff(&ops::matmul(&res.q, &res.r)?, &a)? < 1e-10);
        Ok(())
    }

    #[test]
    fn test_qr_tall() -> Result<(), Box<dyn std::error::Error>> {
        let a = NDArray::from_rows(&[[1.0, 2.0], [3.0, 4.0], [5.0, 6.0]])?;
        let res = qr(&a)?;
        assert_eq!(res.q.shape(), &[3, 2]);
        assert_eq!(res.r.shape(), &[2, 2]);
        assert_eq!(res.r.get_item(&[1, 0])?, 0.0);
        assert!(ops::max_abs_diff(&ops::matmul(&res.q, &res.r)?, &a)? < 1e-12);
        Ok(())
    }

    #[test]
    fn test_qr_dependent_column() -> Result<(), Box<dyn std::error::Error>> {
        let a = NDArray::from_rows(&[[1.0, 2.0], [1.0, 2.0]])?;
        let res = qr(&a)?;
        assert!(res.r.get_item(&[1, 1])? <= 1e-10);
        assert_eq!(ops::column(&res.q, 1)?, vec![0.0, 0.0]);
        assert!(res.q.iter().all(|x| x.is_finite()));
        assert!(ops::max_abs_diff(&ops::matmul(&res.q, &res.r)?, &a)? < 1e-10);
        Ok(())
    }

    #[test]
    fn test_qr_does_not_mutate_input() -> Result<(), Box<dyn std::error::Error>> {
        let a = NDArray::from_rows(&[[2.0, 1.0], [1.0, 3.0]])?;
        let before = a.clone();
        let _ = qr(&a)?;
        assert_eq!(a, before);
        Ok(())
    }

    #[test]
    fn test_qr_requires_matrix() {
        assert_eq!(
            qr(&NDArray::zeros([2, 2, 1])),
            Err(LinalgError::NotMatrix { ndim: 3 })
        );
    }
}
