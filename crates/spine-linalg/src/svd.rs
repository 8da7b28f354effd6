use spine_tensor::NDArray;

use crate::eig::{jacobi_eigen, permute_columns, Convergence, JacobiCriteria, JacobiOutput};
use crate::error::LinalgError;
use crate::utils::{descending_order, matrix_dims};

/// Singular values at or below this threshold get a zero left singular vector.
const SINGULAR_EPSILON: f64 = 1e-10;

/// Result of [`svd`] such that `A ≈ U · diag(S) · Vt`.
#[derive(Debug, Clone, PartialEq)]
pub struct SvdResult {
    /// `m x n` left singular vectors, one per column.
    pub u: NDArray,
    /// The `n` singular values, non-negative and sorted in descending order.
    pub s: Vec<f64>,
    /// `n x n` right singular vectors, one per row.
    pub vt: NDArray,
    /// Convergence of the eigen-decomposition of `AᵗA`.
    pub convergence: Convergence,
}

impl SvdResult {
    /// Returns the largest singular value, 0 for an empty spectrum and NaN if any value is NaN.
    pub fn max_singular_value(&self) -> f64 {
        self.s.iter().copied().fold(0.0, |acc: f64, x| {
            if acc.is_nan() || x.is_nan() {
                f64::NAN
            } else {
                acc.max(x)
            }
        })
    }
}

/// Computes `AᵗA` for a row-major `m x n` matrix.
fn normal_matrix(a: &[f64], m: usize, n: usize) -> Vec<f64> {
    let mut ata = vec![0.0; n * n];
    for row in a.chunks_exact(n.max(1)).take(m) {
        for i in 0..n {
            let ri = row[i];
            if ri == 0.0 {
                continue;
            }
            for j in i..n {
                ata[i * n + j] += ri * row[j];
            }
        }
    }
    // mirror the upper triangle
    for i in 0..n {
        for j in 0..i {
            ata[i * n + j] = ata[j * n + i];
        }
    }
    ata
}

/// Computes the singular value decomposition of a 2-D matrix.
///
/// The right singular vectors are the eigenvectors of `AᵗA`, the singular values the square
/// roots of its eigenvalues (clamped at zero), and each left singular vector is
/// `A · v_j / s_j`. Columns of `U` whose singular value is below `1e-10` are left as zeros,
/// so rank-deficient input degrades instead of failing.
///
/// Forming `AᵗA` squares the condition number; small singular values of ill-conditioned
/// matrices lose roughly half of their significant digits.
///
/// # Errors
///
/// Fails with [`LinalgError::NotMatrix`] if `a` is not 2-D.
///
/// # Example
///
/// ```
/// use spine_linalg::svd;
/// use spine_tensor::NDArray;
///
/// let a = NDArray::from_rows(&[[3.0, 0.0], [0.0, 4.0], [0.0, 0.0]]).unwrap();
/// let res = svd(&a).unwrap();
/// assert_eq!(res.u.shape(), &[3, 2]);
/// assert!((res.s[0] - 4.0).abs() < 1e-12);
/// assert!((res.s[1] - 3.0).abs() < 1e-12);
/// ```
pub fn svd(a: &NDArray) -> Result<SvdResult, LinalgError> {
    svd_with_criteria(a, &JacobiCriteria::default())
}

/// Same as [`svd`] with an explicit stopping rule for the inner eigen-decomposition.
///
/// # Errors
///
/// Fails with [`LinalgError::NotMatrix`] if `a` is not 2-D.
pub fn svd_with_criteria(
    a: &NDArray,
    criteria: &JacobiCriteria,
) -> Result<SvdResult, LinalgError> {
    let (m, n) = matrix_dims(a)?;
    let data = a.as_slice();

    let JacobiOutput {
        values,
        vectors,
        convergence,
    } = jacobi_eigen(normal_matrix(data, m, n), n, criteria);

    // eigenvalues of AᵗA are >= 0 up to rounding, NaN marks a non-finite input
    let singular: Vec<f64> = values
        .iter()
        .map(|&l| if l.is_nan() { l } else { l.max(0.0).sqrt() })
        .collect();
    let order = descending_order(&singular);
    let s: Vec<f64> = order.iter().map(|&i| singular[i]).collect();
    let v = permute_columns(&vectors, n, n, &order);

    let mut u = vec![0.0; m * n];
    for (j, &sj) in s.iter().enumerate() {
        if sj <= SINGULAR_EPSILON {
            log::debug!("svd: singular value {} is {:e}, zero-filling U column", j, sj);
            continue;
        }
        for r in 0..m {
            let av: f64 = (0..n).map(|k| data[r * n + k] * v[k * n + j]).sum();
            u[r * n + j] = av / sj;
        }
    }

    let vt = NDArray::from_shape_fn([n, n], |idx| v[idx[1] * n + idx[0]]);

    Ok(SvdResult {
        u: NDArray::from_shape_vec([m, n], u)?,
        s,
        vt,
        convergence,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use spine_tensor::ops;

    fn reconstruct(res: &SvdResult) -> Result<NDArray, Box<dyn std::error::Error>> {
        let us = ops::matmul(&res.u, &ops::diag(&res.s))?;
        Ok(ops::matmul(&us, &res.vt)?)
    }

    #[test]
    fn test_svd_3x2_full_rank() -> Result<(), Box<dyn std::error::Error>> {
        let a = NDArray::from_rows(&[[1.0, 2.0], [3.0, 4.0], [5.0, 6.0]])?;
        let res = svd(&a)?;
        assert!(res.convergence.is_converged());
        assert_eq!(res.s.len(), 2);
        assert!(res.s.iter().all(|&x| x >= 0.0));
        assert!(res.s[0] >= res.s[1]);
        assert_relative_eq!(res.s[0], 9.525518091565107, epsilon = 1e-8);
        assert_relative_eq!(res.s[1], 0.514300580658644, epsilon = 1e-8);
        assert!(ops::max_abs_diff(&reconstruct(&res)?, &a)? < 1e-8);
        Ok(())
    }

    #[test]
    fn test_svd_orthonormal_factors() -> Result<(), Box<dyn std::error::Error>> {
        let a = NDArray::from_rows(&[[2.0, -1.0, 0.5], [1.0, 3.0, 2.0], [0.0, 1.0, -4.0]])?;
        let res = svd(&a)?;

        let utu = ops::matmul(&ops::transpose(&res.u)?, &res.u)?;
        assert!(ops::max_abs_diff(&utu, &ops::eye(3))? < 1e-8);

        let vvt = ops::matmul(&res.vt, &ops::transpose(&res.vt)?)?;
        assert!(ops::max_abs_diff(&vvt, &ops::eye(3))? < 1e-8);

        assert!(ops::max_abs_diff(&reconstruct(&res)?, &a)? < 1e-8);
        Ok(())
    }

    #[test]
    fn test_svd_rank_deficient() -> Result<(), Box<dyn std::error::Error>> {
        // second column is twice the first
        let a = NDArray::from_rows(&[[1.0, 2.0], [2.0, 4.0], [3.0, 6.0]])?;
        let res = svd(&a)?;
        assert_relative_eq!(res.s[0], 70.0_f64.sqrt(), epsilon = 1e-8);
        assert!(res.s[1] < 1e-6);
        assert!(res.u.iter().all(|x| x.is_finite()));
        assert!(ops::max_abs_diff(&reconstruct(&res)?, &a)? < 1e-6);
        Ok(())
    }

    #[test]
    fn test_svd_zero_singular_value_leaves_u_column_zero() -> Result<(), Box<dyn std::error::Error>> {
        // AᵗA = diag(0, 5) is already diagonal, so the zero singular value is exact
        let a = NDArray::from_rows(&[[0.0, 1.0], [0.0, 2.0]])?;
        let res = svd(&a)?;
        assert_relative_eq!(res.s[0], 5.0_f64.sqrt(), epsilon = 1e-12);
        assert_eq!(res.s[1], 0.0);
        assert_eq!(ops::column(&res.u, 1)?, vec![0.0, 0.0]);
        assert_relative_eq!(res.u.get_item(&[0, 0])?, 1.0 / 5.0_f64.sqrt(), epsilon = 1e-12);
        assert!(ops::max_abs_diff(&reconstruct(&res)?, &a)? < 1e-12);
        Ok(())
    }

    #[test]
    fn test_svd_iteration_limited() -> Result<(), Box<dyn std::error::Error>> {
        let a = NDArray::from_rows(&[[2.0, -1.0, 0.5], [1.0, 3.0, 2.0], [0.0, 1.0, -4.0]])?;
        let criteria = JacobiCriteria {
            max_iterations: 1,
            tolerance: 1e-10,
        };
        let res = svd_with_criteria(&a, &criteria)?;
        assert!(!res.convergence.is_converged());
        assert_eq!(res.convergence.iterations(), 1);
        assert!(res.s.iter().all(|&x| x.is_finite() && x >= 0.0));
        assert!(res.s.windows(2).all(|w| w[0] >= w[1]));

        assert!(svd(&a)?.convergence.is_converged());
        Ok(())
    }

    #[test]
    fn test_svd_nan_input() -> Result<(), Box<dyn std::error::Error>> {
        let a = NDArray::from_rows(&[[1.0, f64::NAN], [f64::NAN, 2.0]])?;
        let res = svd(&a)?;
        assert!(!res.convergence.is_converged());
        assert!(res.s.iter().all(|x| x.is_nan()));
        assert!(res.max_singular_value().is_nan());
        Ok(())
    }

    #[test]
    fn test_svd_zero_matrix() -> Result<(), Box<dyn std::error::Error>> {
        let a = NDArray::zeros([2, 2]);
        let res = svd(&a)?;
        assert_eq!(res.s, vec![0.0, 0.0]);
        assert!(res.u.iter().all(|&x| x == 0.0));
        assert_eq!(res.max_singular_value(), 0.0);
        Ok(())
    }

    #[test]
    fn test_svd_wide_matrix() -> Result<(), Box<dyn std::error::Error>> {
        let a = NDArray::from_rows(&[[1.0, 0.0, 1.0], [0.0, 1.0, 1.0]])?;
        let res = svd(&a)?;
        assert_eq!(res.u.shape(), &[2, 3]);
        assert_eq!(res.vt.shape(), &[3, 3]);
        assert_relative_eq!(res.s[0], 3.0_f64.sqrt(), epsilon = 1e-8);
        assert_relative_eq!(res.s[1], 1.0, epsilon = 1e-8);
        assert!(res.s[2] < 1e-6);
        assert!(ops::max_abs_diff(&reconstruct(&res)?, &a)? < 1e-6);
        Ok(())
    }

    #[test]
    fn test_svd_requires_matrix() {
        assert_eq!(
            svd(&NDArray::zeros([3])),
            Err(LinalgError::NotMatrix { ndim: 1 })
        );
    }
}
