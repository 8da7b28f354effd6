use spine_tensor::NDArray;

use crate::error::LinalgError;
use crate::utils::{descending_order, square_dim};

/// Stopping rule for the Jacobi rotation loop.
#[derive(Debug, Clone, PartialEq)]
pub struct JacobiCriteria {
    /// Maximum number of rotations to apply.
    pub max_iterations: usize,
    /// The loop stops once the largest off-diagonal magnitude falls below this value.
    pub tolerance: f64,
}

impl Default for JacobiCriteria {
    fn default() -> Self {
        Self {
            max_iterations: 100,
            tolerance: 1e-10,
        }
    }
}

/// How a Jacobi run ended.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Convergence {
    /// The off-diagonal part fell below the tolerance.
    Converged {
        /// Number of rotations applied.
        iterations: usize,
    },
    /// The rotation cap was reached first; the result is best-effort.
    IterationLimited {
        /// Number of rotations applied.
        iterations: usize,
        /// Largest remaining off-diagonal magnitude.
        off_diagonal: f64,
    },
}

impl Convergence {
    /// Returns true if the run reached the tolerance.
    pub fn is_converged(&self) -> bool {
        matches!(self, Convergence::Converged { .. })
    }

    /// Returns the number of rotations applied.
    pub fn iterations(&self) -> usize {
        match *self {
            Convergence::Converged { iterations }
            | Convergence::IterationLimited { iterations, .. } => iterations,
        }
    }
}

/// Result of [`eig`].
#[derive(Debug, Clone, PartialEq)]
pub struct EigResult {
    /// Eigenvalues sorted by descending magnitude.
    pub eigenvalues: Vec<f64>,
    /// `n x n` matrix whose column `j` is the eigenvector of `eigenvalues[j]`.
    pub eigenvectors: NDArray,
    /// Whether the rotation loop reached its tolerance.
    pub convergence: Convergence,
}

/// Raw output of the rotation loop, in diagonal order.
pub(crate) struct JacobiOutput {
    pub values: Vec<f64>,
    /// Row-major `n x n`, eigenvectors in columns.
    pub vectors: Vec<f64>,
    pub convergence: Convergence,
}

/// Largest strictly-upper-triangular magnitude and its position.
///
/// Ties keep the first entry in row-major order. A NaN entry wins over every number.
fn max_off_diagonal(a: &[f64], n: usize) -> (f64, usize, usize) {
    let mut max_val = 0.0_f64;
    let (mut p, mut q) = (0, 1);
    for i in 0..n {
        for j in i + 1..n {
            let v = a[i * n + j].abs();
            if v.is_nan() {
                return (v, i, j);
            }
            if v > max_val {
                max_val = v;
                p = i;
                q = j;
            }
        }
    }
    (max_val, p, q)
}

/// Applies the rotation `J` with `J[p][p] = J[q][q] = c`, `J[p][q] = s`, `J[q][p] = -s`
/// as `A <- Jᵗ A J` and `V <- V J`.
fn rotate(a: &mut [f64], v: &mut [f64], n: usize, p: usize, q: usize, c: f64, s: f64) {
    let app = a[p * n + p];
    let aqq = a[q * n + q];
    let apq = a[p * n + q];

    a[p * n + p] = c * c * app - 2.0 * c * s * apq + s * s * aqq;
    a[q * n + q] = s * s * app + 2.0 * c * s * apq + c * c * aqq;
    a[p * n + q] = 0.0;
    a[q * n + p] = 0.0;

    for k in 0..n {
        if k == p || k == q {
            continue;
        }
        let akp = a[k * n + p];
        let akq = a[k * n + q];
        let new_kp = c * akp - s * akq;
        let new_kq = s * akp + c * akq;
        a[k * n + p] = new_kp;
        a[p * n + k] = new_kp;
        a[k * n + q] = new_kq;
        a[q * n + k] = new_kq;
    }

    for k in 0..n {
        let vkp = v[k * n + p];
        let vkq = v[k * n + q];
        v[k * n + p] = c * vkp - s * vkq;
        v[k * n + q] = s * vkp + c * vkq;
    }
}

/// Output for a matrix holding NaN or infinite entries: every value is NaN and the run is
/// reported as not converged.
fn non_finite_output(n: usize, iterations: usize) -> JacobiOutput {
    log::warn!(
        "Jacobi hit a non-finite entry for n={} after {} rotations",
        n,
        iterations
    );
    JacobiOutput {
        values: vec![f64::NAN; n],
        vectors: vec![f64::NAN; n * n],
        convergence: Convergence::IterationLimited {
            iterations,
            off_diagonal: f64::NAN,
        },
    }
}

/// Runs the Jacobi rotation loop on a row-major `n x n` working copy.
///
/// Only the upper triangle drives pivot selection; the lower triangle is kept in sync by the
/// rotation, so symmetric input stays symmetric. Non-finite input, or entries that overflow
/// while rotating, yield NaN values flagged [`Convergence::IterationLimited`].
pub(crate) fn jacobi_eigen(mut a: Vec<f64>, n: usize, criteria: &JacobiCriteria) -> JacobiOutput {
    if !a.iter().all(|x| x.is_finite()) {
        return non_finite_output(n, 0);
    }

    let mut v = vec![0.0; n * n];
    for i in 0..n {
        v[i * n + i] = 1.0;
    }

    let mut convergence = None;
    for iteration in 0..criteria.max_iterations {
        let (max_val, p, q) = max_off_diagonal(&a, n);
        if !max_val.is_finite() {
            return non_finite_output(n, iteration);
        }
        // an exactly diagonal matrix is done even with a zero tolerance
        if max_val < criteria.tolerance || max_val == 0.0 {
            convergence = Some(Convergence::Converged {
                iterations: iteration,
            });
            break;
        }

        let theta = 0.5 * (2.0 * a[p * n + q]).atan2(a[q * n + q] - a[p * n + p]);
        let (s, c) = theta.sin_cos();
        rotate(&mut a, &mut v, n, p, q, c, s);
    }

    if !a.iter().all(|x| x.is_finite()) {
        let iterations = convergence.map_or(criteria.max_iterations, |c| c.iterations());
        return non_finite_output(n, iterations);
    }

    let convergence = convergence.unwrap_or_else(|| {
        let (off_diagonal, _, _) = max_off_diagonal(&a, n);
        if off_diagonal < criteria.tolerance || off_diagonal == 0.0 {
            Convergence::Converged {
                iterations: criteria.max_iterations,
            }
        } else {
            Convergence::IterationLimited {
                iterations: criteria.max_iterations,
                off_diagonal,
            }
        }
    });

    match convergence {
        Convergence::Converged { iterations } => {
            log::debug!("Jacobi converged for n={} after {} rotations", n, iterations);
        }
        Convergence::IterationLimited {
            iterations,
            off_diagonal,
        } => {
            log::warn!(
                "Jacobi stopped at the {} rotation cap for n={} with off-diagonal {:e}",
                iterations,
                n,
                off_diagonal
            );
        }
    }

    let values = (0..n).map(|i| a[i * n + i]).collect();
    JacobiOutput {
        values,
        vectors: v,
        convergence,
    }
}

/// Copies the columns of a row-major `rows x n` matrix in the given order.
pub(crate) fn permute_columns(m: &[f64], rows: usize, n: usize, order: &[usize]) -> Vec<f64> {
    let mut out = vec![0.0; rows * n];
    for (new_col, &old_col) in order.iter().enumerate() {
        for r in 0..rows {
            out[r * n + new_col] = m[r * n + old_col];
        }
    }
    out
}

/// Computes the eigenvalues and eigenvectors of a symmetric matrix.
///
/// Uses the default [`JacobiCriteria`] (100 rotations, tolerance `1e-10`).
///
/// The input is assumed symmetric. A non-symmetric matrix is processed without complaint,
/// but only its upper triangle drives the rotations and the output has no mathematical
/// meaning.
///
/// # Errors
///
/// Fails with [`LinalgError::NotMatrix`] or [`LinalgError::NotSquare`] for non-square input.
///
/// # Example
///
/// ```
/// use spine_linalg::eig;
/// use spine_tensor::NDArray;
///
/// let a = NDArray::from_rows(&[[1.0, 1.0], [1.0, 1.0]]).unwrap();
/// let res = eig(&a).unwrap();
/// assert!((res.eigenvalues[0] - 2.0).abs() < 1e-10);
/// assert!(res.eigenvalues[1].abs() < 1e-10);
/// ```
pub fn eig(a: &NDArray) -> Result<EigResult, LinalgError> {
    eig_with_criteria(a, &JacobiCriteria::default())
}

/// Same as [`eig`] with an explicit stopping rule.
///
/// # Errors
///
/// Fails with [`LinalgError::NotMatrix`] or [`LinalgError::NotSquare`] for non-square input.
pub fn eig_with_criteria(
    a: &NDArray,
    criteria: &JacobiCriteria,
) -> Result<EigResult, LinalgError> {
    let n = square_dim(a)?;

    let JacobiOutput {
        values,
        vectors,
        convergence,
    } = jacobi_eigen(a.as_slice().to_vec(), n, criteria);

    let order = descending_order(&values);
    let eigenvalues = order.iter().map(|&i| values[i]).collect();
    let eigenvectors = NDArray::from_shape_vec([n, n], permute_columns(&vectors, n, n, &order))?;

    Ok(EigResult {
        eigenvalues,
        eigenvectors,
        convergence,
    })
}
