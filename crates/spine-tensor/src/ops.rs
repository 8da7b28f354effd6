//! Matrix helpers for 2-D arrays.
//!
//! These are the few building blocks the decompositions and their tests need. They always
//! allocate a new array and never modify their inputs.

use crate::array::{ArrayError, NDArray};

fn matrix_dims(a: &NDArray) -> Result<(usize, usize), ArrayError> {
    match a.shape() {
        &[rows, cols] => Ok((rows, cols)),
        other => Err(ArrayError::DimensionMismatch {
            message: "expected a 2-D array".to_string(),
            expected: "2 dimensions".to_string(),
            actual: format!("{} dimensions {:?}", other.len(), other),
        }),
    }
}

/// Creates an `n x n` identity matrix.
pub fn eye(n: usize) -> NDArray {
    NDArray::from_shape_fn([n, n], |idx| if idx[0] == idx[1] { 1.0 } else { 0.0 })
}

/// Creates a square matrix with `values` on the diagonal.
pub fn diag(values: &[f64]) -> NDArray {
    let n = values.len();
    NDArray::from_shape_fn([n, n], |idx| if idx[0] == idx[1] { values[idx[0]] } else { 0.0 })
}

/// Transposes a 2-D array.
///
/// # Example
///
/// ```
/// use spine_tensor::{ops, NDArray};
///
/// let a = NDArray::from_shape_vec([2, 3], vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0]).unwrap();
/// let at = ops::transpose(&a).unwrap();
/// assert_eq!(at.shape(), &[3, 2]);
/// assert_eq!(at.as_slice(), &[1.0, 4.0, 2.0, 5.0, 3.0, 6.0]);
/// ```
pub fn transpose(a: &NDArray) -> Result<NDArray, ArrayError> {
    let (rows, cols) = matrix_dims(a)?;
    let src = a.as_slice();
    Ok(NDArray::from_shape_fn([cols, rows], |idx| {
        src[idx[1] * cols + idx[0]]
    }))
}

/// Multiplies two 2-D arrays.
///
/// # Errors
///
/// Returns [`ArrayError::DimensionMismatch`] if either operand is not 2-D or the inner
/// dimensions differ.
pub fn matmul(lhs: &NDArray, rhs: &NDArray) -> Result<NDArray, ArrayError> {
    let (m, k) = matrix_dims(lhs)?;
    let (k2, n) = matrix_dims(rhs)?;
    if k != k2 {
        return Err(ArrayError::dimension_mismatch(
            "matmul inner dimensions differ",
            &[k, n],
            rhs.shape(),
        ));
    }

    let a = lhs.as_slice();
    let b = rhs.as_slice();
    let mut out = vec![0.0; m * n];
    for i in 0..m {
        let out_row = &mut out[i * n..(i + 1) * n];
        for p in 0..k {
            let a_ip = a[i * k + p];
            if a_ip == 0.0 {
                continue;
            }
            let b_row = &b[p * n..(p + 1) * n];
            for (o, &b_pj) in out_row.iter_mut().zip(b_row) {
                *o += a_ip * b_pj;
            }
        }
    }
    NDArray::from_shape_vec([m, n], out)
}

/// Extracts column `j` of a 2-D array.
///
/// # Errors
///
/// Fails if the array is not 2-D or `j` is out of bounds.
pub fn column(a: &NDArray, j: usize) -> Result<Vec<f64>, ArrayError> {
    let (rows, cols) = matrix_dims(a)?;
    if j >= cols {
        return Err(ArrayError::index_out_of_bounds(j, cols));
    }
    Ok((0..rows).map(|i| a.as_slice()[i * cols + j]).collect())
}

/// Returns the largest element-wise absolute difference between two arrays of equal shape.
///
/// # Errors
///
/// Returns [`ArrayError::DimensionMismatch`] if the shapes differ.
pub fn max_abs_diff(lhs: &NDArray, rhs: &NDArray) -> Result<f64, ArrayError> {
    if lhs.shape() != rhs.shape() {
        return Err(ArrayError::dimension_mismatch(
            "arrays must have the same shape",
            lhs.shape(),
            rhs.shape(),
        ));
    }
    Ok(lhs
        .iter()
        .zip(rhs.iter())
        .fold(0.0_f64, |acc, (a, b)| acc.max((a - b).abs())))
}
