use spine_tensor::NDArray;

use crate::error::LinalgError;

/// Returns `(rows, cols)` or fails with [`LinalgError::NotMatrix`].
pub(crate) fn matrix_dims(a: &NDArray) -> Result<(usize, usize), LinalgError> {
    match a.shape() {
        &[rows, cols] => Ok((rows, cols)),
        other => Err(LinalgError::NotMatrix { ndim: other.len() }),
    }
}

/// Returns the order of a square matrix or fails with a shape error.
pub(crate) fn square_dim(a: &NDArray) -> Result<usize, LinalgError> {
    let (rows, cols) = matrix_dims(a)?;
    if rows != cols {
        return Err(LinalgError::NotSquare { rows, cols });
    }
    Ok(rows)
}

/// Stable permutation sorting `keys` by descending magnitude.
pub(crate) fn descending_order(keys: &[f64]) -> Vec<usize> {
    let mut order: Vec<usize> = (0..keys.len()).collect();
    order.sort_by(|&i, &j| keys[j].abs().total_cmp(&keys[i].abs()));
    order
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn descending_order_is_stable() {
        assert_eq!(descending_order(&[1.0, -3.0, 2.0, 3.0]), vec![1, 3, 2, 0]);
        assert!(descending_order(&[]).is_empty());
    }

    #[test]
    fn square_dim_rejects_rectangular() -> Result<(), Box<dyn std::error::Error>> {
        let a = NDArray::zeros([2, 3]);
        assert_eq!(
            square_dim(&a),
            Err(LinalgError::NotSquare { rows: 2, cols: 3 })
        );
        let v = NDArray::zeros([4]);
        assert_eq!(matrix_dims(&v), Err(LinalgError::NotMatrix { ndim: 1 }));
        assert_eq!(square_dim(&NDArray::zeros([3, 3]))?, 3);
        Ok(())
    }
}
