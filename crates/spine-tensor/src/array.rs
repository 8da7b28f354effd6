use std::fmt;

use thiserror::Error;

use crate::dtype::DType;

/// Error type for array construction and element access.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ArrayError {
    /// The buffer length does not match the product of the shape.
    ///
    /// # Example
    /// ```ignore
    /// // Error: shape [2, 3] expects 6 elements, but got 5
    /// let a = NDArray::from_shape_vec([2, 3], vec![1.0, 2.0, 3.0, 4.0, 5.0])?;
    /// ```
    #[error("Shape mismatch: expected {expected} elements for shape, but got {actual} elements in data")]
    InvalidShape {
        /// Expected number of elements based on shape
        expected: usize,
        /// Actual number of elements in the data
        actual: usize,
    },

    /// The coordinate has a different length than the number of dimensions.
    #[error("Index rank mismatch: array has {expected} dimensions, but {actual} indices were given")]
    IndexRank {
        /// Number of dimensions of the array
        expected: usize,
        /// Number of indices supplied
        actual: usize,
    },

    /// An index exceeds the bounds of its dimension.
    #[error("Index {index} out of bounds for dimension of size {size}")]
    IndexOutOfBounds {
        /// The invalid index that was attempted
        index: usize,
        /// The size of the dimension being indexed
        size: usize,
    },

    /// The product of the shape does not fit in `usize`.
    #[error("Shape overflow: the product of shape {0:?} does not fit in usize")]
    ShapeOverflow(Vec<usize>),

    /// Array dimensions are incompatible for the requested operation.
    ///
    /// # Examples
    /// - Matrix multiplication with incompatible inner dimensions
    /// - Building a matrix from ragged rows
    #[error("Dimension mismatch: {message}. Expected shape: {expected}, got: {actual}")]
    DimensionMismatch {
        /// Human-readable description of the mismatch
        message: String,
        /// Expected shape description
        expected: String,
        /// Actual shape description
        actual: String,
    },
}

impl ArrayError {
    /// Creates an InvalidShape error with clear context.
    pub fn invalid_shape(expected: usize, actual: usize) -> Self {
        Self::InvalidShape { expected, actual }
    }

    /// Creates an IndexOutOfBounds error with clear context.
    pub fn index_out_of_bounds(index: usize, size: usize) -> Self {
        Self::IndexOutOfBounds { index, size }
    }

    /// Creates a DimensionMismatch error with formatted shapes.
    pub fn dimension_mismatch(
        message: impl Into<String>,
        expected: &[usize],
        actual: &[usize],
    ) -> Self {
        Self::DimensionMismatch {
            message: message.into(),
            expected: format!("{:?}", expected),
            actual: format!("{:?}", actual),
        }
    }
}

/// Computes the strides for a row-major (C-contiguous) layout.
///
/// The rightmost dimension has stride 1 and each dimension's stride is the product of all
/// dimensions to its right. Strides saturate at `usize::MAX`, which only happens for shapes
/// that also hold a zero extent and therefore have no addressable element.
///
/// # Examples
///
/// ```rust
/// use spine_tensor::get_strides_from_shape;
///
/// assert_eq!(get_strides_from_shape(&[2, 3]), vec![3, 1]);
/// assert_eq!(get_strides_from_shape(&[2, 3, 4]), vec![12, 4, 1]);
/// ```
pub fn get_strides_from_shape(shape: &[usize]) -> Vec<usize> {
    let mut strides = vec![0; shape.len()];
    let mut stride: usize = 1;
    for i in (0..shape.len()).rev() {
        strides[i] = stride;
        stride = stride.saturating_mul(shape[i]);
    }
    strides
}

/// Returns the number of elements of `shape`, or `None` if it overflows `usize`.
fn checked_numel(shape: &[usize]) -> Option<usize> {
    if shape.contains(&0) {
        return Some(0);
    }
    shape.iter().try_fold(1usize, |acc, &d| acc.checked_mul(d))
}

/// A dense multi-dimensional array of `f64` values with owned, row-major storage.
///
/// The array keeps three invariants that every constructor enforces:
///
/// * `data.len() == shape.iter().product()`
/// * `strides` are the row-major strides of `shape`
/// * the buffer is exclusively owned, `clone` performs a deep copy
///
/// Elements are only mutated through [`NDArray::set_item`];
/// there is no resizing, broadcasting or aliasing view.
///
/// # Examples
///
/// ```rust
/// use spine_tensor::NDArray;
///
/// let mut a = NDArray::zeros([2, 2]);
/// a.set_item(&[0, 1], 4.0).unwrap();
/// assert_eq!(a.as_slice(), &[0.0, 4.0, 0.0, 0.0]);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct NDArray {
    data: Vec<f64>,
    shape: Vec<usize>,
    strides: Vec<usize>,
    dtype: DType,
}

impl NDArray {
    /// Creates a new array adopting `data` as its buffer.
    ///
    /// # Errors
    ///
    /// Returns [`ArrayError::InvalidShape`] if the number of elements in `data` does not
    /// match the product of `shape`, and [`ArrayError::ShapeOverflow`] if that product does
    /// not fit in `usize`.
    ///
    /// # Example
    ///
    /// ```
    /// use spine_tensor::NDArray;
    ///
    /// let a = NDArray::from_shape_vec([2, 2], vec![1.0, 2.0, 3.0, 4.0]).unwrap();
    /// assert_eq!(a.shape(), &[2, 2]);
    /// ```
    pub fn from_shape_vec(shape: impl Into<Vec<usize>>, data: Vec<f64>) -> Result<Self, ArrayError> {
        let shape = shape.into();
        let numel =
            checked_numel(&shape).ok_or_else(|| ArrayError::ShapeOverflow(shape.clone()))?;
        if numel != data.len() {
            return Err(ArrayError::invalid_shape(numel, data.len()));
        }
        let strides = get_strides_from_shape(&shape);
        Ok(Self {
            data,
            shape,
            strides,
            dtype: DType::default(),
        })
    }

    /// Creates a new array copying the elements of `data`.
    ///
    /// # Errors
    ///
    /// Returns [`ArrayError::InvalidShape`] if the number of elements does not match the shape.
    pub fn from_shape_slice(shape: impl Into<Vec<usize>>, data: &[f64]) -> Result<Self, ArrayError> {
        Self::from_shape_vec(shape, data.to_vec())
    }

    /// Creates a new array with every element set to `value`.
    ///
    /// # Panics
    ///
    /// Panics if the product of `shape` overflows `usize`, like any allocation of that size.
    pub fn from_shape_val(shape: impl Into<Vec<usize>>, value: f64) -> Self {
        let shape = shape.into();
        let Some(numel) = checked_numel(&shape) else {
            panic!("shape {shape:?} overflows usize");
        };
        let strides = get_strides_from_shape(&shape);
        Self {
            data: vec![value; numel],
            shape,
            strides,
            dtype: DType::default(),
        }
    }

    /// Creates a new array generating each element from its coordinate.
    ///
    /// # Panics
    ///
    /// Panics if the product of `shape` overflows `usize`.
    ///
    /// # Example
    ///
    /// ```
    /// use spine_tensor::NDArray;
    ///
    /// let t = NDArray::from_shape_fn([2, 2], |idx| (idx[0] * 2 + idx[1]) as f64);
    /// assert_eq!(t.as_slice(), &[0.0, 1.0, 2.0, 3.0]);
    /// ```
    pub fn from_shape_fn<F>(shape: impl Into<Vec<usize>>, f: F) -> Self
    where
        F: Fn(&[usize]) -> f64,
    {
        let shape = shape.into();
        let Some(numel) = checked_numel(&shape) else {
            panic!("shape {shape:?} overflows usize");
        };
        let mut index = vec![0; shape.len()];
        let data = (0..numel)
            .map(|i| {
                let mut j = i;
                for k in (0..shape.len()).rev() {
                    index[k] = j % shape[k];
                    j /= shape[k];
                }
                f(&index)
            })
            .collect();
        let strides = get_strides_from_shape(&shape);
        Self {
            data,
            shape,
            strides,
            dtype: DType::default(),
        }
    }

    /// Creates a new array filled with zeros.
    pub fn zeros(shape: impl Into<Vec<usize>>) -> Self {
        Self::from_shape_val(shape, 0.0)
    }

    /// Creates a 2-D array from a table of rows.
    ///
    /// This is the entry point for collaborators that hold plain numeric tables.
    ///
    /// # Errors
    ///
    /// Returns [`ArrayError::DimensionMismatch`] if the rows have different lengths.
    ///
    /// # Example
    ///
    /// ```
    /// use spine_tensor::NDArray;
    ///
    /// let a = NDArray::from_rows(&[[1.0, 2.0], [3.0, 4.0], [5.0, 6.0]]).unwrap();
    /// assert_eq!(a.shape(), &[3, 2]);
    /// ```
    pub fn from_rows<R: AsRef<[f64]>>(rows: &[R]) -> Result<Self, ArrayError> {
        let cols = rows.first().map_or(0, |r| r.as_ref().len());
        let mut data = Vec::with_capacity(rows.len() * cols);
        for (i, row) in rows.iter().enumerate() {
            let row = row.as_ref();
            if row.len() != cols {
                return Err(ArrayError::dimension_mismatch(
                    format!("row {i} has a different length than row 0"),
                    &[cols],
                    &[row.len()],
                ));
            }
            data.extend_from_slice(row);
        }
        Self::from_shape_vec([rows.len(), cols], data)
    }

    /// Replaces the informational dtype tag.
    pub fn with_dtype(mut self, dtype: DType) -> Self {
        self.dtype = dtype;
        self
    }

    /// Returns the number of elements in the array.
    #[inline]
    pub fn size(&self) -> usize {
        self.data.len()
    }

    /// Returns true if the array holds no elements.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Returns the number of dimensions.
    #[inline]
    pub fn ndim(&self) -> usize {
        self.shape.len()
    }

    /// Returns the shape of the array.
    #[inline]
    pub fn shape(&self) -> &[usize] {
        &self.shape
    }

    /// Returns an owned copy of the shape.
    pub fn get_shape(&self) -> Vec<usize> {
        self.shape.clone()
    }

    /// Returns the row-major strides of the array.
    #[inline]
    pub fn strides(&self) -> &[usize] {
        &self.strides
    }

    /// Returns the informational dtype tag.
    #[inline]
    pub fn dtype(&self) -> DType {
        self.dtype
    }

    /// Returns the underlying buffer in row-major order.
    #[inline]
    pub fn as_slice(&self) -> &[f64] {
        &self.data
    }

    /// Returns an iterator over the elements in row-major order.
    pub fn iter(&self) -> std::slice::Iter<'_, f64> {
        self.data.iter()
    }

    /// Get the buffer offset of the element at the given coordinate.
    ///
    /// # Errors
    ///
    /// Returns [`ArrayError::IndexRank`] if `index.len() != ndim` and
    /// [`ArrayError::IndexOutOfBounds`] if any index exceeds its dimension.
    pub fn get_iter_offset(&self, index: &[usize]) -> Result<usize, ArrayError> {
        if index.len() != self.ndim() {
            return Err(ArrayError::IndexRank {
                expected: self.ndim(),
                actual: index.len(),
            });
        }
        let mut offset = 0;
        for ((&idx, &dim_size), &stride) in index.iter().zip(&self.shape).zip(&self.strides) {
            if idx >= dim_size {
                return Err(ArrayError::index_out_of_bounds(idx, dim_size));
            }
            offset += idx * stride;
        }
        Ok(offset)
    }

    /// Get the buffer offset of the element at the given coordinate without checking bounds.
    pub fn get_iter_offset_unchecked(&self, index: &[usize]) -> usize {
        index
            .iter()
            .zip(&self.strides)
            .fold(0, |acc, (&idx, &stride)| acc + idx * stride)
    }

    /// Get the coordinate of the element at the given buffer offset.
    /// The reverse of [`Self::get_iter_offset`].
    ///
    /// # Errors
    ///
    /// If the offset is out of bounds (>= size), an error is returned.
    pub fn get_index(&self, offset: usize) -> Result<Vec<usize>, ArrayError> {
        if offset >= self.size() {
            return Err(ArrayError::index_out_of_bounds(offset, self.size()));
        }
        let mut rem = offset;
        let idx = self
            .strides
            .iter()
            .map(|&s| {
                let i = rem / s;
                rem %= s;
                i
            })
            .collect();
        Ok(idx)
    }

    /// Returns the element at the given coordinate.
    ///
    /// # Errors
    ///
    /// Fails if the coordinate length differs from `ndim` or any index is out of bounds.
    ///
    /// # Example
    ///
    /// ```
    /// use spine_tensor::NDArray;
    ///
    /// let t = NDArray::from_shape_vec([2, 2], vec![1.0, 2.0, 3.0, 4.0]).unwrap();
    /// assert_eq!(t.get_item(&[1, 0]).unwrap(), 3.0);
    /// assert!(t.get_item(&[2, 0]).is_err());
    /// assert!(t.get_item(&[0]).is_err());
    /// ```
    pub fn get_item(&self, index: &[usize]) -> Result<f64, ArrayError> {
        let offset = self.get_iter_offset(index)?;
        Ok(self.data[offset])
    }

    /// Sets the element at the given coordinate.
    ///
    /// # Errors
    ///
    /// Fails if the coordinate length differs from `ndim` or any index is out of bounds.
    pub fn set_item(&mut self, index: &[usize], value: f64) -> Result<(), ArrayError> {
        let offset = self.get_iter_offset(index)?;
        self.data[offset] = value;
        Ok(())
    }

    /// Returns the element at the given coordinate without validating each dimension.
    ///
    /// # Panics
    ///
    /// Panics if the resolved offset falls outside the buffer.
    #[inline]
    pub fn get_unchecked(&self, index: &[usize]) -> f64 {
        self.data[self.get_iter_offset_unchecked(index)]
    }

    /// Apply a function to each element of the array.
    ///
    /// # Example
    ///
    /// ```
    /// use spine_tensor::NDArray;
    ///
    /// let t = NDArray::from_shape_vec([4], vec![1.0, 2.0, 3.0, 4.0]).unwrap();
    /// let t2 = t.map(|x| x * 2.0);
    /// assert_eq!(t2.as_slice(), &[2.0, 4.0, 6.0, 8.0]);
    /// ```
    pub fn map<F>(&self, f: F) -> Self
    where
        F: Fn(f64) -> f64,
    {
        Self {
            data: self.data.iter().map(|&x| f(x)).collect(),
            shape: self.shape.clone(),
            strides: self.strides.clone(),
            dtype: self.dtype,
        }
    }
}

impl fmt::Display for NDArray {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.ndim() != 2 {
            return write!(f, "NDArray(shape={:?}, data={:?})", self.shape, self.data);
        }
        let cols = self.shape[1];
        writeln!(f, "[")?;
        for row in self.data.chunks(cols.max(1)) {
            write!(f, "  [")?;
            for (j, v) in row.iter().enumerate() {
                if j > 0 {
                    write!(f, ", ")?;
                }
                write!(f, "{v:>12.6}")?;
            }
            writeln!(f, "]")?;
        }
        write!(f, "]")
    }
}
