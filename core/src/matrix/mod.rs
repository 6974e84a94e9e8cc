//! Dense row-major matrices of `f64`.
//!
//! # What is a Matrix here?
//!
//! A [`Matrix`] is a rectangular grid of 64-bit floats with a fixed row count and
//! column count, both at least 1. Data is stored in a single flat `Vec<f64>` in
//! **row-major** order: element `(i, j)` lives at index `i * cols + j`. Because the
//! storage is one contiguous buffer, "jagged" matrices cannot be represented at all.
//!
//! ```rust
//! use attn_rs::matrix::Matrix;
//!
//! let m = Matrix::new(vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0], [2, 3]).unwrap();
//! assert_eq!(m.shape(), [2, 3]);
//! assert_eq!(m.row(1), &[4.0, 5.0, 6.0]);
//! ```
//!
//! # Mutation
//!
//! Operations in [`ops`] never mutate their arguments; each returns a freshly
//! allocated matrix. The exceptions are the operations that take `self` **by value**
//! (for example [`Matrix::scale`]): they reuse the buffer in place, and the move makes
//! the pre-mutation value unreachable to the caller.

use std::fmt;
use thiserror::Error;

pub mod init;
pub mod ops;

pub use init::DEFAULT_INIT_STD;
pub use ops::{multiply, softmax, softmax_row, transpose};

/// Error type for matrix operations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MatrixError {
    /// Inner dimensions of a binary operation disagree.
    #[error("Dimension mismatch in {op}: left is {left:?}, right is {right:?}")]
    DimensionMismatch {
        op: &'static str,
        left: [usize; 2],
        right: [usize; 2],
    },
    /// The amount of data does not match the requested shape.
    #[error("Shape mismatch: expected {expected:?}, got {got:?}")]
    ShapeMismatch {
        expected: Vec<usize>,
        got: Vec<usize>,
    },
    /// A matrix, row or id sequence with zero elements.
    #[error("Empty input: {0}")]
    EmptyInput(&'static str),
    /// Row-wise construction with rows of different lengths.
    #[error("Jagged rows: row {row} has {got} columns, expected {expected}")]
    JaggedRows {
        row: usize,
        expected: usize,
        got: usize,
    },
    #[error("Index out of bounds: index {index:?} for shape {shape:?}")]
    IndexOutOfBounds {
        index: Vec<usize>,
        shape: Vec<usize>,
    },
    /// A numeric parameter outside its valid domain (non-finite, zero divisor, ...).
    #[error("Invalid value for {name}: {value}")]
    InvalidParameter { name: &'static str, value: f64 },
}

pub type Result<T> = std::result::Result<T, MatrixError>;

/// A dense `rows x cols` matrix of `f64`, stored row-major.
///
/// Invariant: `rows >= 1`, `cols >= 1` and `data.len() == rows * cols`.
#[derive(Clone, PartialEq)]
pub struct Matrix {
    rows: usize,
    cols: usize,
    data: Vec<f64>,
}

impl Matrix {
    /// Creates a matrix from flat row-major data and a `[rows, cols]` shape.
    ///
    /// # Errors
    ///
    /// - `MatrixError::EmptyInput` if either dimension is zero.
    /// - `MatrixError::ShapeMismatch` if `data.len() != rows * cols`.
    /// - `MatrixError::InvalidParameter` if any entry is `NaN` or infinite.
    pub fn new(data: Vec<f64>, shape: [usize; 2]) -> Result<Self> {
        let [rows, cols] = shape;
        check_non_empty(shape)?;
        if data.len() != rows * cols {
            return Err(MatrixError::ShapeMismatch {
                expected: vec![rows * cols],
                got: vec![data.len()],
            });
        }
        check_finite(&data)?;
        Ok(Self { rows, cols, data })
    }

    /// Creates a matrix filled with zeros.
    pub fn zeros(shape: [usize; 2]) -> Result<Self> {
        check_non_empty(shape)?;
        Ok(Self::from_parts(shape, vec![0.0; shape[0] * shape[1]]))
    }

    /// Creates an `n x n` identity matrix.
    pub fn identity(n: usize) -> Result<Self> {
        let mut out = Self::zeros([n, n])?;
        for i in 0..n {
            out.data[i * n + i] = 1.0;
        }
        Ok(out)
    }

    /// Creates a matrix from a slice of rows.
    ///
    /// # Errors
    ///
    /// - `MatrixError::EmptyInput` if there are no rows or the first row is empty.
    /// - `MatrixError::JaggedRows` if any row differs in length from the first.
    /// - `MatrixError::InvalidParameter` if any entry is `NaN` or infinite.
    pub fn from_rows<R: AsRef<[f64]>>(rows: &[R]) -> Result<Self> {
        let first = rows
            .first()
            .ok_or(MatrixError::EmptyInput("matrix has no rows"))?;
        let cols = first.as_ref().len();
        if cols == 0 {
            return Err(MatrixError::EmptyInput("matrix has no columns"));
        }

        let mut data = Vec::with_capacity(rows.len() * cols);
        for (row, values) in rows.iter().enumerate() {
            let values = values.as_ref();
            if values.len() != cols {
                return Err(MatrixError::JaggedRows {
                    row,
                    expected: cols,
                    got: values.len(),
                });
            }
            data.extend_from_slice(values);
        }
        check_finite(&data)?;
        Ok(Self::from_parts([rows.len(), cols], data))
    }

    /// Builds a matrix whose shape was already validated by the caller.
    pub(crate) fn from_parts(shape: [usize; 2], data: Vec<f64>) -> Self {
        debug_assert!(shape[0] > 0 && shape[1] > 0);
        debug_assert_eq!(data.len(), shape[0] * shape[1]);
        Self {
            rows: shape[0],
            cols: shape[1],
            data,
        }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Returns `[rows, cols]`.
    pub fn shape(&self) -> [usize; 2] {
        [self.rows, self.cols]
    }

    /// Returns the underlying row-major data.
    pub fn data(&self) -> &[f64] {
        &self.data
    }

    /// Returns the underlying row-major data mutably.
    pub fn data_mut(&mut self) -> &mut [f64] {
        &mut self.data
    }

    /// Consumes the matrix and returns its row-major buffer.
    pub fn into_data(self) -> Vec<f64> {
        self.data
    }

    /// Returns row `i` as a slice.
    ///
    /// # Panics
    ///
    /// Panics if `i >= rows`.
    pub fn row(&self, i: usize) -> &[f64] {
        &self.data[i * self.cols..(i + 1) * self.cols]
    }

    /// Returns the element at `(row, col)`, or `None` when out of bounds.
    pub fn get(&self, row: usize, col: usize) -> Option<f64> {
        if row < self.rows && col < self.cols {
            Some(self.data[row * self.cols + col])
        } else {
            None
        }
    }

    /// Iterates over the rows as slices.
    pub fn iter_rows(&self) -> impl Iterator<Item = &[f64]> {
        self.data.chunks_exact(self.cols)
    }

    /// Copies the matrix into a `Vec` of rows.
    pub fn to_rows(&self) -> Vec<Vec<f64>> {
        self.iter_rows().map(<[f64]>::to_vec).collect()
    }
}

fn check_non_empty(shape: [usize; 2]) -> Result<()> {
    if shape[0] == 0 {
        return Err(MatrixError::EmptyInput("matrix has no rows"));
    }
    if shape[1] == 0 {
        return Err(MatrixError::EmptyInput("matrix has no columns"));
    }
    Ok(())
}

fn check_finite(data: &[f64]) -> Result<()> {
    match data.iter().find(|v| !v.is_finite()) {
        Some(&value) => Err(MatrixError::InvalidParameter {
            name: "entry",
            value,
        }),
        None => Ok(()),
    }
}

impl fmt::Debug for Matrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Matrix")
            .field("shape", &self.shape())
            .field("rows", &self.to_rows())
            .finish()
    }
}

/// Prints one row per line with four decimals.
impl fmt::Display for Matrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, row) in self.iter_rows().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "[")?;
            for (j, v) in row.iter().enumerate() {
                if j > 0 {
                    write!(f, ", ")?;
                }
                write!(f, "{v:.4}")?;
            }
            write!(f, "]")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_matrix_creation() {
        let data = vec![1.0, 2.0, 3.0, 4.0];
        let m = Matrix::new(data.clone(), [2, 2]).unwrap();
        assert_eq!(m.shape(), [2, 2]);
        assert_eq!(m.data(), &data[..]);

        // Size mismatch
        let err = Matrix::new(vec![1.0, 2.0, 3.0], [2, 2]);
        assert!(matches!(err, Err(MatrixError::ShapeMismatch { .. })));
    }

    #[test]
    fn test_empty_shapes_rejected() {
        assert!(matches!(
            Matrix::new(vec![], [0, 3]),
            Err(MatrixError::EmptyInput(_))
        ));
        assert!(matches!(
            Matrix::zeros([3, 0]),
            Err(MatrixError::EmptyInput(_))
        ));
        let no_rows: [Vec<f64>; 0] = [];
        assert!(matches!(
            Matrix::from_rows(&no_rows),
            Err(MatrixError::EmptyInput(_))
        ));
    }

    #[test]
    fn test_from_rows() {
        let m = Matrix::from_rows(&[vec![1.0, 2.0], vec![3.0, 4.0], vec![5.0, 6.0]]).unwrap();
        assert_eq!(m.shape(), [3, 2]);
        assert_eq!(m.row(2), &[5.0, 6.0]);
        assert_eq!(m.get(1, 0), Some(3.0));
        assert_eq!(m.get(3, 0), None);
    }

    #[test]
    fn test_non_finite_entries_rejected() {
        assert!(matches!(
            Matrix::new(vec![1.0, f64::NAN], [1, 2]),
            Err(MatrixError::InvalidParameter { name: "entry", .. })
        ));
        assert_eq!(
            Matrix::from_rows(&[[f64::INFINITY, 0.0]]),
            Err(MatrixError::InvalidParameter {
                name: "entry",
                value: f64::INFINITY
            })
        );
    }

    #[test]
    fn test_from_rows_jagged() {
        let err = Matrix::from_rows(&[vec![1.0, 2.0], vec![3.0]]);
        assert_eq!(
            err,
            Err(MatrixError::JaggedRows {
                row: 1,
                expected: 2,
                got: 1
            })
        );
    }

    #[test]
    fn test_identity() {
        let eye = Matrix::identity(3).unwrap();
        assert_eq!(
            eye.to_rows(),
            vec![
                vec![1.0, 0.0, 0.0],
                vec![0.0, 1.0, 0.0],
                vec![0.0, 0.0, 1.0]
            ]
        );
    }

    #[test]
    fn test_macro_literal() {
        let m = crate::matrix![[1.0, 2.0, 3.0], [4.0, 5.0, 6.0]];
        assert_eq!(m.shape(), [2, 3]);
        assert_eq!(m.data(), &[1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
    }

    #[test]
    fn test_display() {
        let m = crate::matrix![[1.0, 0.5], [0.25, 0.0]];
        assert_eq!(m.to_string(), "[1.0000, 0.5000]\n[0.2500, 0.0000]");
    }
}
