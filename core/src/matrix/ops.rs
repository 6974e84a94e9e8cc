//! Matrix operations.
//!
//! # Overview
//!
//! - **Multiplication**: [`Matrix::matmul`] is the reference triple loop,
//!   `C[i][j] = Σ_k A[i][k] · B[k][j]`, with no numerical shortcuts.
//!   [`Matrix::matmul_fast`] delegates to the `attn-rs-kernels` crate and computes
//!   output rows in parallel; it must agree with the reference within floating-point
//!   tolerance.
//! - **Transpose**: always succeeds for a valid matrix.
//! - **Softmax**: row-wise and max-subtracted, so large scores never overflow `exp`.
//!   Rows are independent and are normalized in parallel with `rayon`.
//!
//! # Examples
//!
//! ```rust
//! use attn_rs::matrix;
//!
//! let a = matrix![[1.0, 2.0, 3.0], [4.0, 5.0, 6.0]];
//! let b = matrix![[7.0, 8.0], [9.0, 1.0], [2.0, 3.0]];
//!
//! let c = a.matmul(&b).unwrap();
//! assert_eq!(c.data(), &[31.0, 19.0, 85.0, 55.0]);
//! ```

use super::{Matrix, MatrixError, Result};
use rayon::prelude::*;

impl Matrix {
    /// Reference matrix multiplication: `[M, K] x [K, N] -> [M, N]`.
    ///
    /// Runs in `O(M·K·N)` and allocates a fresh output.
    ///
    /// # Errors
    ///
    /// Returns `MatrixError::DimensionMismatch` if `self.cols() != rhs.rows()`.
    pub fn matmul(&self, rhs: &Matrix) -> Result<Matrix> {
        self.check_inner_dims("matmul", rhs)?;
        let (m, k, n) = (self.rows, self.cols, rhs.cols);

        let mut out = vec![0.0; m * n];
        for i in 0..m {
            for j in 0..n {
                let mut sum = 0.0;
                for l in 0..k {
                    sum += self.data[i * k + l] * rhs.data[l * n + j];
                }
                out[i * n + j] = sum;
            }
        }
        Ok(Matrix::from_parts([m, n], out))
    }

    /// Kernel-backed matrix multiplication with the same semantics as [`Matrix::matmul`].
    ///
    /// Output rows are computed in parallel over a transposed copy of `rhs`.
    pub fn matmul_fast(&self, rhs: &Matrix) -> Result<Matrix> {
        self.check_inner_dims("matmul_fast", rhs)?;

        // This is where a BLAS call would be swapped in.
        let out_data =
            attn_rs_kernels::cpu_matmul(&self.data, &rhs.data, &self.shape(), &rhs.shape())
                .map_err(|e| match e {
                    attn_rs_kernels::KernelError::ShapeMismatch { expected, got } => {
                        MatrixError::ShapeMismatch { expected, got }
                    }
                })?;

        Ok(Matrix::from_parts([self.rows, rhs.cols], out_data))
    }

    fn check_inner_dims(&self, op: &'static str, rhs: &Matrix) -> Result<()> {
        if self.cols != rhs.rows {
            return Err(MatrixError::DimensionMismatch {
                op,
                left: self.shape(),
                right: rhs.shape(),
            });
        }
        Ok(())
    }

    /// Returns the `[cols, rows]` transpose.
    pub fn transpose(&self) -> Matrix {
        let (m, n) = (self.rows, self.cols);
        let mut out = vec![0.0; m * n];
        for i in 0..m {
            for j in 0..n {
                out[j * m + i] = self.data[i * n + j];
            }
        }
        Matrix::from_parts([n, m], out)
    }

    /// Row-wise softmax.
    ///
    /// Each output row is a probability distribution: entries lie in `[0, 1]` and
    /// sum to `1` within floating-point tolerance.
    pub fn softmax(&self) -> Result<Matrix> {
        self.clone().into_softmax()
    }

    /// Row-wise softmax that normalizes this matrix's own buffer.
    pub fn into_softmax(mut self) -> Result<Matrix> {
        self.data.par_chunks_mut(self.cols).try_for_each(softmax_row)?;
        Ok(self)
    }

    /// Divides every entry by `divisor`, reusing this matrix's buffer.
    ///
    /// Takes `self` by value: the matrix is mutated in place and handed back.
    ///
    /// # Errors
    ///
    /// Returns `MatrixError::InvalidParameter` if `divisor` is zero or not finite.
    pub fn scale(mut self, divisor: f64) -> Result<Matrix> {
        if divisor == 0.0 || !divisor.is_finite() {
            return Err(MatrixError::InvalidParameter {
                name: "divisor",
                value: divisor,
            });
        }
        self.data.par_iter_mut().for_each(|v| *v /= divisor);
        Ok(self)
    }

    /// Applies a function element-wise, returning a new matrix.
    ///
    /// ```rust
    /// use attn_rs::matrix;
    /// let m = matrix![[1.0, 2.0, 3.0]];
    /// assert_eq!(m.map(|x| x * x).data(), &[1.0, 4.0, 9.0]);
    /// ```
    pub fn map<F>(&self, f: F) -> Matrix
    where
        F: Fn(f64) -> f64 + Sync + Send,
    {
        let data = self.data.par_iter().map(|&v| f(v)).collect();
        Matrix::from_parts(self.shape(), data)
    }

    /// Largest absolute element-wise difference between two same-shaped matrices.
    pub fn max_abs_diff(&self, other: &Matrix) -> Result<f64> {
        if self.shape() != other.shape() {
            return Err(MatrixError::ShapeMismatch {
                expected: self.shape().to_vec(),
                got: other.shape().to_vec(),
            });
        }
        Ok(self
            .data
            .iter()
            .zip(other.data.iter())
            .map(|(a, b)| (a - b).abs())
            .fold(0.0, f64::max))
    }

    /// `true` when both matrices have the same shape and every entry differs by at most `tol`.
    pub fn approx_eq(&self, other: &Matrix, tol: f64) -> bool {
        self.max_abs_diff(other).is_ok_and(|d| d <= tol)
    }
}

/// Numerically stable softmax of a single row, in place.
///
/// The row maximum is subtracted before exponentiating, so the largest entry maps
/// to `exp(0) = 1` and the normalizer is always at least 1. Entries of `-∞` are
/// allowed and receive weight `0`, as long as the row maximum is finite.
///
/// # Errors
///
/// - `MatrixError::EmptyInput` for an empty row.
/// - `MatrixError::InvalidParameter` if the row contains `NaN` or `+∞`, or every
///   entry is `-∞`.
pub fn softmax_row(row: &mut [f64]) -> Result<()> {
    let max_val = row
        .iter()
        .copied()
        .reduce(f64::max)
        .ok_or(MatrixError::EmptyInput("softmax row is empty"))?;
    if !max_val.is_finite() {
        return Err(MatrixError::InvalidParameter {
            name: "softmax row max",
            value: max_val,
        });
    }
    if let Some(&value) = row.iter().find(|v| v.is_nan()) {
        return Err(MatrixError::InvalidParameter {
            name: "softmax entry",
            value,
        });
    }

    let mut sum_exp = 0.0;
    for v in row.iter_mut() {
        *v = (*v - max_val).exp();
        sum_exp += *v;
    }

    let inv_sum = 1.0 / sum_exp;
    for v in row.iter_mut() {
        *v *= inv_sum;
    }
    Ok(())
}

/// `A · B` with the reference kernel. See [`Matrix::matmul`].
pub fn multiply(a: &Matrix, b: &Matrix) -> Result<Matrix> {
    a.matmul(b)
}

/// `Aᵗ`. See [`Matrix::transpose`].
pub fn transpose(a: &Matrix) -> Matrix {
    a.transpose()
}

/// Row-wise softmax. See [`Matrix::softmax`].
pub fn softmax(a: &Matrix) -> Result<Matrix> {
    a.softmax()
}
