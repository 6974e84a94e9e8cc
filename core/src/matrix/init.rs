//! Random initialization.
//!
//! Weights are drawn from a Gaussian with a small standard deviation so that initial
//! attention scores stay near zero and the softmax starts out far from saturation.
//! The random source is always passed in by the caller; seed a
//! [`rand::rngs::StdRng`] to reproduce a matrix exactly.

use super::{check_non_empty, Matrix, MatrixError, Result};
use rand::Rng;
use rand_distr::{Distribution, StandardNormal};

/// Standard deviation used for projection and embedding weights.
pub const DEFAULT_INIT_STD: f64 = 0.02;

impl Matrix {
    /// Creates a matrix with entries drawn independently from `N(0, std²)`.
    ///
    /// # Errors
    ///
    /// - `MatrixError::EmptyInput` if either dimension is zero.
    /// - `MatrixError::InvalidParameter` if `std` is negative or not finite.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use attn_rs::matrix::{Matrix, DEFAULT_INIT_STD};
    /// use rand::{rngs::StdRng, SeedableRng};
    ///
    /// let a = Matrix::randn([4, 4], DEFAULT_INIT_STD, &mut StdRng::seed_from_u64(7)).unwrap();
    /// let b = Matrix::randn([4, 4], DEFAULT_INIT_STD, &mut StdRng::seed_from_u64(7)).unwrap();
    /// assert_eq!(a, b);
    /// ```
    pub fn randn<R: Rng + ?Sized>(shape: [usize; 2], std: f64, rng: &mut R) -> Result<Self> {
        check_non_empty(shape)?;
        if !(std.is_finite() && std >= 0.0) {
            return Err(MatrixError::InvalidParameter {
                name: "std",
                value: std,
            });
        }

        let data = (0..shape[0] * shape[1])
            .map(|_| {
                let z: f64 = StandardNormal.sample(rng);
                z * std
            })
            .collect();
        Ok(Matrix::from_parts(shape, data))
    }
}
