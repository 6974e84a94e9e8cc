//! Single-head causal self-attention.
//!
//! # Forward pass
//!
//! For an input `X` of shape `[S, D]` (sequence length x model width):
//!
//! 1. **Project**: `Q = X·W_Q`, `K = X·W_K`, `V = X·W_V`, each `[S, D]`.
//! 2. **Score**: `Q·Kᵗ`, an `[S, S]` matrix; entry `(i, j)` is how strongly
//!    position `i` queries position `j`.
//! 3. **Scale**: divide by `√D` so score magnitude does not grow with the width.
//! 4. **Mask**: every `(i, j)` with `j > i` is overwritten with `-∞`, so
//!    position `i` only sees positions `≤ i`.
//! 5. **Normalize**: row-wise softmax; masked entries end up with weight exactly
//!    `0`. The diagonal is never masked, so every row keeps a finite maximum.
//! 6. **Aggregate**: `weights·V`. Row `i` of the output is a convex combination
//!    of the value vectors at positions `≤ i`.
//!
//! The key/value width equals `D`; there is no head split.
//!
//! The score matrix is private to one call: it is moved through scale, mask and
//! softmax, each reusing the same buffer.

use log::debug;
use rand::Rng;
use std::fmt;

use crate::config::AttentionConfig;
use crate::matrix::{Matrix, MatrixError, Result};
use crate::nn::Module;

/// Hook receiving the post-softmax attention weights of every forward call.
pub trait AttentionObserver: Send + Sync {
    fn on_attention_weights(&self, weights: &Matrix);
}

/// Observer that writes attention weights to the `log` facade at `debug` level.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogObserver;

impl AttentionObserver for LogObserver {
    fn on_attention_weights(&self, weights: &Matrix) {
        debug!(
            "attention weights (after softmax) shape={:?}\n{}",
            weights.shape(),
            weights
        );
    }
}

/// Causal self-attention with learned projections `W_Q`, `W_K`, `W_V`, each `[D, D]`.
///
/// The weights are fixed after construction and `forward` takes `&self`, so one
/// block can serve concurrent forward passes on different inputs.
///
/// # Examples
///
/// ```rust
/// use attn_rs::matrix::Matrix;
/// use attn_rs::nn::SelfAttention;
/// use rand::{rngs::StdRng, SeedableRng};
///
/// let mut rng = StdRng::seed_from_u64(0);
/// let attn = SelfAttention::new(8, &mut rng).unwrap();
///
/// let x = Matrix::randn([5, 8], 1.0, &mut rng).unwrap();
/// let out = attn.forward(&x).unwrap();
/// assert_eq!(out.shape(), [5, 8]);
/// ```
pub struct SelfAttention {
    w_q: Matrix,
    w_k: Matrix,
    w_v: Matrix,
    d_model: usize,
    d_k: usize,
    observer: Option<Box<dyn AttentionObserver>>,
}

impl SelfAttention {
    /// Creates a block of width `d_model` with Gaussian(0, 0.02) weights drawn from `rng`.
    ///
    /// # Errors
    ///
    /// Returns `MatrixError::EmptyInput` if `d_model` is zero.
    pub fn new<R: Rng + ?Sized>(d_model: usize, rng: &mut R) -> Result<Self> {
        Self::from_config(&AttentionConfig::new(d_model), rng)
    }

    /// Creates a block using the width and init scale from `config`.
    pub fn from_config<R: Rng + ?Sized>(config: &AttentionConfig, rng: &mut R) -> Result<Self> {
        let d_model = config.d_model;
        if d_model == 0 {
            return Err(MatrixError::EmptyInput("d_model must be at least 1"));
        }

        // Key width equals the model width.
        let d_k = d_model;
        let w_q = Matrix::randn([d_model, d_k], config.init_std, rng)?;
        let w_k = Matrix::randn([d_model, d_k], config.init_std, rng)?;
        let w_v = Matrix::randn([d_model, d_k], config.init_std, rng)?;

        Ok(Self {
            w_q,
            w_k,
            w_v,
            d_model,
            d_k,
            observer: None,
        })
    }

    /// Creates a block from explicit projection weights.
    ///
    /// # Errors
    ///
    /// Returns `MatrixError::ShapeMismatch` unless `w_q` is square and `w_k`, `w_v`
    /// have the same shape as `w_q`.
    pub fn from_weights(w_q: Matrix, w_k: Matrix, w_v: Matrix) -> Result<Self> {
        let [d_model, d_k] = w_q.shape();
        if d_model != d_k {
            return Err(MatrixError::ShapeMismatch {
                expected: vec![d_model, d_model],
                got: w_q.shape().to_vec(),
            });
        }
        for w in [&w_k, &w_v] {
            if w.shape() != w_q.shape() {
                return Err(MatrixError::ShapeMismatch {
                    expected: w_q.shape().to_vec(),
                    got: w.shape().to_vec(),
                });
            }
        }

        Ok(Self {
            w_q,
            w_k,
            w_v,
            d_model,
            d_k,
            observer: None,
        })
    }

    /// Attaches an observer that is called with the attention weights of every forward pass.
    pub fn with_observer(mut self, observer: impl AttentionObserver + 'static) -> Self {
        self.observer = Some(Box::new(observer));
        self
    }

    pub fn d_model(&self) -> usize {
        self.d_model
    }

    pub fn d_k(&self) -> usize {
        self.d_k
    }

    pub fn w_q(&self) -> &Matrix {
        &self.w_q
    }

    pub fn w_k(&self) -> &Matrix {
        &self.w_k
    }

    pub fn w_v(&self) -> &Matrix {
        &self.w_v
    }

    /// Runs the causal attention forward pass on `x` (`[S, D]`) and returns `[S, D]`.
    ///
    /// # Errors
    ///
    /// Returns `MatrixError::DimensionMismatch` if `x.cols() != d_model`.
    pub fn forward(&self, x: &Matrix) -> Result<Matrix> {
        self.forward_with_weights(x).map(|(output, _)| output)
    }

    /// Like [`SelfAttention::forward`], additionally returning the `[S, S]` attention weights.
    pub fn forward_with_weights(&self, x: &Matrix) -> Result<(Matrix, Matrix)> {
        if x.cols() != self.d_model {
            return Err(MatrixError::DimensionMismatch {
                op: "self_attention",
                left: x.shape(),
                right: self.w_q.shape(),
            });
        }

        let q = x.matmul(&self.w_q)?;
        let k = x.matmul(&self.w_k)?;
        let v = x.matmul(&self.w_v)?;

        let scores = q.matmul(&k.transpose())?;
        let scores = scores.scale((self.d_k as f64).sqrt())?;
        let scores = apply_causal_mask(scores, f64::NEG_INFINITY)?;
        let weights = scores.into_softmax()?;

        if let Some(observer) = &self.observer {
            observer.on_attention_weights(&weights);
        }

        let output = weights.matmul(&v)?;
        Ok((output, weights))
    }
}

/// Overwrites every entry above the diagonal (`j > i`) of a square score matrix with `fill`.
///
/// The diagonal and everything below it are left untouched. With a finite `fill`
/// a real score below it would outrank the masked entries; pass `f64::NEG_INFINITY`
/// to guarantee zero weight after softmax.
///
/// # Errors
///
/// Returns `MatrixError::ShapeMismatch` if `scores` is not square.
pub fn apply_causal_mask(mut scores: Matrix, fill: f64) -> Result<Matrix> {
    let [rows, cols] = scores.shape();
    if rows != cols {
        return Err(MatrixError::ShapeMismatch {
            expected: vec![rows, rows],
            got: vec![rows, cols],
        });
    }

    for (i, row) in scores.data_mut().chunks_exact_mut(cols).enumerate() {
        for v in &mut row[i + 1..] {
            *v = fill;
        }
    }
    Ok(scores)
}

impl fmt::Debug for SelfAttention {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SelfAttention")
            .field("d_model", &self.d_model)
            .field("d_k", &self.d_k)
            .field("has_observer", &self.observer.is_some())
            .finish()
    }
}

impl Module for SelfAttention {
    fn num_parameters(&self) -> usize {
        3 * self.d_model * self.d_k
    }
}
