//! # attn-rs
//!
//! `attn-rs` is a pure Rust implementation of single-head causal self-attention,
//! together with the matrix primitives it is built from and a small character-level
//! data pipeline that feeds it, written for understanding the mechanics of
//! transformer language models.
//!
//! It runs on **CPU only** and computes forward passes; there is no autograd.
//!
//! ## Modules
//!
//! - [`mod@matrix`]: dense `f64` matrices, multiply, transpose, softmax, initialization.
//! - [`nn`]: the self-attention block and a token embedding table.
//! - [`data`]: character vocabulary, tokenizer and next-token batch sampling.
//! - [`config`]: serde-backed configuration with `ATTN_*` environment overrides.
//!
//! ## Example
//!
//! ```rust
//! use attn_rs::data::TextDataset;
//! use attn_rs::nn::{SelfAttention, TokenEmbedding};
//! use rand::{rngs::StdRng, SeedableRng};
//!
//! let mut rng = StdRng::seed_from_u64(123);
//! let dataset = TextDataset::from_text("hello attention, hello world").unwrap();
//! let batch = dataset.get_batch(2, 4, &mut rng).unwrap();
//!
//! let embedding = TokenEmbedding::new(dataset.vocab_size(), 8, &mut rng).unwrap();
//! let attn = SelfAttention::new(8, &mut rng).unwrap();
//!
//! let x = embedding.forward(&batch.inputs[0]).unwrap();
//! let (out, weights) = attn.forward_with_weights(&x).unwrap();
//! assert_eq!(out.shape(), [4, 8]);
//! assert_eq!(weights.row(0)[0], 1.0);
//! ```

/// Macro for creating a [`Matrix`](crate::matrix::Matrix) from row literals, with a
/// compile-time check that every row has the same length.
///
/// # Examples
///
/// ```rust
/// use attn_rs::matrix;
///
/// // Works
/// let m = matrix![[1.0, 2.0], [3.0, 4.0], [5.0, 6.0]];
/// assert_eq!(m.shape(), [3, 2]);
///
/// // Fails to compile:
/// // let m = matrix![[1.0, 2.0], [3.0]];
/// ```
#[macro_export]
macro_rules! matrix {
    (@unit $x:expr) => {
        ()
    };
    (@count $($x:expr),+) => {
        <[()]>::len(&[$($crate::matrix!(@unit $x)),+])
    };
    ($([$($x:expr),+ $(,)?]),+ $(,)?) => {{
        const ROW_LENS: &[usize] = &[$($crate::matrix!(@count $($x),+)),+];

        // This assertion triggers a compile-time error if false
        const _: () = {
            let mut i = 1;
            while i < ROW_LENS.len() {
                assert!(
                    ROW_LENS[i] == ROW_LENS[0],
                    "Jagged rows: every row must have the same length"
                );
                i += 1;
            }
        };

        let rows: &[&[f64]] = &[$(&[$($x),+]),+];
        // Rectangular and non-empty, checked above
        $crate::matrix::Matrix::from_rows(rows).unwrap()
    }};
}

pub mod config;
pub mod data;
pub mod matrix;
pub mod nn;

pub use config::{AttentionConfig, BatchConfig};
pub use data::{Batch, CharVocab, TextDataset, Tokenizer};
pub use matrix::{Matrix, MatrixError};
pub use nn::{AttentionObserver, Module, SelfAttention, TokenEmbedding};
