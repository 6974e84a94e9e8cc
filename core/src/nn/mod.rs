//! Neural network layers.
//!
//! - [`SelfAttention`]: single-head causal self-attention over one sequence.
//! - [`TokenEmbedding`]: lookup table turning token ids into model-width vectors.

pub mod attention;
pub mod embedding;
pub mod module;

pub use attention::{apply_causal_mask, AttentionObserver, LogObserver, SelfAttention};
pub use embedding::TokenEmbedding;
pub use module::Module;
