//! Character-level text pipeline feeding the attention block.
//!
//! # Components
//!
//! - [`CharVocab`]: sorted distinct characters of a corpus, ids from 0.
//! - [`Tokenizer`]: the same character set behind four reserved special tokens,
//!   producing fixed-length `[BOS] … [EOS]` sequences.
//! - [`TextDataset`]: an encoded corpus that samples `(input, target)` windows
//!   where the target is the input shifted by one position.
//!
//! Characters outside the vocabulary are not errors. They are substituted with a
//! fallback id (or symbol, when decoding) and reported through `log::warn!`.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

pub mod dataset;
pub mod tokenizer;
pub mod vocab;

pub use dataset::{Batch, TextDataset};
pub use tokenizer::Tokenizer;
pub use vocab::CharVocab;

#[derive(Error, Debug)]
pub enum DataError {
    #[error("Failed to read corpus {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("Corpus is empty")]
    EmptyCorpus,
    /// Sampling needs at least `block_size + 2` tokens.
    #[error("Corpus of {len} tokens is too short for block size {block_size}")]
    CorpusTooShort { len: usize, block_size: usize },
    #[error("Invalid batch shape: batch_size={batch_size}, block_size={block_size}")]
    InvalidBatchShape {
        batch_size: usize,
        block_size: usize,
    },
}

pub type Result<T> = std::result::Result<T, DataError>;
