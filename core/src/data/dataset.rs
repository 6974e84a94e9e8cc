//! Encoded corpus and next-token batch sampling.

use log::{debug, info};
use rand::Rng;
use std::fs;
use std::path::Path;

use super::vocab::CharVocab;
use super::{DataError, Result};

/// A batch of `(input, target)` windows, each `block_size` ids long.
///
/// For every row `b` and position `j`, `targets[b][j]` is the corpus token that
/// follows `inputs[b][j]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Batch {
    pub inputs: Vec<Vec<usize>>,
    pub targets: Vec<Vec<usize>>,
}

impl Batch {
    pub fn batch_size(&self) -> usize {
        self.inputs.len()
    }

    pub fn block_size(&self) -> usize {
        self.inputs.first().map_or(0, Vec::len)
    }

    /// Iterates over `(input, target)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&[usize], &[usize])> {
        self.inputs
            .iter()
            .zip(&self.targets)
            .map(|(x, y)| (x.as_slice(), y.as_slice()))
    }
}

/// A whole corpus encoded with its own [`CharVocab`].
#[derive(Debug, Clone)]
pub struct TextDataset {
    vocab: CharVocab,
    data: Vec<usize>,
}

impl TextDataset {
    /// Builds the vocabulary from `text` and encodes all of it.
    ///
    /// # Errors
    ///
    /// Returns `DataError::EmptyCorpus` if `text` is empty.
    pub fn from_text(text: &str) -> Result<Self> {
        if text.is_empty() {
            return Err(DataError::EmptyCorpus);
        }
        let vocab = CharVocab::from_text(text);
        let data = vocab.encode(text);
        info!(
            "Built text dataset: {} tokens, vocab size {}",
            data.len(),
            vocab.len()
        );
        Ok(Self { vocab, data })
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        info!("Reading corpus from {}", path.display());
        let text = fs::read_to_string(path).map_err(|source| DataError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_text(&text)
    }

    pub fn vocab(&self) -> &CharVocab {
        &self.vocab
    }

    pub fn vocab_size(&self) -> usize {
        self.vocab.len()
    }

    /// Number of tokens in the encoded corpus.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn data(&self) -> &[usize] {
        &self.data
    }

    pub fn encode(&self, text: &str) -> Vec<usize> {
        self.vocab.encode(text)
    }

    pub fn decode(&self, ids: &[usize]) -> String {
        self.vocab.decode(ids)
    }

    /// Samples `batch_size` windows of `block_size` tokens at random offsets.
    ///
    /// Offsets are drawn uniformly from `0..len - block_size - 1`, so the shifted
    /// target window always stays inside the corpus.
    ///
    /// # Errors
    ///
    /// - `DataError::InvalidBatchShape` if `batch_size` or `block_size` is zero.
    /// - `DataError::CorpusTooShort` if the corpus has `block_size + 1` tokens or fewer.
    pub fn get_batch<R: Rng + ?Sized>(
        &self,
        batch_size: usize,
        block_size: usize,
        rng: &mut R,
    ) -> Result<Batch> {
        if batch_size == 0 || block_size == 0 {
            return Err(DataError::InvalidBatchShape {
                batch_size,
                block_size,
            });
        }
        if self.data.len() <= block_size + 1 {
            return Err(DataError::CorpusTooShort {
                len: self.data.len(),
                block_size,
            });
        }

        let max_start = self.data.len() - block_size - 1;
        let mut inputs = Vec::with_capacity(batch_size);
        let mut targets = Vec::with_capacity(batch_size);
        for _ in 0..batch_size {
            let start = rng.random_range(0..max_start);
            inputs.push(self.data[start..start + block_size].to_vec());
            targets.push(self.data[start + 1..start + block_size + 1].to_vec());
        }
        debug!("sampled batch {batch_size}x{block_size}");

        Ok(Batch { inputs, targets })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_from_text() {
        let ds = TextDataset::from_text("hello").unwrap();
        assert_eq!(ds.len(), 5);
        assert_eq!(ds.vocab_size(), 4);
        assert_eq!(ds.data(), &[1, 0, 2, 2, 3]);
        assert_eq!(ds.decode(ds.data()), "hello");
    }

    #[test]
    fn test_empty_corpus() {
        assert!(matches!(
            TextDataset::from_text(""),
            Err(DataError::EmptyCorpus)
        ));
    }

    #[test]
    fn test_batch_shift() {
        let ds = TextDataset::from_text("abcdefghijklmnopqrstuvwxyz").unwrap();
        let mut rng = StdRng::seed_from_u64(123);
        let batch = ds.get_batch(3, 5, &mut rng).unwrap();

        assert_eq!(batch.batch_size(), 3);
        assert_eq!(batch.block_size(), 5);
        for (x, y) in batch.iter() {
            assert_eq!(x.len(), 5);
            assert_eq!(&x[1..], &y[..4]);
            // Consecutive letters encode to consecutive ids.
            assert_eq!(y[4], x[4] + 1);
        }
    }

    #[test]
    fn test_batch_reproducible() {
        let ds = TextDataset::from_text("the quick brown fox jumps over the lazy dog").unwrap();
        let a = ds.get_batch(4, 6, &mut StdRng::seed_from_u64(9)).unwrap();
        let b = ds.get_batch(4, 6, &mut StdRng::seed_from_u64(9)).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_batch_errors() {
        let ds = TextDataset::from_text("abcd").unwrap();
        let mut rng = StdRng::seed_from_u64(0);
        assert!(matches!(
            ds.get_batch(0, 2, &mut rng),
            Err(DataError::InvalidBatchShape { .. })
        ));
        assert!(matches!(
            ds.get_batch(1, 3, &mut rng),
            Err(DataError::CorpusTooShort {
                len: 4,
                block_size: 3
            })
        ));
        // len == block_size + 2 leaves exactly one valid offset.
        let batch = ds.get_batch(2, 2, &mut rng).unwrap();
        assert_eq!(batch.inputs, vec![vec![0, 1], vec![0, 1]]);
        assert_eq!(batch.targets, vec![vec![1, 2], vec![1, 2]]);
    }

    #[test]
    fn test_missing_file() {
        let err = TextDataset::from_file("/definitely/not/here.txt").unwrap_err();
        assert!(matches!(err, DataError::Io { .. }));
    }
}
