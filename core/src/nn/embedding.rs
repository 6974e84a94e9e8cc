use rand::Rng;

use crate::matrix::{Matrix, MatrixError, Result, DEFAULT_INIT_STD};
use crate::nn::Module;

/// Token embedding table: row `id` of a `[vocab_size, dim]` matrix is the vector for token `id`.
#[derive(Debug, Clone, PartialEq)]
pub struct TokenEmbedding {
    pub weight: Matrix,
}

impl TokenEmbedding {
    /// Creates a table with Gaussian(0, 0.02) entries drawn from `rng`.
    pub fn new<R: Rng + ?Sized>(vocab_size: usize, dim: usize, rng: &mut R) -> Result<Self> {
        let weight = Matrix::randn([vocab_size, dim], DEFAULT_INIT_STD, rng)?;
        Ok(Self { weight })
    }

    pub fn from_weight(weight: Matrix) -> Self {
        Self { weight }
    }

    pub fn vocab_size(&self) -> usize {
        self.weight.rows()
    }

    pub fn dim(&self) -> usize {
        self.weight.cols()
    }

    /// Looks up `ids`, producing a `[ids.len(), dim]` matrix.
    ///
    /// # Errors
    ///
    /// - `MatrixError::EmptyInput` if `ids` is empty.
    /// - `MatrixError::IndexOutOfBounds` if any id is `>= vocab_size`.
    pub fn forward(&self, ids: &[usize]) -> Result<Matrix> {
        if ids.is_empty() {
            return Err(MatrixError::EmptyInput("token id sequence is empty"));
        }
        let [vocab_size, dim] = self.weight.shape();

        let mut out = Vec::with_capacity(ids.len() * dim);
        for &token_id in ids {
            if token_id >= vocab_size {
                return Err(MatrixError::IndexOutOfBounds {
                    index: vec![token_id],
                    shape: vec![vocab_size, dim],
                });
            }
            out.extend_from_slice(self.weight.row(token_id));
        }

        Matrix::new(out, [ids.len(), dim])
    }
}

impl Module for TokenEmbedding {
    fn num_parameters(&self) -> usize {
        self.weight.data().len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matrix;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_lookup() {
        let emb = TokenEmbedding::from_weight(matrix![[0.0, 0.1], [1.0, 1.1], [2.0, 2.1]]);
        let out = emb.forward(&[2, 0, 2]).unwrap();
        assert_eq!(out.shape(), [3, 2]);
        assert_eq!(out.data(), &[2.0, 2.1, 0.0, 0.1, 2.0, 2.1]);
    }

    #[test]
    fn test_out_of_range_id() {
        let emb = TokenEmbedding::from_weight(Matrix::zeros([4, 3]).unwrap());
        let err = emb.forward(&[1, 4]).unwrap_err();
        assert_eq!(
            err,
            MatrixError::IndexOutOfBounds {
                index: vec![4],
                shape: vec![4, 3],
            }
        );
    }

    #[test]
    fn test_empty_ids() {
        let emb = TokenEmbedding::from_weight(Matrix::zeros([4, 3]).unwrap());
        assert!(matches!(emb.forward(&[]), Err(MatrixError::EmptyInput(_))));
    }

    #[test]
    fn test_seeded_table() {
        let a = TokenEmbedding::new(6, 3, &mut StdRng::seed_from_u64(123)).unwrap();
        let b = TokenEmbedding::new(6, 3, &mut StdRng::seed_from_u64(123)).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.vocab_size(), 6);
        assert_eq!(a.dim(), 3);
        assert_eq!(a.num_parameters(), 18);
    }
}
