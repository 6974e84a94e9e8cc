//! Slice-level CPU kernels for `attn-rs`.
//!
//! Kernels operate on flat row-major buffers plus an explicit `[rows, cols]`
//! shape, so they can be swapped for BLAS-backed versions without touching the
//! `Matrix` type in the main crate.

use num_traits::{FromPrimitive, Num, NumAssign, ToPrimitive};
use std::fmt::Debug;
use thiserror::Error;

pub mod cpu_matmul;
pub mod cpu_transpose;

pub use cpu_matmul::cpu_matmul;
pub use cpu_transpose::cpu_transpose;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum KernelError {
    #[error("Shape mismatch: expected {expected:?}, got {got:?}")]
    ShapeMismatch {
        expected: Vec<usize>,
        got: Vec<usize>,
    },
}

pub type Result<T> = std::result::Result<T, KernelError>;

/// Trait bound for elements that can be processed by kernels.
pub trait KernelElem:
    Num + NumAssign + Copy + Clone + Debug + Send + Sync + FromPrimitive + ToPrimitive + PartialOrd
{
}

impl<T> KernelElem for T where
    T: Num
        + NumAssign
        + Copy
        + Clone
        + Debug
        + Send
        + Sync
        + FromPrimitive
        + ToPrimitive
        + PartialOrd
{
}

/// Checks that `data` holds exactly `rows * cols` elements.
pub(crate) fn check_len<T>(data: &[T], shape: &[usize; 2]) -> Result<()> {
    let expected = shape[0] * shape[1];
    if data.len() != expected {
        return Err(KernelError::ShapeMismatch {
            expected: vec![expected],
            got: vec![data.len()],
        });
    }
    Ok(())
}
