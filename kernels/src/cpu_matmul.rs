use crate::{check_len, KernelElem, Result};
use rayon::prelude::*;

/// CPU matrix multiplication `[m, k] x [k, n] -> [m, n]` on row-major buffers.
///
/// The right-hand side is transposed first so that every dot product walks two
/// contiguous slices, and output rows are computed in parallel. Each output
/// element accumulates `k` products in index order, the same order as the
/// reference triple loop, so results agree with it up to rounding of the
/// individual products.
pub fn cpu_matmul<T>(
    lhs_data: &[T],
    rhs_data: &[T],
    lhs_shape: &[usize; 2],
    rhs_shape: &[usize; 2],
) -> Result<Vec<T>>
where
    T: KernelElem,
{
    let [m, k] = *lhs_shape;
    let [k2, n] = *rhs_shape;

    if k != k2 {
        return Err(crate::KernelError::ShapeMismatch {
            expected: vec![k, n],
            got: vec![k2, n],
        });
    }
    check_len(lhs_data, lhs_shape)?;
    check_len(rhs_data, rhs_shape)?;

    let mut out_data = vec![T::zero(); m * n];
    if n == 0 {
        return Ok(out_data);
    }

    // rhs is [K, N]; rhs_t is [N, K]
    let rhs_t_data = super::cpu_transpose::cpu_transpose(rhs_data, rhs_shape)?;

    out_data
        .par_chunks_mut(n)
        .enumerate()
        .for_each(|(row_idx, out_row)| {
            let a_slice = &lhs_data[row_idx * k..(row_idx + 1) * k];

            for (col_idx, out_elem) in out_row.iter_mut().enumerate() {
                let b_t_slice = &rhs_t_data[col_idx * k..(col_idx + 1) * k];

                let mut sum = T::zero();
                for (&val_a, &val_b) in a_slice.iter().zip(b_t_slice.iter()) {
                    sum += val_a * val_b;
                }
                *out_elem = sum;
            }
        });

    Ok(out_data)
}
