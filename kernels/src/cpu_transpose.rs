use crate::{check_len, KernelElem, Result};
use rayon::prelude::*;

/// CPU transpose of a row-major `[m, n]` buffer into a row-major `[n, m]` buffer.
///
/// Rows of the output are filled in parallel; each output row gathers one
/// column of the input.
pub fn cpu_transpose<T>(data: &[T], shape: &[usize; 2]) -> Result<Vec<T>>
where
    T: KernelElem,
{
    check_len(data, shape)?;
    let [m, n] = *shape;
    let mut out_data = vec![T::zero(); m * n];
    if m == 0 || n == 0 {
        return Ok(out_data);
    }

    out_data
        .par_chunks_mut(m)
        .enumerate()
        .for_each(|(col_idx, out_row)| {
            for (r, out_elem) in out_row.iter_mut().enumerate() {
                *out_elem = data[r * n + col_idx];
            }
        });

    Ok(out_data)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::KernelError;

    #[test]
    fn test_transpose_simple() {
        let data = vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0]; // 2x3
        let result = cpu_transpose(&data, &[2, 3]).unwrap();
        // [1, 4]
        // [2, 5]
        // [3, 6]
        assert_eq!(result, vec![1.0, 4.0, 2.0, 5.0, 3.0, 6.0]);
    }

    #[test]
    fn test_transpose_column_vector() {
        let data = vec![1.0, 2.0, 3.0];
        let result = cpu_transpose(&data, &[3, 1]).unwrap();
        assert_eq!(result, data);
    }

    #[test]
    fn test_transpose_bad_len() {
        let err = cpu_transpose(&[1.0f64; 5], &[2, 3]);
        assert!(matches!(err, Err(KernelError::ShapeMismatch { .. })));
    }
}
