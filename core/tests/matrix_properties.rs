use attn_rs::matrix::{self, Matrix, MatrixError};
use proptest::prelude::*;

fn arb_matrix(rows: usize, cols: usize, range: f64) -> impl Strategy<Value = Matrix> {
    prop::collection::vec(-range..range, rows * cols)
        .prop_map(move |data| Matrix::new(data, [rows, cols]).unwrap())
}

/// Three matrices with chainable shapes `[m, k] x [k, n] x [n, p]`.
fn arb_chain() -> impl Strategy<Value = (Matrix, Matrix, Matrix)> {
    (1usize..6, 1usize..6, 1usize..6, 1usize..6).prop_flat_map(|(m, k, n, p)| {
        (
            arb_matrix(m, k, 2.0),
            arb_matrix(k, n, 2.0),
            arb_matrix(n, p, 2.0),
        )
    })
}

fn arb_any(range: f64) -> impl Strategy<Value = Matrix> {
    (1usize..8, 1usize..8).prop_flat_map(move |(r, c)| arb_matrix(r, c, range))
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    #[test]
    fn matmul_is_associative((a, b, c) in arb_chain()) {
        let left = a.matmul(&b).unwrap().matmul(&c).unwrap();
        let right = a.matmul(&b.matmul(&c).unwrap()).unwrap();
        prop_assert!(left.approx_eq(&right, 1e-9));
    }

    #[test]
    fn matmul_fast_matches_reference((a, b, _) in arb_chain()) {
        let slow = matrix::multiply(&a, &b).unwrap();
        let fast = a.matmul_fast(&b).unwrap();
        prop_assert!(slow.approx_eq(&fast, 1e-9));
    }

    #[test]
    fn transpose_is_an_involution(a in arb_any(100.0)) {
        let t = matrix::transpose(&a);
        prop_assert_eq!(t.shape(), [a.cols(), a.rows()]);
        prop_assert_eq!(matrix::transpose(&t), a);
    }

    #[test]
    fn softmax_rows_are_distributions(a in arb_any(50.0)) {
        let s = matrix::softmax(&a).unwrap();
        prop_assert_eq!(s.shape(), a.shape());
        for row in s.iter_rows() {
            let sum: f64 = row.iter().sum();
            prop_assert!((sum - 1.0).abs() < 1e-9);
            prop_assert!(row.iter().all(|&p| (0.0..=1.0).contains(&p)));
        }
    }

    #[test]
    fn softmax_is_shift_invariant(a in arb_any(10.0), k in -100.0f64..100.0) {
        let shifted = a.map(|v| v + k);
        let s = a.softmax().unwrap();
        let s_shifted = shifted.softmax().unwrap();
        prop_assert!(s.approx_eq(&s_shifted, 1e-9));
    }
}

#[test]
fn test_inner_dimension_mismatch() {
    let a = Matrix::zeros([2, 3]).unwrap();
    let b = Matrix::zeros([4, 2]).unwrap();
    assert_eq!(
        matrix::multiply(&a, &b),
        Err(MatrixError::DimensionMismatch {
            op: "matmul",
            left: [2, 3],
            right: [4, 2],
        })
    );
}

#[test]
fn test_softmax_single_entry_rows() {
    let m = attn_rs::matrix![[-3.0], [0.0], [1e6]];
    let s = m.softmax().unwrap();
    assert_eq!(s.data(), &[1.0, 1.0, 1.0]);
}
