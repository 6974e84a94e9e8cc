use attn_rs_kernels::{cpu_matmul, cpu_transpose};
use criterion::{criterion_group, criterion_main, Criterion};
use std::hint::black_box;

fn benchmark_matmul(c: &mut Criterion) {
    let mut group = c.benchmark_group("matmul");
    let sizes = [16, 64, 128, 256];

    for &size in &sizes {
        let lhs_shape = [size, size];
        let rhs_shape = [size, size];
        let lhs_data: Vec<f64> = (0..size * size).map(|i| (i % 7) as f64 * 0.1).collect();
        let rhs_data: Vec<f64> = (0..size * size).map(|i| (i % 5) as f64 * 0.2).collect();

        group.bench_function(format!("{}x{}", size, size), |b| {
            b.iter(|| {
                cpu_matmul(
                    black_box(&lhs_data),
                    black_box(&rhs_data),
                    black_box(&lhs_shape),
                    black_box(&rhs_shape),
                )
                .unwrap()
            })
        });
    }
    group.finish();
}

fn benchmark_transpose(c: &mut Criterion) {
    let mut group = c.benchmark_group("transpose");
    let sizes = [64, 256, 1024];

    for &size in &sizes {
        let shape = [size, size];
        let data = vec![1.0f64; size * size];

        group.bench_function(format!("{}x{}", size, size), |b| {
            b.iter(|| cpu_transpose(black_box(&data), black_box(&shape)).unwrap())
        });
    }
    group.finish();
}

criterion_group!(benches, benchmark_matmul, benchmark_transpose);
criterion_main!(benches);
