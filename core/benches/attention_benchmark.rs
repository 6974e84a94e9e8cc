use attn_rs::matrix::Matrix;
use attn_rs::nn::SelfAttention;
use criterion::{criterion_group, criterion_main, Criterion};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::hint::black_box;

fn benchmark_attention(c: &mut Criterion) {
    let mut group = c.benchmark_group("self_attention");
    let mut rng = StdRng::seed_from_u64(42);
    let d_model = 64;
    let attn = SelfAttention::new(d_model, &mut rng).unwrap();

    for &seq_len in &[8, 32, 128] {
        let x = Matrix::randn([seq_len, d_model], 1.0, &mut rng).unwrap();
        group.bench_function(format!("seq{}_d{}", seq_len, d_model), |b| {
            b.iter(|| black_box(attn.forward(black_box(&x)).unwrap()))
        });
    }

    group.finish();
}

criterion_group!(benches, benchmark_attention);
criterion_main!(benches);
