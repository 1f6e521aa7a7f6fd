//! Benchmarks for 1D bar cutting.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use u_cutstock_d1::{Algorithm1D, Options1D, Packer1D, Piece1D, Stock1D};

fn demand(n: usize) -> Vec<Piece1D> {
    (0..n)
        .map(|i| {
            let length = 150.0 + (i as f64 * 137.0) % 1900.0;
            Piece1D::new(format!("P{}", i), length).with_quantity(1 + i % 4)
        })
        .collect()
}

fn bench_algorithms(c: &mut Criterion) {
    let stock = vec![
        Stock1D::new("S6000", 6000.0).with_available(1000),
        Stock1D::new("S2400", 2400.0).with_available(1000),
    ];

    for algorithm in [Algorithm1D::Ffd, Algorithm1D::Bfd] {
        let mut group = c.benchmark_group(format!("packer1d_{}", algorithm.as_str()));
        for &n in &[50, 200, 800] {
            let pieces = demand(n);
            let packer = Packer1D::new(Options1D::new().with_algorithm(algorithm).with_kerf(3.0));

            group.bench_with_input(BenchmarkId::new("lines", n), &pieces, |b, p| {
                b.iter(|| black_box(packer.solve(black_box(p), black_box(&stock))))
            });
        }
        group.finish();
    }
}

criterion_group!(benches, bench_algorithms);
criterion_main!(benches);
