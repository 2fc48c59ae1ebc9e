use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};

use chrono::Utc;
use stockroom_core::{ProductId, ProductKey};
use stockroom_ledger::{Product, aggregate, low_stock};

/// Build a fragmented scan: `records` products spread over `keys` identity keys.
fn fragmented_scan(records: usize, keys: usize) -> Vec<Product> {
    (0..records)
        .map(|i| {
            Product::new(
                ProductId::new(),
                ProductKey::new(format!("Product-{}", i % keys), "MfgX").unwrap(),
                (i % 250) as u64,
                10,
                Utc::now(),
            )
            .unwrap()
        })
        .collect()
}

fn bench_aggregate(c: &mut Criterion) {
    let mut group = c.benchmark_group("aggregate");

    for &records in &[100usize, 1_000, 10_000] {
        let scan = fragmented_scan(records, records / 10 + 1);
        group.throughput(Throughput::Elements(records as u64));
        group.bench_with_input(BenchmarkId::from_parameter(records), &scan, |b, scan| {
            b.iter(|| aggregate(black_box(scan)));
        });
    }

    group.finish();
}

fn bench_low_stock(c: &mut Criterion) {
    let scan = fragmented_scan(10_000, 1_000);
    c.bench_function("low_stock/10000", |b| {
        b.iter(|| low_stock(black_box(&scan), 100));
    });
}

criterion_group!(benches, bench_aggregate, bench_low_stock);
criterion_main!(benches);
