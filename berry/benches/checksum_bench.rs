use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use berry::protocol::checksum::{crc_a, dcs, lcs};

fn bench_lcs(c: &mut Criterion) {
    let mut group = c.benchmark_group("lcs");
    for &v in &[0u8, 1u8, 128u8, 255u8] {
        group.bench_with_input(BenchmarkId::from_parameter(v), &v, |b, &v| {
            b.iter(|| {
                black_box(lcs(black_box(v)));
            });
        });
    }
    group.finish();
}

fn bench_dcs(c: &mut Criterion) {
    let mut group = c.benchmark_group("dcs");
    for &size in &[0usize, 16usize, 64usize, 254usize] {
        let payload: Vec<u8> = (0..size).map(|i| (i & 0xff) as u8).collect();
        group.bench_with_input(BenchmarkId::from_parameter(size), &payload, |b, p| {
            b.iter(|| {
                black_box(dcs(black_box(p)));
            });
        });
    }
    group.finish();
}

fn bench_crc_a(c: &mut Criterion) {
    let mut group = c.benchmark_group("crc_a");
    // SELECT, WRITE data phase, full FIFO
    for &size in &[7usize, 16usize, 64usize] {
        let payload: Vec<u8> = (0..size).map(|i| ((i * 7) & 0xff) as u8).collect();
        group.bench_with_input(BenchmarkId::from_parameter(size), &payload, |b, p| {
            b.iter(|| {
                black_box(crc_a(black_box(p)));
            });
        });
    }
    group.finish();
}

criterion_group!(benches, bench_lcs, bench_dcs, bench_crc_a);
criterion_main!(benches);
