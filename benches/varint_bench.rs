//! Benchmark of the varint hot path against a mixed-width corpus

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use protowire::{Decoder, Encoder};

/// Corpus spread across every varint length class, biased short the way
/// real field keys and lengths are.
fn varint32_corpus() -> Vec<u32> {
    let mut values = Vec::with_capacity(1024);
    for i in 0..1024u32 {
        values.push(match i % 8 {
            0..=3 => i % 0x80,
            4 | 5 => 0x80 + i * 31,
            6 => 0x4000 + i * 8191,
            _ => u32::MAX - i * 65537,
        });
    }
    values
}

fn varint64_corpus() -> Vec<u64> {
    varint32_corpus()
        .into_iter()
        .enumerate()
        .map(|(i, v)| {
            if i % 4 == 0 {
                u64::from(v) << 32 | 0x5555
            } else {
                u64::from(v)
            }
        })
        .collect()
}

fn encode32(values: &[u32]) -> Vec<u8> {
    let mut encoder = Encoder::new();
    for &v in values {
        encoder.write_unsigned_varint32(v);
    }
    encoder.end()
}

fn encode64(values: &[u64]) -> Vec<u8> {
    let mut encoder = Encoder::new();
    for &v in values {
        encoder.write_unsigned_varint64(v);
    }
    encoder.end()
}

fn bench_read_varint32(c: &mut Criterion) {
    let values = varint32_corpus();
    let bytes = encode32(&values);

    c.bench_function("read_unsigned_varint32_mixed_1024", |b| {
        b.iter(|| {
            let mut decoder = Decoder::new(&bytes).unwrap();
            let mut sum = 0u64;
            for _ in 0..values.len() {
                sum = sum.wrapping_add(u64::from(decoder.read_unsigned_varint32().unwrap()));
            }
            black_box(sum);
        })
    });
}

fn bench_read_varint64(c: &mut Criterion) {
    let values = varint64_corpus();
    let bytes = encode64(&values);

    c.bench_function("read_unsigned_varint64_mixed_1024", |b| {
        b.iter(|| {
            let mut decoder = Decoder::new(&bytes).unwrap();
            let mut sum = 0u64;
            for _ in 0..values.len() {
                sum = sum.wrapping_add(decoder.read_unsigned_varint64().unwrap());
            }
            black_box(sum);
        })
    });
}

fn bench_write_varint64(c: &mut Criterion) {
    let values = varint64_corpus();

    c.bench_function("write_unsigned_varint64_mixed_1024", |b| {
        b.iter(|| {
            black_box(encode64(black_box(&values)));
        })
    });
}

criterion_group!(
    benches,
    bench_read_varint32,
    bench_read_varint64,
    bench_write_varint64
);
criterion_main!(benches);
