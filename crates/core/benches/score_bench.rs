//! Benchmark for run-length scoring and nonce digests

use criterion::{Criterion, black_box, criterion_group, criterion_main};
use runpow_core::{PrefixDigest, hash, longest_run};

fn bench_score(c: &mut Criterion) {
    let digest = hash(b"benchmark digest input");

    c.bench_function("longest_run", |b| b.iter(|| longest_run(black_box(&digest))));
}

fn bench_digest_incremental(c: &mut Criterion) {
    // Large prefix: the case the saved absorption state exists for
    let prefix = vec![0x61u8; 4096];
    let incremental = PrefixDigest::new(&prefix);

    c.bench_function("digest_incremental", |b| {
        let mut nonce: u64 = 0;
        b.iter(|| {
            nonce = nonce.wrapping_add(1);
            incremental.digest_nonce(black_box(nonce))
        })
    });
}

fn bench_digest_one_shot(c: &mut Criterion) {
    let prefix = vec![0x61u8; 4096];

    c.bench_function("digest_one_shot", |b| {
        let mut nonce: u64 = 0;
        b.iter(|| {
            nonce = nonce.wrapping_add(1);
            let mut input = prefix.clone();
            input.extend_from_slice(nonce.to_string().as_bytes());
            hash(black_box(&input))
        })
    });
}

criterion_group!(
    benches,
    bench_score,
    bench_digest_incremental,
    bench_digest_one_shot
);
criterion_main!(benches);
