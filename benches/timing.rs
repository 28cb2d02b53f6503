//! Digest and parse timing.
//!
//! Run with: `cargo bench --bench timing`

use std::hint::black_box;

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

use actor_auth::digest::{compute, DigestAlgorithm};
use actor_auth::request::{parse, Framing};
use actor_auth::SharedKey;

/// Payload sizes to benchmark.
const PAYLOAD_SIZES: &[usize] = &[64, 1024, 65_536];

fn bench_digest(c: &mut Criterion) {
    let key = SharedKey::from_text(b"topsecret\n").unwrap();
    let mut group = c.benchmark_group("hmac");

    for &size in PAYLOAD_SIZES {
        let payload = vec![0x42u8; size];
        group.throughput(Throughput::Bytes(size as u64));

        for alg in DigestAlgorithm::ALL {
            group.bench_with_input(BenchmarkId::new(alg.name(), size), &payload, |b, p| {
                b.iter(|| compute(alg, &key, black_box(p)).unwrap());
            });
        }
    }
    group.finish();
}

fn bench_parse(c: &mut Criterion) {
    let mut doc = b"<Request action=\"Query\" actor=\"alice\" chunking=\"False\">".to_vec();
    doc.extend_from_slice(&vec![b'x'; 4096]);
    doc.extend_from_slice(b"</Request>");

    c.bench_function("parse_request", |b| {
        b.iter(|| parse(black_box(&doc), Framing::Document).unwrap());
    });
}

criterion_group!(benches, bench_digest, bench_parse);
criterion_main!(benches);
