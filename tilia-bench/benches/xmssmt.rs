//! XMSS-MT Benchmarks
//!
//! Uses total height 20 split into 4 layers of height 5, so key generation
//! stays cheap while signing still crosses bottom-tree boundaries.

use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use rand::rng;
use tilia_xmss::{DigestAlgorithm, StatefulSigner, XmssMt, XmssMtParams};

/// Test message for signing benchmarks.
const TEST_MESSAGE: &[u8] = b"The quick brown fox jumps over the lazy dog";

fn params() -> XmssMtParams {
    XmssMtParams::new(DigestAlgorithm::Sha256, 20, 4, 16).unwrap()
}

fn bench_keygen(c: &mut Criterion) {
    let mut group = c.benchmark_group("XMSS-MT KeyGen");
    group.throughput(Throughput::Elements(1));
    group.sample_size(10);

    let p = params();
    group.bench_function("XMSSMT-SHA2_20/4_256", |b| {
        b.iter_batched(
            rng,
            |mut rng| black_box(XmssMt::keygen(&p, &mut rng).unwrap()),
            criterion::BatchSize::SmallInput,
        )
    });

    group.finish();
}

fn bench_sign(c: &mut Criterion) {
    let mut group = c.benchmark_group("XMSS-MT Sign");
    group.throughput(Throughput::Elements(1));

    let p = params();
    // 2^20 signatures are more than criterion will ever draw.
    let (mut sk, _) = XmssMt::keygen(&p, &mut rng()).unwrap();
    group.bench_function("XMSSMT-SHA2_20/4_256", |b| {
        b.iter(|| black_box(XmssMt::sign(&mut sk, black_box(TEST_MESSAGE)).unwrap()))
    });

    group.finish();
}

fn bench_verify(c: &mut Criterion) {
    let mut group = c.benchmark_group("XMSS-MT Verify");
    group.throughput(Throughput::Elements(1));

    let p = params();
    let (mut sk, pk) = XmssMt::keygen(&p, &mut rng()).unwrap();
    let sig = XmssMt::sign(&mut sk, TEST_MESSAGE).unwrap();
    group.bench_function("XMSSMT-SHA2_20/4_256", |b| {
        b.iter(|| black_box(XmssMt::verify(&pk, black_box(TEST_MESSAGE), &sig)))
    });

    group.finish();
}

criterion_group!(benches, bench_keygen, bench_sign, bench_verify);
criterion_main!(benches);
