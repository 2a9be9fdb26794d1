use criterion::{criterion_group, criterion_main, Criterion, Throughput};
use kcapi_rng::{
    entropy::OsEntropy,
    gather::{GatherBuilder, RNG_BUFSIZE},
    kcapi::{AfAlgRng, Drng},
};
use std::{io, time::Duration};

fn kcapi_rng_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("kcapi_rng");
    group.measurement_time(Duration::new(10, 0));
    //
    // Latency of a single kernel generate call for small requests and
    // for a full algif_rng chunk.
    //
    let mut drng = AfAlgRng::new("stdrng").unwrap();
    drng.seed(&[0u8; 32]).unwrap();
    for len in [16, 32, RNG_BUFSIZE] {
        let title = format!("{}_bytes", len);
        let mut buf = vec![0u8; len];
        group.bench_function(&title, |b| b.iter(|| drng.generate(&mut buf).unwrap()));
    }
    //
    // Throughput of the chunked pipeline for bulk random data.
    //
    let drng = AfAlgRng::new("stdrng").unwrap();
    let mut gatherer = GatherBuilder::new(drng, OsEntropy::default())
        .build()
        .unwrap();
    let len = 1u64 << 20;
    group.throughput(Throughput::Bytes(len));
    group.bench_function("1_MiB", |b| {
        b.iter(|| gatherer.generate_to(len, &mut io::sink()).unwrap())
    });
}

criterion_group!(benches, kcapi_rng_benchmark);
criterion_main!(benches);
