//! Performance benchmarks for the echo tester
//!
//! Payload generation and the full send/receive/compare loop over an
//! in-memory duplex stream, so no sockets are involved.

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use echo_tester::{
    cli::Cli,
    config::ConfigParser,
    echo::{EchoWorker, FailureCounter, PayloadGenerator},
};
use clap::Parser;
use std::hint::black_box;
use tokio::runtime::Runtime;

fn bench_payload_generation(c: &mut Criterion) {
    let mut group = c.benchmark_group("payload_generation");

    for size in [16usize, 1024, 64 * 1024] {
        group.throughput(Throughput::Bytes(size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &size, |b, &size| {
            let mut generator = PayloadGenerator::seeded(42);
            let mut buf = vec![0u8; size];
            b.iter(|| {
                generator.fill(black_box(&mut buf));
            });
        });
    }

    group.finish();
}

fn bench_verification_loop(c: &mut Criterion) {
    let rt = Runtime::new().unwrap();
    let mut group = c.benchmark_group("verification_loop");
    const ITERATIONS: u64 = 100;

    for size in [64usize, 4096] {
        group.throughput(Throughput::Bytes(size as u64 * ITERATIONS));
        group.bench_with_input(BenchmarkId::from_parameter(size), &size, |b, &size| {
            b.to_async(&rt).iter(|| async move {
                let (mut client, server) = tokio::io::duplex(8 * 1024);
                let echo = tokio::spawn(async move {
                    let (mut reader, mut writer) = tokio::io::split(server);
                    let _ = tokio::io::copy(&mut reader, &mut writer).await;
                });

                let counter = FailureCounter::new();
                let mut worker = EchoWorker::new(0, size, ITERATIONS, counter.clone())
                    .with_generator(PayloadGenerator::seeded(7));
                let report = worker.run_iterations(&mut client).await.unwrap();

                drop(client);
                let _ = echo.await;
                black_box(report)
            });
        });
    }

    group.finish();
}

fn bench_config_parsing(c: &mut Criterion) {
    c.bench_function("config_parsing", |b| {
        b.iter(|| {
            let cli = Cli::parse_from([
                "echo-tester", "--port", "9000", "--size", "64", "--loop", "100", "--thread", "8",
            ]);
            let config = ConfigParser::new(cli).parse_with(|_| None).unwrap();
            black_box(config)
        });
    });
}

criterion_group!(
    benches,
    bench_payload_generation,
    bench_verification_loop,
    bench_config_parsing
);
criterion_main!(benches);
