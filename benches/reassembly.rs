//! Benchmarks for multi-part reassembly
//!
//! Compares the single-part passthrough against collecting packets split
//! across two and four datagrams.

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use sms_udp::catalog::tables;
use sms_udp::test_utils::DatagramBuilder;
use sms_udp::{Reassembler, ReassemblyConfig};
use std::hint::black_box;
use std::time::Instant;

fn bench_passthrough(c: &mut Criterion) {
    let datagram = DatagramBuilder::for_layout(&tables::TIMINGS).build();
    let mut reassembler = Reassembler::new(ReassemblyConfig::default());
    let now = Instant::now();

    c.bench_function("single_part_passthrough", |b| {
        b.iter(|| black_box(reassembler.push_at(black_box(&datagram), now).is_ok()))
    });
}

fn bench_multi_part(c: &mut Criterion) {
    let mut group = c.benchmark_group("multi_part");
    group.throughput(Throughput::Bytes(tables::TIMINGS.length as u64));

    for parts in [2u8, 4] {
        // Fresh packet numbers each iteration so nothing is dropped as stale
        let mut cpn = 0u32;
        let mut reassembler = Reassembler::new(ReassemblyConfig::default());
        let builder = DatagramBuilder::for_layout(&tables::TIMINGS);

        group.bench_with_input(BenchmarkId::from_parameter(parts), &parts, |b, &parts| {
            b.iter(|| {
                cpn = cpn.wrapping_add(1);
                let datagrams = builder.clone().category_packet_number(cpn).build_parts(parts);
                let now = Instant::now();
                let mut completed = false;
                for datagram in &datagrams {
                    if let Ok(sms_udp::Reassembly::Complete { .. }) =
                        reassembler.push_at(datagram, now)
                    {
                        completed = true;
                    }
                }
                black_box(completed)
            })
        });
    }

    group.finish();
}

criterion_group!(benches, bench_passthrough, bench_multi_part);
criterion_main!(benches);
