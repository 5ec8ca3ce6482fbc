//! Benchmarks for packet decoding
//!
//! Measures the per-read cost of the snapshot's decode-on-read model:
//! - Typed decode of every category from a stored buffer
//! - By-name dynamic field access
//! - The full processor path for a single-part datagram

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use sms_udp::catalog::tables;
use sms_udp::test_utils::DatagramBuilder;
use sms_udp::{
    DynamicRecord, PacketCatalog, PacketProcessor, ReassemblyConfig, TelemetrySnapshot, records,
};
use std::hint::black_box;
use std::sync::Arc;

fn bench_typed_decode(c: &mut Criterion) {
    let mut group = c.benchmark_group("typed_decode");

    for descriptor in PacketCatalog::standard().descriptors() {
        let packet = DatagramBuilder::for_layout(descriptor).build();
        group.throughput(Throughput::Bytes(packet.len() as u64));
        group.bench_with_input(
            BenchmarkId::from_parameter(descriptor.category),
            &packet,
            |b, packet| b.iter(|| black_box(records::decode(black_box(packet), descriptor))),
        );
    }

    group.finish();
}

fn bench_dynamic_access(c: &mut Criterion) {
    let data: Arc<[u8]> = DatagramBuilder::for_layout(&tables::CAR_PHYSICS).build().into();
    let record =
        DynamicRecord::new(data, &tables::CAR_PHYSICS).expect("Failed to wrap car physics");

    c.bench_function("dynamic_scalar_lookup", |b| {
        b.iter(|| black_box(record.f32(black_box("speed"))))
    });

    c.bench_function("dynamic_whole_record", |b| b.iter(|| black_box(record.to_value())));
}

fn bench_ingest(c: &mut Criterion) {
    let datagram = DatagramBuilder::for_layout(&tables::CAR_PHYSICS).build();
    let mut processor =
        PacketProcessor::new(Arc::new(TelemetrySnapshot::new()), ReassemblyConfig::default());

    let mut group = c.benchmark_group("ingest");
    group.throughput(Throughput::Bytes(datagram.len() as u64));
    group.bench_function("single_part_car_physics", |b| {
        b.iter(|| black_box(processor.ingest(black_box(&datagram))))
    });
    group.finish();

    let snapshot = Arc::clone(processor.snapshot());
    c.bench_function("snapshot_read_car_physics", |b| b.iter(|| black_box(snapshot.car_physics())));
}

criterion_group!(benches, bench_typed_decode, bench_dynamic_access, bench_ingest);
criterion_main!(benches);
