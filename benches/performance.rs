//! Performance benchmarks for the NDEF codec.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use ndef_store::wellknown::{get_smartposter, new_smartposter, new_text, new_uri, Text};
use ndef_store::{decode, Record, RecordStore, Tnf};

fn create_message(count: usize, payload_len: usize) -> RecordStore {
    (0..count)
        .map(|i| Record::new(Tnf::Mime, "application/octet-stream", vec![i as u8; payload_len]))
        .collect()
}

/// Benchmark message encoding with short and long records
fn bench_encode(c: &mut Criterion) {
    let mut group = c.benchmark_group("encode");

    for payload_len in [16, 255, 256, 4096] {
        let mut store = create_message(32, payload_len);
        group.throughput(Throughput::Bytes((32 * payload_len) as u64));
        group.bench_with_input(
            BenchmarkId::new("payload_len", payload_len),
            &payload_len,
            |b, _| {
                b.iter(|| black_box(store.encode().unwrap()));
            },
        );
    }

    group.finish();
}

/// Benchmark message decoding with a growing record count
fn bench_decode(c: &mut Criterion) {
    let mut group = c.benchmark_group("decode");

    for count in [1, 16, 256] {
        let bytes = create_message(count, 64).encode().unwrap();
        group.throughput(Throughput::Bytes(bytes.len() as u64));
        group.bench_with_input(BenchmarkId::new("records", count), &bytes, |b, bytes| {
            b.iter(|| black_box(decode(bytes)));
        });
    }

    group.finish();
}

/// Benchmark reassembly of a chunked payload
fn bench_decode_chunked(c: &mut Criterion) {
    let mut group = c.benchmark_group("decode_chunked");

    for chunks in [4, 64] {
        let mut bytes = Vec::new();
        for n in 0..chunks {
            let mut flags = if n == 0 { 0x80 | Tnf::Mime.bits() } else { Tnf::Unchanged.bits() };
            flags |= if n + 1 == chunks { 0x40 } else { 0x20 };
            let record_type: &[u8] = if n == 0 { b"a/b" } else { b"" };
            bytes.push(flags | 0x10);
            bytes.push(record_type.len() as u8);
            bytes.push(200);
            bytes.extend_from_slice(record_type);
            bytes.extend(std::iter::repeat(n as u8).take(200));
        }

        group.bench_with_input(BenchmarkId::new("chunks", chunks), &bytes, |b, bytes| {
            b.iter(|| black_box(decode(bytes)));
        });
    }

    group.finish();
}

/// Benchmark building and parsing a smart poster
fn bench_smart_poster(c: &mut Criterion) {
    let text = Text::new("en", "Tap for the schedule");

    c.bench_function("smart_poster_build", |b| {
        b.iter(|| {
            let uri = Some("https://www.example.com/schedule");
            black_box(new_smartposter(None, uri, Some(&text)).unwrap())
        });
    });

    let message: RecordStore = vec![
        new_uri("https://www.example.com/schedule"),
        new_text(&text).unwrap(),
    ]
    .into_iter()
    .collect();
    let poster = new_smartposter(Some(&message), None, None).unwrap();

    c.bench_function("smart_poster_parse", |b| {
        b.iter(|| black_box(get_smartposter(&poster).unwrap()));
    });
}

/// Benchmark record insertion into the middle of a message
fn bench_insert(c: &mut Criterion) {
    let mut group = c.benchmark_group("insert");

    for len in [16, 1024] {
        let base = create_message(len, 8);
        let batch: Vec<Record> = (0..8).map(|_| new_uri("tel:1")).collect();

        group.bench_with_input(BenchmarkId::new("len", len), &len, |b, &len| {
            b.iter(|| {
                let mut store = base.clone();
                store.insert_n(len / 2, &batch).unwrap();
                black_box(store)
            });
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_encode,
    bench_decode,
    bench_decode_chunked,
    bench_smart_poster,
    bench_insert,
);
criterion_main!(benches);
