#![allow(missing_docs)]
//! Edit throughput of `ChunkString` against a flat `String`.

use std::{hint::black_box, time::Duration};

use chunkstring::{ChunkOptions, ChunkString, Delimiters, SplitOptions};
use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};

fn make_text(lines: usize) -> String {
    let mut text = String::new();
    for i in 0..lines {
        text.push_str(&format!("line {i:06}: the quick brown fox jumps over the lazy dog\n"));
    }
    text
}

fn bench_append(c: &mut Criterion) {
    let piece = "0123456789abcdefghijklmnopqrstuvwxyz";
    let mut group = c.benchmark_group("append");
    for &count in &[1_000usize, 10_000, 100_000] {
        group.bench_with_input(BenchmarkId::new("chunk_string", count), &count, |b, &n| {
            b.iter(|| {
                let mut text = ChunkString::new();
                for _ in 0..n {
                    text.append(black_box(piece)).unwrap();
                }
                black_box(text.len())
            });
        });
        group.bench_with_input(BenchmarkId::new("string", count), &count, |b, &n| {
            b.iter(|| {
                let mut text = String::new();
                for _ in 0..n {
                    text.push_str(black_box(piece));
                }
                black_box(text.len())
            });
        });
    }
    group.finish();
}

fn bench_insert_front(c: &mut Criterion) {
    let source = make_text(2_000);
    let mut group = c.benchmark_group("insert_front");
    for &chunk in &[256usize, 4_096, 16_384] {
        let options = ChunkOptions::with_max_chunk_len(chunk);
        group.bench_with_input(BenchmarkId::new("chunk_len", chunk), &options, |b, &options| {
            b.iter(|| {
                let mut text = ChunkString::from_str_with(&source, options).unwrap();
                for _ in 0..100 {
                    text.insert(0, black_box("> ")).unwrap();
                }
                black_box(text.len())
            });
        });
    }
    group.finish();
}

fn bench_search_and_split(c: &mut Criterion) {
    let text = ChunkString::from_str_with(&make_text(5_000), ChunkOptions::with_max_chunk_len(1_024))
        .unwrap();
    let mut group = c.benchmark_group("search");
    group.bench_function("last_index_of", |b| {
        b.iter(|| black_box(text.last_index_of(black_box("line 000000"))));
    });
    group.bench_function("split_lines", |b| {
        b.iter(|| {
            let parts = text.split(&Delimiters::Chars(&['\n']), SplitOptions::omit_empty());
            black_box(parts.len())
        });
    });
    group.finish();
}

fn bench_format(c: &mut Criterion) {
    let args = ["alpha", "beta", "gamma"];
    c.bench_function("append_format", |b| {
        b.iter(|| {
            let mut text = ChunkString::new();
            for _ in 0..1_000 {
                text.append_format(black_box("{0} -> {1,8} ({2}) {{literal}}\n"), &args)
                    .unwrap();
            }
            black_box(text.len())
        });
    });
}

fn criterion() -> Criterion {
    let mut c = Criterion::default();
    if cfg!(feature = "bench-fast") {
        c = c
            .warm_up_time(Duration::from_millis(10))
            .measurement_time(Duration::from_millis(100))
            .sample_size(10);
    } else {
        c = c
            .warm_up_time(Duration::from_secs(3))
            .measurement_time(Duration::from_secs(5));
    }
    c
}

criterion_group! {
    name = benches;
    config = criterion();
    targets = bench_append, bench_insert_front, bench_search_and_split, bench_format
}
criterion_main!(benches);
