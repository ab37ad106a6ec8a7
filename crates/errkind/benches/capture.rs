//! Cost of creating an occurrence deep in the stack, with and without
//! frame capture, against a plain `std::io::Error`.

use std::hint::black_box;
use std::io;
use std::sync::LazyLock;

use criterion::{criterion_group, criterion_main, Criterion};
use errkind::{configure, CaptureConfig, Occurrence, Template};

static BENCH_ERROR: LazyLock<Template> = LazyLock::new(|| Template::new("benchmark"));

const DEPTH: usize = 1000;

#[inline(never)]
fn deep_error(level: usize) -> Occurrence {
    if level == 0 {
        return BENCH_ERROR.instantiate();
    }
    black_box(deep_error(level - 1))
}

#[inline(never)]
fn deep_error_standard(level: usize) -> io::Error {
    if level == 0 {
        return io::Error::new(io::ErrorKind::Other, "standard");
    }
    black_box(deep_error_standard(level - 1))
}

fn bench_stack(c: &mut Criterion) {
    let mut group = c.benchmark_group("deep_error");

    configure(CaptureConfig::default()).expect("default config is valid");
    group.bench_function("with_stack", |b| b.iter(|| deep_error(black_box(DEPTH))));

    configure(CaptureConfig::disabled()).expect("disabled config is valid");
    group.bench_function("without_stack", |b| b.iter(|| deep_error(black_box(DEPTH))));

    configure(CaptureConfig::default()).expect("default config is valid");
    group.bench_function("standard", |b| b.iter(|| deep_error_standard(black_box(DEPTH))));

    group.finish();
}

criterion_group!(benches, bench_stack);
criterion_main!(benches);
