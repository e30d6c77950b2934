//! Benchmarks for the stacking engine.

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use stacker::input::parse_line;
use stacker::{stack_height, ErrorPolicy, Simulation};

const EXAMPLE_LINE: &str = "Q0,I2,I6,I0,I6,I6,Q2,Q4";

/// A long line that keeps completing rows.
fn clearing_line() -> String {
    ["I0,I4,Q8,Q8"; 250].join(",")
}

/// Benchmark a short line end to end, parsing included.
fn bench_example_line(c: &mut Criterion) {
    c.bench_function("example_line", |b| {
        b.iter(|| stack_height(black_box(EXAMPLE_LINE)))
    });
}

/// Benchmark a long line with frequent clears.
fn bench_clearing_line(c: &mut Criterion) {
    let line = clearing_line();
    c.bench_function("clearing_line", |b| {
        b.iter(|| stack_height(black_box(&line)))
    });
}

/// Benchmark clears at the bottom of a tall stack.
fn bench_deep_clear(c: &mut Criterion) {
    let mut group = c.benchmark_group("deep_clear");
    group.sample_size(20);
    group.bench_function("tower_500", |b| {
        b.iter(|| {
            let mut simulation = Simulation::standard();
            for _ in 0..500 {
                let _ = simulation.drop_piece("Q", 8);
            }
            let _ = simulation.run_line(black_box("I0,I4"), ErrorPolicy::Halt);
            simulation.height()
        })
    });
    group.finish();
}

/// Benchmark token decoding on its own.
fn bench_parse(c: &mut Criterion) {
    let line = clearing_line();
    c.bench_function("parse_line", |b| b.iter(|| parse_line(black_box(&line))));
}

criterion_group!(
    benches,
    bench_example_line,
    bench_clearing_line,
    bench_deep_clear,
    bench_parse
);
criterion_main!(benches);
