//! Benchmarks for the flow solver.

use std::num::NonZero;
use std::sync::atomic::AtomicBool;

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use flowwalk::{Location, Puzzle, PuzzleBuilder, SearchOptions, Solver};

fn classic_five() -> Puzzle {
    // flow free classic pack level 1
    PuzzleBuilder::with_dims((NonZero::new(5).unwrap(), NonZero::new(5).unwrap()))
        .add_termini('A', (Location(0, 0), Location(1, 4)))
        .add_termini('B', (Location(2, 0), Location(1, 3)))
        .add_termini('C', (Location(2, 1), Location(2, 4)))
        .add_termini('D', (Location(4, 0), Location(3, 3)))
        .add_termini('E', (Location(4, 1), Location(3, 4)))
        .build()
        .unwrap()
}

fn four_by_four() -> Puzzle {
    PuzzleBuilder::with_dims((NonZero::new(4).unwrap(), NonZero::new(4).unwrap()))
        .add_termini('A', (Location(0, 0), Location(3, 3)))
        .add_termini('B', (Location(0, 1), Location(0, 3)))
        .add_termini('C', (Location(0, 2), Location(1, 2)))
        .build()
        .unwrap()
}

/// Benchmark solving a puzzle that propagation alone finishes.
fn bench_solve_classic(c: &mut Criterion) {
    let puzzle = classic_five();
    let cancel = AtomicBool::new(false);

    c.bench_function("solve_classic_5x5", |b| {
        b.iter(|| black_box(&puzzle).solve(&cancel))
    });
}

/// Benchmark the same search with and without pruning.
fn bench_pruning(c: &mut Criterion) {
    let puzzle = four_by_four();
    let cancel = AtomicBool::new(false);

    let mut group = c.benchmark_group("pruning");
    group.bench_function("default", |b| {
        b.iter(|| Solver::from(black_box(&puzzle)).solve(&cancel))
    });
    group.bench_function("exhaustive", |b| {
        b.iter(|| Solver::from(black_box(&puzzle)).with_options(SearchOptions::exhaustive()).solve(&cancel))
    });
    group.finish();
}

/// Benchmark checking a finished solution.
fn bench_validate(c: &mut Criterion) {
    let puzzle = classic_five();
    let solution = puzzle.solve(&AtomicBool::new(false)).unwrap();

    c.bench_function("validate_classic_5x5", |b| {
        b.iter(|| black_box(&solution).validate(&puzzle))
    });
}

criterion_group!(benches, bench_solve_classic, bench_pruning, bench_validate);
criterion_main!(benches);
