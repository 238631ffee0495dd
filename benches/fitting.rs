//! Benchmarks for the font-fit solver.

use criterion::{Criterion, black_box, criterion_group, criterion_main};
use gephi_legend::fit::{FitConstraints, FontFitter, NodeLabel, solve};

fn labels(count: usize) -> Vec<NodeLabel> {
    let words = ["kinase", "metabolic", "pathway", "regulation", "signal", "transcription"];
    (0..count)
        .map(|i| NodeLabel {
            node_id: format!("n{i}"),
            text: words
                .iter()
                .cycle()
                .skip(i % words.len())
                .take(1 + i % 4)
                .copied()
                .collect::<Vec<_>>()
                .join(" "),
            diameter: 20.0 + (i % 17) as f64 * 12.0,
            font_size: 12.0,
        })
        .collect()
}

fn bench_solve_single(c: &mut Criterion) {
    c.bench_function("solve_single", |b| {
        b.iter(|| solve(black_box("Node Label Text"), black_box(50.0), FitConstraints::default()))
    });
}

fn bench_fit_labels(c: &mut Criterion) {
    let fitter = FontFitter::default();
    let labels = labels(500);
    c.bench_function("fit_labels_500", |b| {
        b.iter(|| fitter.fit_labels(black_box(&labels), FitConstraints::default(), false))
    });
    c.bench_function("fit_labels_500_ceiling", |b| {
        b.iter(|| fitter.fit_labels(black_box(&labels), FitConstraints::default(), true))
    });
}

criterion_group!(benches, bench_solve_single, bench_fit_labels);
criterion_main!(benches);
