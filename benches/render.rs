//! Report rendering benchmark suite
//!
//! Benchmarks for the view pipeline over synthetic reports:
//! - JSON parsing of reports at various family counts
//! - View construction for compressed and raw encodings
//! - Text table rendering

use bench_report_viewer::display::render_text;
use bench_report_viewer::loader::parse_report;
use bench_report_viewer::sample::{generate_report, SampleConfig};
use bench_report_viewer::{render, ViewConfig};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

fn sample_json(families: usize, raw: bool) -> String {
    let report = generate_report(&SampleConfig {
        families,
        raw,
        ..Default::default()
    });
    serde_json::to_string(&report).expect("sample report serializes")
}

/// Benchmark parsing and view construction
fn bench_render(c: &mut Criterion) {
    let mut group = c.benchmark_group("render");
    let config = ViewConfig::default();

    for families in [4usize, 32, 256] {
        for raw in [false, true] {
            let encoding = if raw { "full" } else { "compressed" };
            let json = sample_json(families, raw);

            group.bench_with_input(
                BenchmarkId::new(format!("parse_{encoding}"), families),
                &json,
                |bencher, json| bencher.iter(|| black_box(parse_report(black_box(json)))),
            );

            let report = parse_report(&json).expect("sample report parses");
            group.bench_with_input(
                BenchmarkId::new(format!("view_{encoding}"), families),
                &report,
                |bencher, report| bencher.iter(|| black_box(render(black_box(report), &config))),
            );
        }
    }

    group.finish();
}

/// Benchmark text table output
fn bench_text_tables(c: &mut Criterion) {
    let config = ViewConfig::default();
    let report = parse_report(&sample_json(32, false)).expect("sample report parses");
    let view = render(&report, &config).expect("sample report renders");

    c.bench_function("render_text_32_families", |bencher| {
        bencher.iter(|| black_box(render_text(black_box(&view))))
    });
}

criterion_group!(benches, bench_render, bench_text_tables);
criterion_main!(benches);
