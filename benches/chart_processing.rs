//! Benchmarks for chart processing operations
//!
//! Run with: cargo bench

use chrono::{DateTime, Duration, TimeZone, Utc};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use timeline_chart::chart::{ChartProps, TimelineChart};
use timeline_chart::config::ChartConfig;
use timeline_chart::interaction::{nearest_point_index, ChartCallbacks};
use timeline_chart::render::{ApproxTextMeasure, SvgOptions};
use timeline_chart::scale::compute_scales;
use timeline_chart::types::{Point, Series};

fn origin() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2020, 1, 1, 0, 0, 0).unwrap()
}

/// Hourly points with a gap every 97th sample
fn make_series(count: usize, name: &str) -> Series {
    let points = (0..count)
        .map(|i| {
            let x = origin() + Duration::hours(i as i64);
            if i % 97 == 96 {
                Point::gap(x)
            } else {
                Point::new(x, ((i as f64) * 0.01).sin() * 50.0 + 60.0)
            }
        })
        .collect();
    Series::new(name, points)
}

fn make_props(count: usize) -> ChartProps {
    let config = ChartConfig {
        show_areas: true,
        leak_period_date: Some(origin() + Duration::hours(count as i64 / 2)),
        ..ChartConfig::default()
    };
    ChartProps::new(
        config,
        vec![make_series(count, "bugs"), make_series(count, "smells")],
    )
}

fn bench_compute_scales(c: &mut Criterion) {
    let mut group = c.benchmark_group("compute_scales");

    for size in [1000, 10_000, 100_000].iter() {
        let props = make_props(*size);
        group.throughput(Throughput::Elements(*size as u64 * 2));
        group.bench_with_input(BenchmarkId::new("numeric", size), size, |b, _| {
            b.iter(|| black_box(compute_scales(&props.config, &props.series)))
        });
    }

    group.finish();
}

fn bench_render(c: &mut Criterion) {
    let mut group = c.benchmark_group("render");

    for size in [1000, 10_000, 50_000].iter() {
        let chart = TimelineChart::new(make_props(*size), ChartCallbacks::new());
        group.throughput(Throughput::Elements(*size as u64 * 2));
        group.bench_with_input(BenchmarkId::new("scene", size), size, |b, _| {
            b.iter(|| black_box(chart.scene(&ApproxTextMeasure)))
        });
        group.bench_with_input(BenchmarkId::new("svg", size), size, |b, _| {
            b.iter(|| black_box(chart.to_svg(&ApproxTextMeasure, &SvgOptions::default())))
        });
    }

    group.finish();
}

fn bench_nearest_point(c: &mut Criterion) {
    let mut group = c.benchmark_group("nearest_point");
    let series = make_series(100_000, "bugs");
    let target = origin() + Duration::minutes(2_500_010);

    group.bench_function("bisect_100k", |b| {
        b.iter(|| black_box(nearest_point_index(&series.points, black_box(&target))))
    });

    group.finish();
}

criterion_group!(benches, bench_compute_scales, bench_render, bench_nearest_point);
criterion_main!(benches);
