//! Integration tests for pointer and wheel interaction
//!
//! These tests drive a full TimelineChart the way a host would:
//! - Nearest-point hover resolution
//! - Wheel zoom applied back as start/end props
//! - Selection sync when props change

mod common;

use chrono::{DateTime, Duration as ChronoDuration, Utc};
use common::builders::SeriesBuilder;
use common::{day, day_hours, plot_config};
use proptest::prelude::*;
use std::cell::RefCell;
use std::collections::BTreeSet;
use std::rc::Rc;
use std::time::{Duration, Instant};
use timeline_chart::chart::{ChartProps, TimelineChart};
use timeline_chart::interaction::{
    nearest_point_index, ChartCallbacks, SelectedPoint, WheelDeltaMode, ZoomWindow,
    THROTTLE_INTERVAL,
};
use timeline_chart::types::{Point, Series};

fn ten_days() -> Vec<Series> {
    vec![
        SeriesBuilder::new("bugs").values(1, &[5.0, 3.0, 8.0, 2.0, 7.0, 4.0, 6.0, 1.0, 9.0, 5.0]).build(),
        SeriesBuilder::new("smells").values(1, &[1.0, 1.0, 2.0]).build(),
    ]
}

fn points_at(offsets: &BTreeSet<i64>) -> Vec<Point> {
    offsets
        .iter()
        .map(|m| Point::new(day(1) + ChronoDuration::minutes(*m), 1.0))
        .collect()
}

/// Index of the earliest point at minimal distance
fn brute_force_nearest(points: &[Point], date: &DateTime<Utc>) -> Option<usize> {
    let mut best: Option<(usize, i64)> = None;
    for (i, p) in points.iter().enumerate() {
        let distance = (p.x - *date).num_milliseconds().abs();
        if best.map_or(true, |(_, d)| distance < d) {
            best = Some((i, distance));
        }
    }
    best.map(|(i, _)| i)
}

proptest! {
    #[test]
    fn prop_exact_match_returns_own_index(offsets in prop::collection::btree_set(0i64..100_000, 1..60)) {
        let points = points_at(&offsets);
        for (i, p) in points.iter().enumerate() {
            prop_assert_eq!(nearest_point_index(&points, &p.x), Some(i));
        }
    }

    #[test]
    fn prop_nearest_prefers_earlier_on_tie(
        offsets in prop::collection::btree_set(0i64..10_000, 1..40),
        query in -500i64..10_500,
    ) {
        let points = points_at(&offsets);
        let date = day(1) + ChronoDuration::minutes(query);
        prop_assert_eq!(nearest_point_index(&points, &date), brute_force_nearest(&points, &date));
    }

    #[test]
    fn prop_zoom_never_exceeds_data_range(
        wheel in prop::collection::vec((-200.0f64..200.0, 0.0f64..=1.0), 1..30),
    ) {
        let series = ten_days();
        let windows: Rc<RefCell<Vec<ZoomWindow>>> = Rc::new(RefCell::new(Vec::new()));
        let sink = windows.clone();
        let mut chart = TimelineChart::new(
            ChartProps::new(plot_config(900.0, 100.0), series),
            ChartCallbacks::new().with_zoom(move |w| sink.borrow_mut().push(w)),
        );

        let mut now = Instant::now();
        for (delta, fraction) in wheel {
            now += THROTTLE_INTERVAL + Duration::from_millis(1);
            chart.wheel(fraction * 900.0, delta, WheelDeltaMode::Pixel, now);

            // Apply the request like a host would
            let Some(window) = windows.borrow().last().copied() else { continue };
            prop_assert!(window.start.map_or(true, |s| s >= day(1)));
            prop_assert!(window.end.map_or(true, |e| e <= day(10)));

            let mut props = chart.props().clone();
            props.config.start_date = window.start;
            props.config.end_date = window.end;
            chart.set_props(props);

            let scales = chart.scales().unwrap();
            let [start, end] = scales.x.domain();
            prop_assert!(start >= day(1) && end <= day(10));
            prop_assert!(scales.max_x_range[0] <= 0.0 + 1e-9);
            prop_assert!(scales.max_x_range[1] >= 900.0 - 1e-9);
        }
    }
}

#[test]
fn test_hover_resolves_nearest_and_leave_clears() {
    let tooltips: Rc<RefCell<Vec<Option<SelectedPoint>>>> = Rc::new(RefCell::new(Vec::new()));
    let sink = tooltips.clone();
    let mut chart = TimelineChart::new(
        ChartProps::new(plot_config(900.0, 100.0), ten_days()),
        ChartCallbacks::new().with_tooltip(move |s| sink.borrow_mut().push(s)),
    );

    // 100px per day: 240px is day 3 plus 9.6 hours
    chart.pointer_enter();
    chart.pointer_move(240.0, Instant::now());
    let selected = tooltips.borrow().last().copied().flatten().unwrap();
    assert_eq!(selected.index, 2);
    assert_eq!(selected.date, day(3));
    assert_eq!(selected.x, 200.0);

    chart.pointer_leave();
    assert_eq!(tooltips.borrow().last(), Some(&None));
    assert!(chart.selected().is_none());
}

#[test]
fn test_hover_midpoint_prefers_earlier_point() {
    let mut chart = TimelineChart::new(
        ChartProps::new(plot_config(900.0, 100.0), ten_days()),
        ChartCallbacks::new().with_tooltip(|_| {}),
    );
    let t0 = Instant::now();
    chart.pointer_enter();
    chart.pointer_move(450.0, t0);
    assert_eq!(chart.selected().map(|s| s.date), Some(day(5)));

    chart.pointer_move(451.0, t0 + THROTTLE_INTERVAL);
    assert_eq!(chart.selected().map(|s| s.index), Some(5));
    assert!(day_hours(5, 12) < chart.selected().unwrap().date);
}

#[test]
fn test_hover_near_edge_of_zoomed_chart_stays_in_range() {
    let series = vec![Series::new(
        "bugs",
        vec![Point::new(day(1), 4.0), Point::new(day(10), 2.0)],
    )];
    let mut props = ChartProps::new(plot_config(900.0, 100.0), series);
    props.config.start_date = Some(day(3));
    let tooltips = Rc::new(RefCell::new(Vec::new()));
    let sink = tooltips.clone();
    let mut chart = TimelineChart::new(
        props,
        ChartCallbacks::new().with_tooltip(move |s| sink.borrow_mut().push(s)),
    );

    // Day 1 is nearest to the left edge but sits at about -257px
    chart.pointer_enter();
    chart.pointer_move(0.0, Instant::now());
    let selected = chart.selected().unwrap();
    let [r0, r1] = chart.scales().unwrap().x.range();
    assert!(selected.x >= r0 && selected.x <= r1);
    assert_eq!(selected.date, day(10));
    assert_eq!(selected.x, 900.0);
    assert_eq!(*tooltips.borrow(), vec![Some(selected)]);
}

#[test]
fn test_click_commits_hovered_date() {
    let committed = Rc::new(RefCell::new(Vec::new()));
    let sink = committed.clone();
    let mut chart = TimelineChart::new(
        ChartProps::new(plot_config(900.0, 100.0), ten_days()),
        ChartCallbacks::new()
            .with_tooltip(|_| {})
            .with_selection(move |d| sink.borrow_mut().push(d)),
    );
    chart.pointer_enter();
    chart.pointer_move(710.0, Instant::now());
    chart.click();
    assert_eq!(*committed.borrow(), vec![Some(day(8))]);
}

#[test]
fn test_throttled_hover_releases_latest_position() {
    let count = Rc::new(RefCell::new(0usize));
    let counter = count.clone();
    let mut chart = TimelineChart::new(
        ChartProps::new(plot_config(900.0, 100.0), ten_days()),
        ChartCallbacks::new().with_tooltip(move |_| *counter.borrow_mut() += 1),
    );
    chart.pointer_enter();

    let t0 = Instant::now();
    for step in 0..20u64 {
        chart.pointer_move(step as f64 * 40.0, t0 + Duration::from_millis(step));
    }
    assert_eq!(*count.borrow(), 1);
    assert_eq!(chart.next_deadline(), Some(t0 + THROTTLE_INTERVAL));

    chart.poll(t0 + THROTTLE_INTERVAL);
    assert_eq!(*count.borrow(), 2);
    // 760px is nearest to day 9
    assert_eq!(chart.selected().map(|s| s.index), Some(8));
}

#[test]
fn test_zoom_out_from_full_range_is_unbounded() {
    let windows = Rc::new(RefCell::new(Vec::new()));
    let sink = windows.clone();
    let mut chart = TimelineChart::new(
        ChartProps::new(plot_config(900.0, 100.0), ten_days()),
        ChartCallbacks::new().with_zoom(move |w| sink.borrow_mut().push(w)),
    );
    chart.wheel(300.0, 120.0, WheelDeltaMode::Line, Instant::now());
    assert_eq!(*windows.borrow(), vec![ZoomWindow::default()]);
}

#[test]
fn test_page_wheel_uses_half_line_factor() {
    let windows = Rc::new(RefCell::new(Vec::new()));
    let sink = windows.clone();
    let mut chart = TimelineChart::new(
        ChartProps::new(plot_config(900.0, 100.0), ten_days()),
        ChartCallbacks::new().with_zoom(move |w| sink.borrow_mut().push(w)),
    );
    // 4 pages of 12.5px at the left edge pull the right edge in by half a day
    chart.wheel(0.0, -4.0, WheelDeltaMode::Page, Instant::now());
    assert_eq!(
        *windows.borrow(),
        vec![ZoomWindow {
            start: None,
            end: Some(day_hours(9, 12)),
        }]
    );
}

#[test]
fn test_selected_date_follows_zoom() {
    let mut props = ChartProps::new(plot_config(900.0, 100.0), ten_days());
    props.config.selected_date = Some(day(3));
    let mut chart = TimelineChart::new(props, ChartCallbacks::new().with_tooltip(|_| {}));
    assert_eq!(chart.selected().map(|s| s.x), Some(200.0));

    // Zooming to days 2..=6 moves the selection to the new pixel position
    let mut zoomed = chart.props().clone();
    zoomed.config.start_date = Some(day(2));
    zoomed.config.end_date = Some(day(6));
    chart.set_props(zoomed);
    assert_eq!(chart.selected().map(|s| s.x), Some(225.0));

    // Zooming past it clears it
    let mut zoomed = chart.props().clone();
    zoomed.config.start_date = Some(day(4));
    chart.set_props(zoomed);
    assert_eq!(chart.selected(), None);
}
