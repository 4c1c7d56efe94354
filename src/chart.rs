//! The timeline chart component
//!
//! [`TimelineChart`] ties the pieces together: it owns the current props,
//! rebuilds its [`ChartState`] when a scale input changes, routes pointer and
//! wheel input to the [`InteractionTracker`] and renders [`Scene`]s on demand.
//!
//! # Main Types
//!
//! - [`TimelineChart`] - one chart instance
//! - [`ChartProps`] - caller-owned inputs (config, series, tick formatter)
//! - [`ChartState`] - derived view state, replaced on every recompute

use crate::config::{ChartConfig, ChartDocument, TickFormatter};
use crate::interaction::{
    ChartCallbacks, InteractionState, InteractionTracker, SelectedPoint, WheelDeltaMode,
    WheelEvent,
};
use crate::render::{render_scene, write_svg, RenderContext, Scene, SvgOptions, TextMeasure};
use crate::scale::{compute_scales, Scales};
use crate::types::Series;
use std::fmt;
use std::sync::Arc;
use std::time::Instant;

/// Font size used when measuring legend text
pub const DEFAULT_FONT_SIZE: f32 = 12.0;

/// Inputs of a chart
///
/// Series are shared behind an `Arc`; handing the chart the same `Arc` again
/// counts as "unchanged" and keeps the current scales.
#[derive(Clone)]
pub struct ChartProps {
    pub config: ChartConfig,
    pub series: Arc<[Series]>,
    /// Overrides `config.y_tick_format` when set
    pub y_tick_formatter: Option<TickFormatter>,
}

impl ChartProps {
    pub fn new(config: ChartConfig, series: impl Into<Arc<[Series]>>) -> Self {
        Self {
            config,
            series: series.into(),
            y_tick_formatter: None,
        }
    }

    pub fn with_formatter(mut self, formatter: TickFormatter) -> Self {
        self.y_tick_formatter = Some(formatter);
        self
    }

    pub fn from_document(document: ChartDocument) -> Self {
        Self::new(document.chart, document.series)
    }

    /// Whether the scales must be recomputed when going from `self` to `next`
    fn scales_differ(&self, next: &ChartProps) -> bool {
        self.config.scales_differ(&next.config) || !Arc::ptr_eq(&self.series, &next.series)
    }
}

impl fmt::Debug for ChartProps {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChartProps")
            .field("config", &self.config)
            .field("series", &self.series.len())
            .field("y_tick_formatter", &self.y_tick_formatter.is_some())
            .finish()
    }
}

/// Derived view state of a chart with a drawable area
#[derive(Debug, Clone, PartialEq)]
pub struct ChartState {
    pub scales: Scales,
}

/// An interactive time-series chart
#[derive(Debug)]
pub struct TimelineChart {
    props: ChartProps,
    state: Option<ChartState>,
    tracker: InteractionTracker,
    font_size: f32,
}

impl TimelineChart {
    /// Create a chart; an initial `selected_date` is resolved silently
    pub fn new(props: ChartProps, callbacks: ChartCallbacks) -> Self {
        let mut chart = Self {
            state: build_state(&props),
            props,
            tracker: InteractionTracker::new(callbacks),
            font_size: DEFAULT_FONT_SIZE,
        };
        if let Some(state) = &chart.state {
            chart
                .tracker
                .select_date(chart.props.config.selected_date, &state.scales, &chart.props.series);
        }
        chart
    }

    pub fn with_font_size(mut self, font_size: f32) -> Self {
        self.font_size = font_size;
        self
    }

    pub fn props(&self) -> &ChartProps {
        &self.props
    }

    pub fn config(&self) -> &ChartConfig {
        &self.props.config
    }

    pub fn series(&self) -> &[Series] {
        &self.props.series
    }

    /// Current view state, `None` when there is no drawable area
    pub fn state(&self) -> Option<&ChartState> {
        self.state.as_ref()
    }

    pub fn scales(&self) -> Option<&Scales> {
        self.state.as_ref().map(|s| &s.scales)
    }

    pub fn interaction(&self) -> &InteractionState {
        self.tracker.state()
    }

    pub fn selected(&self) -> Option<SelectedPoint> {
        self.tracker.selected()
    }

    /// Wheel zoom is active
    pub fn zoom_enabled(&self) -> bool {
        !self.props.config.disable_zoom && self.tracker.has_zoom_callback()
    }

    pub fn set_callbacks(&mut self, callbacks: ChartCallbacks) {
        self.tracker.set_callbacks(callbacks);
    }

    /// Replace the props, recomputing only what changed
    ///
    /// Scales are rebuilt when size, padding, window, metric type or the
    /// series reference change. A selection is re-resolved after a rebuild
    /// and whenever `selected_date` changes; the tooltip hook hears the
    /// result.
    pub fn set_props(&mut self, props: ChartProps) {
        let rebuild = self.props.scales_differ(&props);
        let selected_date_changed = self.props.config.selected_date != props.config.selected_date;
        let previous = self.tracker.selected().map(|s| s.date);
        self.props = props;

        if rebuild {
            self.state = build_state(&self.props);
        }

        let date = if selected_date_changed {
            self.props.config.selected_date
        } else if rebuild && previous.is_some() {
            previous
        } else {
            return;
        };

        match &self.state {
            Some(state) => {
                self.tracker.sync_selected_date(date, &state.scales, &self.props.series);
            }
            None => self.tracker.clear_selection(),
        }
    }

    /// Change the outer size
    pub fn resize(&mut self, width: f64, height: f64) {
        if width == self.props.config.width && height == self.props.config.height {
            return;
        }
        let mut props = self.props.clone();
        props.config.width = width;
        props.config.height = height;
        self.set_props(props);
    }

    pub fn pointer_enter(&mut self) {
        self.tracker.pointer_enter();
    }

    /// Pointer moved to `x` pixels right of the plot's left edge
    pub fn pointer_move(&mut self, x: f64, now: Instant) {
        if let Some(state) = &self.state {
            self.tracker.pointer_move(x, now, &state.scales, &self.props.series);
        }
    }

    pub fn pointer_leave(&mut self) {
        self.tracker.pointer_leave();
    }

    pub fn click(&mut self) {
        self.tracker.click();
    }

    /// Wheel over the plot at `x` pixels right of its left edge
    pub fn wheel(&mut self, x: f64, delta_y: f64, delta_mode: WheelDeltaMode, now: Instant) {
        let zoom_enabled = self.zoom_enabled();
        let Some(state) = &self.state else {
            return;
        };
        let [r0, r1] = state.scales.x.range();
        let width = r1 - r0;
        let event = WheelEvent {
            delta_y,
            delta_mode,
            pointer_fraction: if width > 0.0 { x / width } else { 0.5 },
        };
        self.tracker
            .wheel(&event, now, &state.scales, self.props.config.zoom_speed, zoom_enabled);
    }

    /// Release throttled updates that are due
    pub fn poll(&mut self, now: Instant) {
        if let Some(state) = &self.state {
            self.tracker.poll(now, &state.scales, &self.props.series);
        }
    }

    /// When [`poll`](Self::poll) next has work, if at all
    pub fn next_deadline(&self) -> Option<Instant> {
        self.tracker.next_deadline()
    }

    /// Render the current state; an empty scene when there is nothing to draw
    pub fn scene(&self, measure: &dyn TextMeasure) -> Scene {
        let config = &self.props.config;
        let Some(state) = &self.state else {
            return Scene::empty(config.width, config.height);
        };

        let builtin = config.y_tick_format.map(|f| f.formatter());
        let ctx = RenderContext {
            config,
            scales: &state.scales,
            series: &self.props.series,
            selected: self.tracker.selected(),
            y_tick_formatter: self.props.y_tick_formatter.as_ref().or(builtin.as_ref()),
            zoom_enabled: self.zoom_enabled(),
            font_size: self.font_size,
        };
        render_scene(&ctx, measure)
    }

    /// Render the current state as an SVG document
    pub fn to_svg(&self, measure: &dyn TextMeasure, options: &SvgOptions) -> String {
        write_svg(&self.scene(measure), options)
    }
}

fn build_state(props: &ChartProps) -> Option<ChartState> {
    if !props.config.has_drawable_area() {
        tracing::debug!(
            "No drawable area for {}x{}, skipping scales",
            props.config.width,
            props.config.height
        );
        return None;
    }
    match compute_scales(&props.config, &props.series) {
        Ok(scales) => Some(ChartState { scales }),
        Err(e) => {
            tracing::warn!("Failed to compute scales: {}", e);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Padding, YTickFormat};
    use crate::interaction::THROTTLE_INTERVAL;
    use crate::render::{ApproxTextMeasure, Role};
    use crate::types::{Point, Value};
    use chrono::{DateTime, TimeZone, Utc};
    use std::cell::RefCell;
    use std::rc::Rc;

    fn day(d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, d, 0, 0, 0).unwrap()
    }

    fn props() -> ChartProps {
        let config = ChartConfig {
            padding: Padding::uniform(0.0),
            ..ChartConfig::default()
        }
        .with_size(100.0, 100.0);
        let series = vec![Series::new(
            "bugs",
            (1..=11).map(|d| Point::new(day(d), d as f64)).collect(),
        )];
        ChartProps::new(config, series)
    }

    type Log = Rc<RefCell<Vec<Option<SelectedPoint>>>>;

    fn tooltip_log() -> (Log, ChartCallbacks) {
        let log: Log = Rc::new(RefCell::new(Vec::new()));
        let sink = log.clone();
        (log, ChartCallbacks::new().with_tooltip(move |s| sink.borrow_mut().push(s)))
    }

    #[test]
    fn test_initial_selection_is_silent() {
        let mut props = props();
        props.config.selected_date = Some(day(4));
        let (log, callbacks) = tooltip_log();
        let chart = TimelineChart::new(props, callbacks);
        assert_eq!(chart.selected().map(|s| s.index), Some(3));
        assert!(log.borrow().is_empty());
    }

    #[test]
    fn test_selected_date_prop_change_notifies() {
        let (log, callbacks) = tooltip_log();
        let mut chart = TimelineChart::new(props(), callbacks);
        let mut next = chart.props().clone();
        next.config.selected_date = Some(day(6));
        chart.set_props(next);
        assert_eq!(chart.selected().map(|s| s.x), Some(50.0));
        assert_eq!(log.borrow().len(), 1);

        // Same props again: nothing recomputed, nothing notified
        chart.set_props(chart.props().clone());
        assert_eq!(log.borrow().len(), 1);
    }

    #[test]
    fn test_zoom_clears_offscreen_selection() {
        let mut props = props();
        props.config.selected_date = Some(day(2));
        let (log, callbacks) = tooltip_log();
        let mut chart = TimelineChart::new(props, callbacks);

        let mut zoomed = chart.props().clone();
        zoomed.config.start_date = Some(day(5));
        chart.set_props(zoomed);
        assert_eq!(chart.selected(), None);
        assert_eq!(log.borrow().as_slice(), &[None]);
        assert!(chart.scene(&ApproxTextMeasure).zoomed);
    }

    #[test]
    fn test_new_series_reference_rebuilds_scales() {
        let mut chart = TimelineChart::new(props(), ChartCallbacks::new());
        let before = chart.scales().cloned();
        let mut next = chart.props().clone();
        next.series = vec![Series::new("bugs", vec![Point::new(day(1), 100.0), Point::new(day(2), 0.0)])].into();
        chart.set_props(next);
        assert_ne!(chart.scales().cloned(), before);
    }

    #[test]
    fn test_no_drawable_area() {
        let mut props = props();
        props.config.padding = Padding::new(60.0, 0.0, 60.0, 0.0);
        let chart = TimelineChart::new(props, ChartCallbacks::new());
        assert!(chart.state().is_none());
        let scene = chart.scene(&ApproxTextMeasure);
        assert!(scene.is_empty());
        assert_eq!(scene.width, 100.0);
    }

    #[test]
    fn test_resize_recomputes() {
        let mut chart = TimelineChart::new(props(), ChartCallbacks::new());
        chart.resize(200.0, 100.0);
        assert_eq!(chart.scales().map(|s| s.x.range()), Some([0.0, 200.0]));
        chart.resize(0.0, 0.0);
        assert!(chart.state().is_none());
    }

    #[test]
    fn test_zoom_enabled_needs_callback() {
        let chart = TimelineChart::new(props(), ChartCallbacks::new());
        assert!(!chart.zoom_enabled());
        assert!(chart.scene(&ApproxTextMeasure).clip.is_none());

        let mut props = props();
        props.config.disable_zoom = true;
        let chart = TimelineChart::new(props, ChartCallbacks::new().with_zoom(|_| {}));
        assert!(!chart.zoom_enabled());

        let chart = TimelineChart::new(self::props(), ChartCallbacks::new().with_zoom(|_| {}));
        assert!(chart.zoom_enabled());
        assert!(chart.scene(&ApproxTextMeasure).clip.is_some());
    }

    #[test]
    fn test_wheel_zoom_in_emits_window() {
        let windows = Rc::new(RefCell::new(Vec::new()));
        let sink = windows.clone();
        let mut chart = TimelineChart::new(props(), ChartCallbacks::new().with_zoom(move |w| sink.borrow_mut().push(w)));
        let now = Instant::now();
        chart.wheel(50.0, -20.0, WheelDeltaMode::Pixel, now);
        assert_eq!(windows.borrow().len(), 1);
        assert_eq!(windows.borrow()[0].start, Some(day(2)));
        assert_eq!(windows.borrow()[0].end, Some(day(10)));

        chart.wheel(50.0, -20.0, WheelDeltaMode::Pixel, now);
        assert!(chart.next_deadline().is_some());
        chart.poll(now + THROTTLE_INTERVAL);
        assert_eq!(windows.borrow().len(), 2);
    }

    #[test]
    fn test_hover_then_render_crosshair() {
        let (_log, callbacks) = tooltip_log();
        let mut chart = TimelineChart::new(props(), callbacks);
        chart.pointer_enter();
        chart.pointer_move(31.0, Instant::now());
        let scene = chart.scene(&ApproxTextMeasure);
        assert_eq!(scene.count(|r| *r == Role::Crosshair), 1);
        assert_eq!(scene.count(|r| matches!(r, Role::SelectedDot(0))), 1);
    }

    #[test]
    fn test_builtin_formatter_is_used() {
        let mut props = props();
        props.config.y_tick_format = Some(YTickFormat::Integer);
        let chart = TimelineChart::new(props, ChartCallbacks::new());
        let scene = chart.scene(&ApproxTextMeasure);
        assert!(!scene.texts(Role::GridLabel).is_empty());

        let custom = chart.props().clone().with_formatter(Arc::new(|_: &Value| "x".to_string()));
        let chart = TimelineChart::new(custom, ChartCallbacks::new());
        let scene = chart.scene(&ApproxTextMeasure);
        // Every label collides, so only the domain ends remain
        assert_eq!(scene.texts(Role::GridLabel), vec!["x", "x"]);
    }
}
