//! Pointer and wheel interaction
//!
//! [`InteractionTracker`] turns plot-relative pointer positions and wheel
//! deltas into selection, tooltip and zoom notifications. It never touches
//! series data; scales and series are borrowed per event from the owning
//! chart.

use super::throttle::Throttle;
use crate::scale::Scales;
use crate::types::{Point, Series};
use chrono::{DateTime, Utc};
use std::fmt;
use std::time::{Duration, Instant};

/// Minimum time between two hover or zoom notifications (25 per second)
pub const THROTTLE_INTERVAL: Duration = Duration::from_millis(40);

/// Wheel delta multiplier for line and page delta modes
const WHEEL_MODE_FACTOR: f64 = 25.0;

/// A point of the first series resolved from a date
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SelectedPoint {
    /// Timestamp of the point
    pub date: DateTime<Utc>,
    /// Pixel position of the point on the x scale
    pub x: f64,
    /// Index of the point in every series
    pub index: usize,
}

/// Hover and selection state of one chart
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct InteractionState {
    /// Pointer is over the plot area
    pub mouse_over: bool,
    /// Currently selected point
    pub selected: Option<SelectedPoint>,
}

/// Unit of a wheel delta
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WheelDeltaMode {
    #[default]
    Pixel,
    Line,
    Page,
}

impl WheelDeltaMode {
    fn multiplier(&self) -> f64 {
        match self {
            WheelDeltaMode::Pixel => 1.0,
            WheelDeltaMode::Line => WHEEL_MODE_FACTOR,
            WheelDeltaMode::Page => WHEEL_MODE_FACTOR / 2.0,
        }
    }
}

/// A wheel event over the plot area
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WheelEvent {
    /// Vertical delta, positive when scrolling down (zooming out)
    pub delta_y: f64,
    pub delta_mode: WheelDeltaMode,
    /// Horizontal pointer position as a fraction of the plot width
    pub pointer_fraction: f64,
}

/// Requested zoom window; `None` means the full data bound on that side
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ZoomWindow {
    pub start: Option<DateTime<Utc>>,
    pub end: Option<DateTime<Utc>>,
}

pub type SelectionCallback = Box<dyn FnMut(Option<DateTime<Utc>>)>;
pub type TooltipCallback = Box<dyn FnMut(Option<SelectedPoint>)>;
pub type ZoomCallback = Box<dyn FnMut(ZoomWindow)>;

/// Caller-supplied notification hooks, all optional
///
/// Which hooks are present also decides which interactions are tracked:
/// hover needs a tooltip hook, click a selection hook and wheel zoom a zoom
/// hook.
#[derive(Default)]
pub struct ChartCallbacks {
    pub on_selection: Option<SelectionCallback>,
    pub on_tooltip: Option<TooltipCallback>,
    pub on_zoom: Option<ZoomCallback>,
}

impl ChartCallbacks {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_selection(mut self, f: impl FnMut(Option<DateTime<Utc>>) + 'static) -> Self {
        self.on_selection = Some(Box::new(f));
        self
    }

    pub fn with_tooltip(mut self, f: impl FnMut(Option<SelectedPoint>) + 'static) -> Self {
        self.on_tooltip = Some(Box::new(f));
        self
    }

    pub fn with_zoom(mut self, f: impl FnMut(ZoomWindow) + 'static) -> Self {
        self.on_zoom = Some(Box::new(f));
        self
    }
}

impl fmt::Debug for ChartCallbacks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChartCallbacks")
            .field("on_selection", &self.on_selection.is_some())
            .field("on_tooltip", &self.on_tooltip.is_some())
            .field("on_zoom", &self.on_zoom.is_some())
            .finish()
    }
}

/// Index of the point closest in time to `date`
///
/// Finds the insertion index by right-bisection, then picks the nearer of the
/// two neighbours. Equal distances and a missing right neighbour resolve to
/// the earlier point. Returns `None` only for an empty slice.
pub fn nearest_point_index(points: &[Point], date: &DateTime<Utc>) -> Option<usize> {
    if points.is_empty() {
        return None;
    }
    let idx = points.partition_point(|p| p.x <= *date);
    let Some(next) = points.get(idx) else {
        return Some(idx - 1);
    };
    match idx.checked_sub(1).map(|i| (i, &points[i])) {
        Some((prev_idx, prev)) if (*date - prev.x) <= (next.x - *date) => Some(prev_idx),
        _ => Some(idx),
    }
}

/// Resolve an externally selected date against the first series
///
/// The date must match a point exactly and lie inside the visible x range.
pub fn selected_point_for_date(
    scales: &Scales,
    series: &[Series],
    date: &DateTime<Utc>,
) -> Option<SelectedPoint> {
    let first = series.first()?;
    let index = first.points.iter().position(|p| p.x == *date)?;
    visible_point(scales, &first.points, index)
}

/// The point at `index` if its pixel position lies inside the x range
fn visible_point(scales: &Scales, points: &[Point], index: usize) -> Option<SelectedPoint> {
    let date = points.get(index)?.x;
    let x = scales.x.map(&date);
    let [r0, r1] = scales.x.range();
    (x >= r0.min(r1) && x <= r0.max(r1)).then_some(SelectedPoint { date, x, index })
}

/// Visible point to highlight for a pointer at `x` pixels
///
/// Falls back to the closer visible neighbour when the nearest point has
/// been zoomed out of view.
fn hover_candidate(scales: &Scales, points: &[Point], x: f64) -> Option<SelectedPoint> {
    let nearest = nearest_point_index(points, &scales.x.invert(x))?;
    if let Some(selected) = visible_point(scales, points, nearest) {
        return Some(selected);
    }
    let before = nearest
        .checked_sub(1)
        .and_then(|i| visible_point(scales, points, i));
    let after = visible_point(scales, points, nearest + 1);
    match (before, after) {
        (Some(a), Some(b)) => Some(if (a.x - x).abs() <= (b.x - x).abs() { a } else { b }),
        (a, b) => a.or(b),
    }
}

/// Rounds half-way cases towards positive infinity
fn round_half_up(x: f64) -> f64 {
    (x + 0.5).floor()
}

/// Compute the zoom window requested by a wheel event
///
/// The delta is split between both edges in proportion to the pointer
/// position; an edge that would move past the full data range is left
/// unbounded.
pub fn zoom_window(event: &WheelEvent, scales: &Scales, zoom_speed: f64) -> ZoomWindow {
    let speed = event.delta_mode.multiplier() * zoom_speed;
    let fraction = event.pointer_fraction.clamp(0.0, 1.0);
    let [r0, r1] = scales.x.range();
    let left = r0 - round_half_up(speed * event.delta_y * fraction);
    let right = r1 + round_half_up(speed * event.delta_y * (1.0 - fraction));

    ZoomWindow {
        start: (left > scales.max_x_range[0]).then(|| scales.x.invert(left)),
        end: (right < scales.max_x_range[1]).then(|| scales.x.invert(right)),
    }
}

/// Tracks hover, selection and zoom for one chart instance
#[derive(Debug)]
pub struct InteractionTracker {
    state: InteractionState,
    callbacks: ChartCallbacks,
    hover: Throttle<f64>,
    zoom: Throttle<ZoomWindow>,
}

impl InteractionTracker {
    /// Create a tracker with the given callbacks
    pub fn new(callbacks: ChartCallbacks) -> Self {
        Self {
            state: InteractionState::default(),
            callbacks,
            hover: Throttle::new(THROTTLE_INTERVAL),
            zoom: Throttle::new(THROTTLE_INTERVAL),
        }
    }

    pub fn state(&self) -> &InteractionState {
        &self.state
    }

    pub fn selected(&self) -> Option<SelectedPoint> {
        self.state.selected
    }

    /// Replace the callbacks, dropping any throttled work
    pub fn set_callbacks(&mut self, callbacks: ChartCallbacks) {
        self.callbacks = callbacks;
        self.hover.cancel();
        self.zoom.cancel();
    }

    pub fn tracks_hover(&self) -> bool {
        self.callbacks.on_tooltip.is_some()
    }

    pub fn tracks_clicks(&self) -> bool {
        self.callbacks.on_selection.is_some()
    }

    pub fn has_zoom_callback(&self) -> bool {
        self.callbacks.on_zoom.is_some()
    }

    /// Whether throttled work is waiting for [`poll`](Self::poll)
    pub fn has_pending(&self) -> bool {
        self.hover.has_pending() || self.zoom.has_pending()
    }

    /// Earliest time at which [`poll`](Self::poll) can release work
    pub fn next_deadline(&self) -> Option<Instant> {
        match (self.hover.deadline(), self.zoom.deadline()) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        }
    }

    pub fn pointer_enter(&mut self) {
        if self.tracks_hover() {
            self.state.mouse_over = true;
        }
    }

    /// Pointer moved to `x` pixels from the plot's left edge
    pub fn pointer_move(&mut self, x: f64, now: Instant, scales: &Scales, series: &[Series]) {
        if !self.tracks_hover() {
            return;
        }
        if let Some(x) = self.hover.call(now, x) {
            self.resolve_hover(x, scales, series);
        }
    }

    /// Pointer left the plot: clear hover and selection
    pub fn pointer_leave(&mut self) {
        if !self.tracks_hover() {
            return;
        }
        self.hover.cancel();
        self.state = InteractionState::default();
        tracing::trace!("Pointer left chart, clearing selection");
        self.notify_tooltip(None);
    }

    /// Commit the hovered point as the selection
    pub fn click(&mut self) {
        let date = self.state.selected.map(|s| s.date);
        if let Some(on_selection) = self.callbacks.on_selection.as_mut() {
            tracing::trace!("Committing selection {:?}", date);
            on_selection(date);
        }
    }

    /// Wheel over the plot; ignored unless `zoom_enabled` and a zoom hook exists
    pub fn wheel(
        &mut self,
        event: &WheelEvent,
        now: Instant,
        scales: &Scales,
        zoom_speed: f64,
        zoom_enabled: bool,
    ) {
        if !zoom_enabled || !self.has_zoom_callback() {
            return;
        }
        let window = zoom_window(event, scales, zoom_speed);
        if let Some(window) = self.zoom.call(now, window) {
            self.notify_zoom(window);
        }
    }

    /// Release throttled hover and zoom updates whose window has elapsed
    pub fn poll(&mut self, now: Instant, scales: &Scales, series: &[Series]) {
        if let Some(x) = self.hover.poll(now) {
            self.resolve_hover(x, scales, series);
        }
        if let Some(window) = self.zoom.poll(now) {
            self.notify_zoom(window);
        }
    }

    /// Resolve and store a selected date without notifying anyone
    pub fn select_date(
        &mut self,
        date: Option<DateTime<Utc>>,
        scales: &Scales,
        series: &[Series],
    ) -> Option<SelectedPoint> {
        let selected = date.and_then(|d| selected_point_for_date(scales, series, &d));
        self.state.selected = selected;
        selected
    }

    /// Re-resolve a selected date after a prop or scale change
    ///
    /// The tooltip hook always hears the outcome, including a cleared
    /// selection when the date is no longer visible.
    pub fn sync_selected_date(
        &mut self,
        date: Option<DateTime<Utc>>,
        scales: &Scales,
        series: &[Series],
    ) -> Option<SelectedPoint> {
        let selected = self.select_date(date, scales, series);
        self.notify_tooltip(selected);
        selected
    }

    /// Clear the selection without notifying anyone
    pub fn clear_selection(&mut self) {
        self.state.selected = None;
    }

    fn resolve_hover(&mut self, x: f64, scales: &Scales, series: &[Series]) {
        if !self.state.mouse_over {
            return;
        }
        let Some(first) = series.first() else {
            return;
        };
        let Some(selected) = hover_candidate(scales, &first.points, x) else {
            tracing::trace!("Hover at {:.1}px has no visible point", x);
            return;
        };
        tracing::trace!("Hover at {:.1}px resolved to point {}", x, selected.index);
        self.state.selected = Some(selected);
        self.notify_tooltip(Some(selected));
    }

    fn notify_tooltip(&mut self, selected: Option<SelectedPoint>) {
        if let Some(on_tooltip) = self.callbacks.on_tooltip.as_mut() {
            on_tooltip(selected);
        }
    }

    fn notify_zoom(&mut self, window: ZoomWindow) {
        tracing::debug!("Zoom requested: {:?} .. {:?}", window.start, window.end);
        if let Some(on_zoom) = self.callbacks.on_zoom.as_mut() {
            on_zoom(window);
        }
    }
}
