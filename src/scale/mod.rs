//! Scale computation
//!
//! Builds the x (time) and y (linear or ordinal) scales of a chart from its
//! configuration and series. Scales are plain values: every relevant change
//! produces a fresh [`Scales`] record instead of mutating the old one.
//!
//! # Main Types
//!
//! - [`Scales`] - x scale, y scale and the full-data pixel range
//! - [`YScale`] - linear, rating or level value axis
//! - [`TimeScale`], [`LinearScale`], [`PointScale`] - the underlying mappings

pub mod linear;
pub mod point;
pub mod time;

pub use linear::LinearScale;
pub use point::PointScale;
pub use time::{TickInterval, TimeScale, TimeUnit};

use crate::config::ChartConfig;
use crate::error::{ChartError, Result};
use crate::types::{flatten_points, Level, MetricType, Series, Value};
use chrono::{DateTime, Utc};

/// Tick count used when niceing linear domains
const NICE_TICK_COUNT: usize = 10;

/// Value axis of a chart
#[derive(Debug, Clone, PartialEq)]
pub enum YScale {
    /// Numeric measures, domain `[0, max]` niced
    Linear(LinearScale),
    /// Ratings or levels placed on evenly spaced points
    Point(PointScale),
}

impl YScale {
    /// Pixel position of a value, `None` when it cannot be placed
    pub fn map(&self, value: &Value) -> Option<f64> {
        match self {
            YScale::Linear(scale) => value.as_number().map(|n| scale.map(n)),
            YScale::Point(scale) => scale.map(value),
        }
    }

    /// Pixel range, bottom first
    pub fn range(&self) -> [f64; 2] {
        match self {
            YScale::Linear(scale) => scale.range(),
            YScale::Point(scale) => scale.range(),
        }
    }

    /// Domain values: both ends of a linear domain, every ordinal value
    pub fn domain_values(&self) -> Vec<Value> {
        match self {
            YScale::Linear(scale) => scale.domain().iter().map(|v| Value::Number(*v)).collect(),
            YScale::Point(scale) => scale.domain().to_vec(),
        }
    }

    /// Tick values: generated ticks for linear scales, the domain otherwise
    pub fn ticks(&self, count: usize) -> Vec<Value> {
        match self {
            YScale::Linear(scale) => scale.ticks(count).into_iter().map(Value::Number).collect(),
            YScale::Point(scale) => scale.domain().to_vec(),
        }
    }

    /// Whether the scale generates its own ticks
    pub fn is_linear(&self) -> bool {
        matches!(self, YScale::Linear(_))
    }

    /// Pixel position areas fill down to
    pub fn baseline(&self) -> f64 {
        match self {
            YScale::Linear(scale) => scale.map(0.0),
            YScale::Point(scale) => scale.range()[0],
        }
    }
}

/// Scales of one chart render
#[derive(Debug, Clone, PartialEq)]
pub struct Scales {
    pub x: TimeScale,
    pub y: YScale,
    /// Pixel positions of the first and last data timestamps, unclamped
    pub max_x_range: [f64; 2],
}

impl Scales {
    /// Whether the visible range already covers the whole data range
    pub fn is_fully_zoomed_out(&self) -> bool {
        let [r0, r1] = self.x.range();
        self.max_x_range[0] >= r0 && self.max_x_range[1] <= r1
    }
}

/// Build both scales for the given configuration and series
///
/// Fails with [`ChartError::InvalidDimensions`] when padding leaves no plot
/// area; callers are expected to render nothing in that case.
pub fn compute_scales(config: &ChartConfig, series: &[Series]) -> Result<Scales> {
    let width = config.inner_width();
    let height = config.inner_height();
    if !(width > 0.0 && height > 0.0) {
        return Err(ChartError::InvalidDimensions {
            width: config.width,
            height: config.height,
        });
    }

    let (x, max_x_range) = x_scale(config, series, width);
    let y = y_scale(&config.metric_type, series, height);
    tracing::debug!(
        "Computed scales: x {:?} -> {:?}, y {:?}",
        x.domain(),
        x.range(),
        y.domain_values()
    );

    Ok(Scales { x, y, max_x_range })
}

fn data_extent(series: &[Series]) -> Option<[DateTime<Utc>; 2]> {
    flatten_points(series).fold(None, |extent, point| match extent {
        None => Some([point.x, point.x]),
        Some([lo, hi]) => Some([lo.min(point.x), hi.max(point.x)]),
    })
}

fn x_scale(config: &ChartConfig, series: &[Series], width: f64) -> (TimeScale, [f64; 2]) {
    let extent = data_extent(series);

    let (start, end) = match extent {
        Some([lo, hi]) => (
            config.start_date.filter(|s| *s > lo).unwrap_or(lo),
            config.end_date.filter(|e| *e < hi).unwrap_or(hi),
        ),
        None => {
            let start = config.start_date.or(config.end_date).unwrap_or(DateTime::<Utc>::UNIX_EPOCH);
            let end = config.end_date.unwrap_or(start);
            (start, end)
        }
    };
    let domain = if end < start { [end, start] } else { [start, end] };
    let scale = TimeScale::new(domain, [0.0, width]);

    let [lo, hi] = extent.unwrap_or(domain);
    let max_x_range = [scale.map(&lo), scale.map(&hi)];
    (scale, max_x_range)
}

fn y_scale(metric_type: &MetricType, series: &[Series], height: f64) -> YScale {
    match metric_type {
        MetricType::Rating => YScale::Point(PointScale::new(
            [5, 4, 3, 2, 1].into_iter().map(Value::from).collect(),
            [height, 0.0],
        )),
        MetricType::Level => YScale::Point(PointScale::new(
            Level::ALL.into_iter().map(Value::from).collect(),
            [height, 0.0],
        )),
        MetricType::Numeric(_) => {
            // Gaps count as zero, non-numeric labels are ignored
            let max = flatten_points(series)
                .filter_map(|p| match p.defined_value() {
                    Some(value) => value.as_number(),
                    None => Some(0.0),
                })
                .fold(None, |acc: Option<f64>, v| Some(acc.map_or(v, |m| m.max(v))));
            // A zero or missing maximum falls back to 1
            let max = max.filter(|m| *m != 0.0).unwrap_or(1.0);
            YScale::Linear(LinearScale::new([0.0, max], [height, 0.0]).nice(NICE_TICK_COUNT))
        }
    }
}
