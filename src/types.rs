//! Core data types for the timeline chart
//!
//! # Main Types
//!
//! - [`Value`] - A point's y value, numeric or categorical
//! - [`Point`] - A timestamp with an optional value (`None` is a gap)
//! - [`Series`] - A named, time-ordered sequence of points
//! - [`MetricType`] - Selects the shape of the value axis
//! - [`Level`] - The three quality-gate levels plotted on `LEVEL` charts
//!
//! # Defined values
//!
//! A value is *defined* when it is a finite number or a non-empty label.
//! Undefined values break lines and areas instead of dropping to zero.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A y value: numeric for measures and ratings, a label for levels
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    Number(f64),
    Label(String),
}

impl Value {
    /// Whether the value can be plotted
    pub fn is_defined(&self) -> bool {
        match self {
            Value::Number(n) => n.is_finite(),
            Value::Label(s) => !s.is_empty(),
        }
    }

    /// Numeric view of the value; numeric-looking labels are parsed
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Number(n) if n.is_finite() => Some(*n),
            Value::Number(_) => None,
            Value::Label(s) => s.trim().parse::<f64>().ok().filter(|n| n.is_finite()),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Number(n) => write!(f, "{}", n),
            Value::Label(s) => f.write_str(s),
        }
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Number(n as f64)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Label(s.to_string())
    }
}

impl From<Level> for Value {
    fn from(level: Level) -> Self {
        Value::Label(level.as_str().to_string())
    }
}

/// A single timestamped point of a series
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Point {
    /// Timestamp of the point
    pub x: DateTime<Utc>,
    /// Value at the timestamp; `None` marks a gap
    #[serde(default)]
    pub y: Option<Value>,
}

impl Point {
    /// Create a point with a value
    pub fn new(x: DateTime<Utc>, y: impl Into<Value>) -> Self {
        Self {
            x,
            y: Some(y.into()),
        }
    }

    /// Create a gap point
    pub fn gap(x: DateTime<Utc>) -> Self {
        Self { x, y: None }
    }

    /// The value, if it is defined
    pub fn defined_value(&self) -> Option<&Value> {
        self.y.as_ref().filter(|v| v.is_defined())
    }

    /// Whether the point has a plottable value
    pub fn is_defined(&self) -> bool {
        self.defined_value().is_some()
    }
}

/// A named, time-ordered sequence of points plotted as one line/area
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Series {
    /// Series name, unique within a chart
    pub name: String,
    /// Points in ascending time order
    #[serde(rename = "data", alias = "points", default)]
    pub points: Vec<Point>,
}

impl Series {
    /// Create a new series
    pub fn new(name: impl Into<String>, points: Vec<Point>) -> Self {
        Self {
            name: name.into(),
            points,
        }
    }

    /// Number of points, defined or not
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Whether the series has no points
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Defined value at an index
    pub fn value_at(&self, idx: usize) -> Option<&Value> {
        self.points.get(idx).and_then(Point::defined_value)
    }
}

/// Iterate over every point of every series
pub fn flatten_points(series: &[Series]) -> impl Iterator<Item = &Point> {
    series.iter().flat_map(|s| s.points.iter())
}

/// Quality-gate level, ordered from worst to best
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Level {
    Error,
    Warn,
    Ok,
}

impl Level {
    /// All levels in axis order (bottom to top)
    pub const ALL: [Level; 3] = [Level::Error, Level::Warn, Level::Ok];

    /// Wire name of the level
    pub fn as_str(&self) -> &'static str {
        match self {
            Level::Error => "ERROR",
            Level::Warn => "WARN",
            Level::Ok => "OK",
        }
    }
}

/// Classifies the value axis of a chart
///
/// Serialized as the raw metric type tag; anything other than `RATING`
/// or `LEVEL` is a numeric measure and keeps its tag.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum MetricType {
    /// 1–5 rating (A–E)
    Rating,
    /// ERROR/WARN/OK quality-gate level
    Level,
    /// Any numeric measure (INT, FLOAT, PERCENT, ...)
    Numeric(String),
}

impl Default for MetricType {
    fn default() -> Self {
        MetricType::Numeric("INT".to_string())
    }
}

impl MetricType {
    /// Whether the value axis is ordinal
    pub fn is_ordinal(&self) -> bool {
        matches!(self, MetricType::Rating | MetricType::Level)
    }

    /// The metric type tag
    pub fn as_str(&self) -> &str {
        match self {
            MetricType::Rating => "RATING",
            MetricType::Level => "LEVEL",
            MetricType::Numeric(tag) => tag,
        }
    }
}

impl From<String> for MetricType {
    fn from(tag: String) -> Self {
        match tag.as_str() {
            "RATING" => MetricType::Rating,
            "LEVEL" => MetricType::Level,
            _ => MetricType::Numeric(tag),
        }
    }
}

impl From<&str> for MetricType {
    fn from(tag: &str) -> Self {
        MetricType::from(tag.to_string())
    }
}

impl From<MetricType> for String {
    fn from(metric: MetricType) -> Self {
        metric.as_str().to_string()
    }
}

impl fmt::Display for MetricType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn ts(day: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, day, 0, 0, 0).unwrap()
    }

    #[test]
    fn test_defined_values() {
        assert!(Value::Number(0.0).is_defined());
        assert!(!Value::Number(f64::NAN).is_defined());
        assert!(Value::Label("OK".into()).is_defined());
        assert!(!Value::Label(String::new()).is_defined());
        assert!(!Point::gap(ts(1)).is_defined());
        assert!(Point::new(ts(1), 0.0).is_defined());
    }

    #[test]
    fn test_metric_type_from_tag() {
        assert_eq!(MetricType::from("RATING"), MetricType::Rating);
        assert_eq!(MetricType::from("LEVEL"), MetricType::Level);
        assert_eq!(
            MetricType::from("PERCENT"),
            MetricType::Numeric("PERCENT".into())
        );
        assert!(MetricType::Rating.is_ordinal());
        assert!(!MetricType::default().is_ordinal());
    }

    #[test]
    fn test_series_deserializes_from_data_key() {
        let json = r#"{
            "name": "coverage",
            "data": [
                {"x": "2024-03-01T00:00:00Z", "y": 80.5},
                {"x": "2024-03-02T00:00:00Z", "y": null},
                {"x": "2024-03-03T00:00:00Z"},
                {"x": "2024-03-04T00:00:00Z", "y": "WARN"}
            ]
        }"#;
        let series: Series = serde_json::from_str(json).unwrap();
        assert_eq!(series.len(), 4);
        assert_eq!(series.value_at(0), Some(&Value::Number(80.5)));
        assert_eq!(series.value_at(1), None);
        assert_eq!(series.value_at(2), None);
        assert_eq!(series.value_at(3), Some(&Value::Label("WARN".into())));
    }

    #[test]
    fn test_metric_type_serde_round_trip() {
        let json = serde_json::to_string(&MetricType::Level).unwrap();
        assert_eq!(json, "\"LEVEL\"");
        let back: MetricType = serde_json::from_str("\"WORK_DUR\"").unwrap();
        assert_eq!(back, MetricType::Numeric("WORK_DUR".into()));
    }

    #[test]
    fn test_value_as_number() {
        assert_eq!(Value::Label("3".into()).as_number(), Some(3.0));
        assert_eq!(Value::Label("OK".into()).as_number(), None);
        assert_eq!(Value::Number(f64::INFINITY).as_number(), None);
    }
}
