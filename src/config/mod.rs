//! Configuration module for the timeline chart
//!
//! This module handles chart configuration and chart documents:
//! - [`ChartConfig`] - sizing, time window, metric type and behaviour flags
//! - [`ChartDocument`] - a config plus the series it plots, stored as JSON or TOML
//! - [`format`] - y tick label formats
//!
//! # Document formats
//!
//! The format is picked from the file extension: `.toml` files are read and
//! written as TOML, everything else as JSON.
//!
//! # Example
//!
//! ```ignore
//! use timeline_chart::config::ChartDocument;
//!
//! let mut doc = ChartDocument::load("coverage.json")?;
//! doc.chart.width = 1024.0;
//! doc.save("coverage.toml")?;
//! ```

pub mod format;

pub use format::{TickFormatter, YTickFormat};

use crate::error::{ChartError, Result};
use crate::types::{MetricType, Series};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Default chart width in pixels
pub const DEFAULT_WIDTH: f64 = 800.0;

/// Default chart height in pixels
pub const DEFAULT_HEIGHT: f64 = 280.0;

/// Default number of y ticks requested from numeric scales
pub const DEFAULT_MAX_Y_TICKS: usize = 4;

/// Largest y tick count a document may request
pub const MAX_Y_TICKS: usize = 100;

/// Current chart document format version
pub const DOCUMENT_VERSION: u32 = 1;

// ==================== Padding ====================

/// Space reserved around the plot area for labels, in pixels
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Padding {
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    pub left: f64,
}

impl Padding {
    /// Create padding from CSS order: top, right, bottom, left
    pub fn new(top: f64, right: f64, bottom: f64, left: f64) -> Self {
        Self {
            top,
            right,
            bottom,
            left,
        }
    }

    /// Equal padding on every side
    pub fn uniform(value: f64) -> Self {
        Self::new(value, value, value, value)
    }
}

impl Default for Padding {
    fn default() -> Self {
        Self::new(26.0, 10.0, 50.0, 60.0)
    }
}

// ==================== Chart Config ====================

/// Chart configuration: everything except the series and callbacks
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartConfig {
    /// Total width in pixels
    #[serde(default = "default_width")]
    pub width: f64,

    /// Total height in pixels
    #[serde(default = "default_height")]
    pub height: f64,

    /// Metric type tag, selects the y scale
    #[serde(default)]
    pub metric_type: MetricType,

    /// Zoom window start (unbounded when absent)
    #[serde(default)]
    pub start_date: Option<DateTime<Utc>>,

    /// Zoom window end (unbounded when absent)
    #[serde(default)]
    pub end_date: Option<DateTime<Utc>>,

    /// Start of the "new code" period
    #[serde(default)]
    pub leak_period_date: Option<DateTime<Utc>>,

    /// Externally selected date
    #[serde(default)]
    pub selected_date: Option<DateTime<Utc>>,

    /// Smooth lines with a basis spline
    #[serde(default)]
    pub basis_curve: bool,

    /// Fill the area under each line
    #[serde(default)]
    pub show_areas: bool,

    /// Ignore wheel zoom even when a zoom callback is registered
    #[serde(default)]
    pub disable_zoom: bool,

    /// Label the "new code" band
    #[serde(default)]
    pub display_new_code_legend: bool,

    /// Hide the horizontal grid
    #[serde(default)]
    pub hide_grid: bool,

    /// Hide the x-axis tick labels
    #[serde(default)]
    pub hide_x_axis: bool,

    /// Ticks requested from numeric y scales
    #[serde(default = "default_max_y_ticks")]
    pub max_y_ticks_count: usize,

    /// Wheel zoom multiplier
    #[serde(default = "default_zoom_speed")]
    pub zoom_speed: f64,

    /// Accessible description of the chart
    #[serde(default)]
    pub graph_description: Option<String>,

    /// Built-in y tick label format
    #[serde(default)]
    pub y_tick_format: Option<YTickFormat>,

    /// Space around the plot area
    #[serde(default)]
    pub padding: Padding,
}

fn default_width() -> f64 {
    DEFAULT_WIDTH
}

fn default_height() -> f64 {
    DEFAULT_HEIGHT
}

fn default_max_y_ticks() -> usize {
    DEFAULT_MAX_Y_TICKS
}

fn default_zoom_speed() -> f64 {
    1.0
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            metric_type: MetricType::default(),
            start_date: None,
            end_date: None,
            leak_period_date: None,
            selected_date: None,
            basis_curve: false,
            show_areas: false,
            disable_zoom: false,
            display_new_code_legend: false,
            hide_grid: false,
            hide_x_axis: false,
            max_y_ticks_count: DEFAULT_MAX_Y_TICKS,
            zoom_speed: 1.0,
            graph_description: None,
            y_tick_format: None,
            padding: Padding::default(),
        }
    }
}

impl ChartConfig {
    /// Plot width left after horizontal padding
    pub fn inner_width(&self) -> f64 {
        self.width - self.padding.left - self.padding.right
    }

    /// Plot height left after vertical padding
    pub fn inner_height(&self) -> f64 {
        self.height - self.padding.top - self.padding.bottom
    }

    /// Whether there is anything to draw at all
    pub fn has_drawable_area(&self) -> bool {
        self.width > 0.0 && self.height > 0.0 && self.inner_width() > 0.0 && self.inner_height() > 0.0
    }

    /// Whether a zoom window is applied on either side
    pub fn is_zoomed(&self) -> bool {
        self.start_date.is_some() || self.end_date.is_some()
    }

    /// Whether any input of the scales differs from `other`
    pub fn scales_differ(&self, other: &ChartConfig) -> bool {
        self.metric_type != other.metric_type
            || self.start_date != other.start_date
            || self.end_date != other.end_date
            || self.width != other.width
            || self.height != other.height
            || self.padding != other.padding
    }

    /// Builder-style size override
    pub fn with_size(mut self, width: f64, height: f64) -> Self {
        self.width = width;
        self.height = height;
        self
    }
}

// ==================== Chart Document ====================

/// On-disk format of a chart document
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    Json,
    Toml,
}

impl DocumentFormat {
    /// Pick the format from a file extension, JSON by default
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("toml") => DocumentFormat::Toml,
            _ => DocumentFormat::Json,
        }
    }
}

/// A chart configuration together with the series it plots
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartDocument {
    /// Document format version for future compatibility
    #[serde(default = "default_document_version")]
    pub version: u32,

    /// Document title
    #[serde(default)]
    pub name: String,

    /// Chart configuration
    #[serde(default)]
    pub chart: ChartConfig,

    /// Series to plot, the first one drives selection
    #[serde(default)]
    pub series: Vec<Series>,
}

fn default_document_version() -> u32 {
    DOCUMENT_VERSION
}

impl Default for ChartDocument {
    fn default() -> Self {
        Self {
            version: DOCUMENT_VERSION,
            name: "Untitled Chart".to_string(),
            chart: ChartConfig::default(),
            series: Vec::new(),
        }
    }
}

impl ChartDocument {
    /// Create a document from a config and series
    pub fn new(name: impl Into<String>, chart: ChartConfig, series: Vec<Series>) -> Self {
        Self {
            version: DOCUMENT_VERSION,
            name: name.into(),
            chart,
            series,
        }
    }

    /// Parse a document from text in the given format
    pub fn parse(content: &str, format: DocumentFormat) -> Result<Self> {
        let doc: Self = match format {
            DocumentFormat::Json => serde_json::from_str(content)?,
            DocumentFormat::Toml => toml::from_str(content)?,
        };
        doc.validate()?;
        Ok(doc)
    }

    /// Load a document from disk
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            ChartError::Config(format!("Failed to read chart document {:?}: {}", path, e))
        })?;

        let doc = Self::parse(&content, DocumentFormat::from_path(path))
            .map_err(|e| e.with_context(format!("Failed to parse chart document {:?}", path)))?;
        tracing::debug!(
            "Loaded chart document {:?} with {} series",
            path,
            doc.series.len()
        );
        Ok(doc)
    }

    /// Serialize the document in the given format
    pub fn to_document_string(&self, format: DocumentFormat) -> Result<String> {
        match format {
            DocumentFormat::Json => serde_json::to_string_pretty(self)
                .map_err(|e| ChartError::Serialization(format!("Failed to serialize chart: {}", e))),
            DocumentFormat::Toml => Ok(toml::to_string_pretty(self)?),
        }
    }

    /// Save the document to disk
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();

        // Ensure parent directory exists
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| {
                ChartError::Config(format!("Failed to create document directory: {}", e))
            })?;
        }

        let content = self.to_document_string(DocumentFormat::from_path(path))?;
        std::fs::write(path, content).map_err(|e| {
            ChartError::Config(format!("Failed to write chart document {:?}: {}", path, e))
        })
    }

    /// Reject documents the chart cannot sensibly show
    pub fn validate(&self) -> Result<()> {
        let mut names = std::collections::HashSet::new();
        for series in &self.series {
            if !names.insert(series.name.as_str()) {
                return Err(ChartError::Config(format!(
                    "Duplicate series name '{}'",
                    series.name
                )));
            }
            if series.points.windows(2).any(|w| w[1].x < w[0].x) {
                return Err(ChartError::Config(format!(
                    "Series '{}' is not in ascending time order",
                    series.name
                )));
            }
        }
        if self.chart.zoom_speed < 0.0 || !self.chart.zoom_speed.is_finite() {
            return Err(ChartError::Config(format!(
                "Invalid zoom speed {}",
                self.chart.zoom_speed
            )));
        }
        if self.chart.max_y_ticks_count > MAX_Y_TICKS {
            return Err(ChartError::Config(format!(
                "Invalid max y ticks count {} (at most {})",
                self.chart.max_y_ticks_count, MAX_Y_TICKS
            )));
        }
        Ok(())
    }
}
