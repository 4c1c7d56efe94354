//! # timeline-chart: Interactive Time-Series Timeline Charts
//!
//! A headless chart engine for metric timelines. It derives time and value
//! scales from a set of series, turns pointer and wheel input into throttled
//! selection, tooltip and zoom notifications, and renders a vector scene
//! that can be written as SVG or painted with egui.
//!
//! ## Architecture
//!
//! - **Scales** (`scale`): time x axis, linear/rating/level y axis
//! - **Interaction** (`interaction`): nearest-point hover, click selection,
//!   wheel zoom, 40 ms throttling
//! - **Rendering** (`render`): pure scene construction plus an SVG writer
//! - **Frontend** (`frontend`): egui widget and eframe viewer; callbacks are
//!   delivered through crossbeam channels
//!
//! ## Example
//!
//! ```ignore
//! use timeline_chart::{
//!     chart::{ChartProps, TimelineChart},
//!     config::ChartDocument,
//!     interaction::ChartCallbacks,
//!     render::{ApproxTextMeasure, SvgOptions},
//! };
//!
//! let document = ChartDocument::load("coverage.json")?;
//! let callbacks = ChartCallbacks::new().with_zoom(|window| println!("{:?}", window));
//! let chart = TimelineChart::new(ChartProps::from_document(document), callbacks);
//! let svg = chart.to_svg(&ApproxTextMeasure, &SvgOptions::default());
//! ```

pub mod app;
pub mod chart;
pub mod config;
pub mod error;
pub mod frontend;
pub mod interaction;
pub mod render;
pub mod scale;
pub mod types;

// Re-export commonly used types
pub use app::TimelineViewerApp;
pub use chart::{ChartProps, ChartState, TimelineChart};
pub use config::{ChartConfig, ChartDocument, Padding};
pub use error::{ChartError, Result, ResultExt};
pub use interaction::{ChartCallbacks, SelectedPoint, ZoomWindow};
pub use render::{render_scene, write_svg, Scene};
pub use scale::{compute_scales, Scales};
pub use types::{Level, MetricType, Point, Series, Value};
