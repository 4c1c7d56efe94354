//! Renderer-independent vector scene
//!
//! A [`Scene`] is a flat, ordered list of [`Element`]s in plot coordinates
//! (origin at the top-left corner of the plot area). Backends apply
//! [`Scene::translate`] to place the plot inside the full chart.

use super::path::{Coord, Path};
use serde::{Deserialize, Serialize};

/// Axis-aligned rectangle
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self { x, y, width, height }
    }

    pub fn contains(&self, p: Coord) -> bool {
        p[0] >= self.x && p[0] <= self.x + self.width && p[1] >= self.y && p[1] <= self.y + self.height
    }
}

/// Horizontal text anchor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Anchor {
    #[default]
    Start,
    Middle,
    End,
}

impl Anchor {
    pub fn as_svg(&self) -> &'static str {
        match self {
            Anchor::Start => "start",
            Anchor::Middle => "middle",
            Anchor::End => "end",
        }
    }
}

/// What an element depicts; backends style by role
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Role {
    /// "New code" period band
    Leak,
    LegendBackground,
    LegendText,
    Grid,
    GridLabel,
    XTick,
    Area(usize),
    Line(usize),
    /// Marker at an isolated point
    Dot(usize),
    /// Vertical guide at the selected date
    Crosshair,
    /// Marker at the selected index
    SelectedDot(usize),
    /// Transparent pointer target covering the plot
    Overlay,
}

impl Role {
    /// CSS class names used by the SVG writer
    pub fn class_name(&self) -> String {
        match self {
            Role::Leak => "leak-chart-rect".to_string(),
            Role::LegendBackground => "new-code-legend-background".to_string(),
            Role::LegendText => "new-code-legend".to_string(),
            Role::Grid => "line-chart-grid".to_string(),
            Role::GridLabel => "line-chart-tick line-chart-tick-x".to_string(),
            Role::XTick => "line-chart-tick".to_string(),
            Role::Area(i) => format!("line-chart-area line-chart-area-{}", i),
            Role::Line(i) => format!("line-chart-path line-chart-path-{}", i),
            Role::Dot(i) | Role::SelectedDot(i) => format!("line-chart-dot line-chart-dot-{}", i),
            Role::Crosshair => "line-tooltip".to_string(),
            Role::Overlay => "chart-mouse-events-overlay".to_string(),
        }
    }

    /// Whether the element belongs to a series and is clipped when zooming
    pub fn is_series(&self) -> bool {
        matches!(self, Role::Area(_) | Role::Line(_) | Role::Dot(_))
    }
}

/// Geometry of an element
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Shape {
    Line {
        from: Coord,
        to: Coord,
    },
    Rect(Rect),
    Text {
        pos: Coord,
        text: String,
        anchor: Anchor,
        /// Rotation in degrees around `pos`, clockwise positive
        rotate: Option<f64>,
        /// Extra offset in ems (`dx`, `dy`)
        offset_em: [f64; 2],
    },
    /// Stroked path
    Path(Path),
    /// Filled path
    Area(Path),
    Circle {
        center: Coord,
        radius: f64,
    },
}

/// One drawable item
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Element {
    pub role: Role,
    pub shape: Shape,
}

impl Element {
    pub fn new(role: Role, shape: Shape) -> Self {
        Self { role, shape }
    }
}

/// The complete drawing of one chart
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Scene {
    /// Full chart width including padding
    pub width: f64,
    /// Full chart height including padding
    pub height: f64,
    /// Accessible description
    pub description: Option<String>,
    /// A zoom window is applied
    pub zoomed: bool,
    /// Offset of the plot area inside the chart (left, top padding)
    pub translate: Coord,
    /// Clip rectangle for series, present when zooming is enabled
    pub clip: Option<Rect>,
    /// Pointer target covering the plot area
    pub overlay: Rect,
    /// Elements in paint order
    pub elements: Vec<Element>,
}

impl Scene {
    /// A scene with nothing to draw
    pub fn empty(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Elements with the given role
    pub fn with_role(&self, role: Role) -> impl Iterator<Item = &Element> {
        self.elements.iter().filter(move |e| e.role == role)
    }

    /// Count of elements matching a predicate on the role
    pub fn count(&self, predicate: impl Fn(&Role) -> bool) -> usize {
        self.elements.iter().filter(|e| predicate(&e.role)).count()
    }

    /// Text of every element with the given role, in paint order
    pub fn texts(&self, role: Role) -> Vec<&str> {
        self.with_role(role)
            .filter_map(|e| match &e.shape {
                Shape::Text { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }
}
