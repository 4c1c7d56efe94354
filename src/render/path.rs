//! Line and area path generation
//!
//! Series are turned into [`Path`]s made of move/line/cubic/close commands.
//! Undefined points split a series into segments; each segment becomes its
//! own subpath so gaps show as breaks rather than drops to zero.

use serde::{Deserialize, Serialize};

/// A 2D position in plot coordinates
pub type Coord = [f64; 2];

/// One drawing command
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum PathCommand {
    MoveTo(Coord),
    LineTo(Coord),
    /// Cubic bezier with two control points and an end point
    CubicTo(Coord, Coord, Coord),
    Close,
}

/// Interpolation between consecutive points
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Curve {
    #[default]
    Linear,
    /// Uniform cubic B-spline through the segment's end points
    Basis,
}

/// A sequence of subpaths
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Path {
    commands: Vec<PathCommand>,
}

impl Path {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn commands(&self) -> &[PathCommand] {
        &self.commands
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Number of subpaths (one per `MoveTo`)
    pub fn subpath_count(&self) -> usize {
        self.commands
            .iter()
            .filter(|c| matches!(c, PathCommand::MoveTo(_)))
            .count()
    }

    pub fn move_to(&mut self, p: Coord) {
        self.commands.push(PathCommand::MoveTo(p));
    }

    pub fn line_to(&mut self, p: Coord) {
        self.commands.push(PathCommand::LineTo(p));
    }

    pub fn cubic_to(&mut self, c1: Coord, c2: Coord, p: Coord) {
        self.commands.push(PathCommand::CubicTo(c1, c2, p));
    }

    pub fn close(&mut self) {
        self.commands.push(PathCommand::Close);
    }

    /// SVG path data (`d` attribute)
    pub fn to_svg_data(&self) -> String {
        let mut out = String::new();
        for command in &self.commands {
            match command {
                PathCommand::MoveTo(p) => out.push_str(&format!("M{},{}", fmt_num(p[0]), fmt_num(p[1]))),
                PathCommand::LineTo(p) => out.push_str(&format!("L{},{}", fmt_num(p[0]), fmt_num(p[1]))),
                PathCommand::CubicTo(c1, c2, p) => out.push_str(&format!(
                    "C{},{},{},{},{},{}",
                    fmt_num(c1[0]),
                    fmt_num(c1[1]),
                    fmt_num(c2[0]),
                    fmt_num(c2[1]),
                    fmt_num(p[0]),
                    fmt_num(p[1])
                )),
                PathCommand::Close => out.push('Z'),
            }
        }
        out
    }

    /// Approximate every subpath by a polyline
    ///
    /// Cubic segments are sampled `steps` times. A closing command repeats
    /// the subpath's first point.
    pub fn flatten(&self, steps: usize) -> Vec<Vec<Coord>> {
        let steps = steps.max(1);
        let mut polylines: Vec<Vec<Coord>> = Vec::new();
        let mut current: Vec<Coord> = Vec::new();

        for command in &self.commands {
            match *command {
                PathCommand::MoveTo(p) => {
                    if !current.is_empty() {
                        polylines.push(std::mem::take(&mut current));
                    }
                    current.push(p);
                }
                PathCommand::LineTo(p) => current.push(p),
                PathCommand::CubicTo(c1, c2, p) => {
                    let Some(&p0) = current.last() else {
                        current.push(p);
                        continue;
                    };
                    for i in 1..=steps {
                        let t = i as f64 / steps as f64;
                        current.push(cubic_point(p0, c1, c2, p, t));
                    }
                }
                PathCommand::Close => {
                    if let Some(&first) = current.first() {
                        current.push(first);
                    }
                }
            }
        }
        if !current.is_empty() {
            polylines.push(current);
        }
        polylines
    }
}

/// Format a coordinate compactly: integers without decimals, others to 3 places
pub(crate) fn fmt_num(n: f64) -> String {
    let rounded = (n * 1000.0).round() / 1000.0;
    if rounded == rounded.trunc() {
        format!("{}", rounded as i64)
    } else {
        let text = format!("{:.3}", rounded);
        text.trim_end_matches('0').to_string()
    }
}

fn cubic_point(p0: Coord, c1: Coord, c2: Coord, p1: Coord, t: f64) -> Coord {
    let mt = 1.0 - t;
    let a = mt * mt * mt;
    let b = 3.0 * mt * mt * t;
    let c = 3.0 * mt * t * t;
    let d = t * t * t;
    [
        a * p0[0] + b * c1[0] + c * c2[0] + d * p1[0],
        a * p0[1] + b * c1[1] + c * c2[1] + d * p1[1],
    ]
}

/// Split optional points into runs of defined points
pub fn segments(points: &[Option<Coord>]) -> Vec<Vec<Coord>> {
    let mut out = Vec::new();
    let mut run = Vec::new();
    for point in points {
        match point {
            Some(p) => run.push(*p),
            None if !run.is_empty() => out.push(std::mem::take(&mut run)),
            None => {}
        }
    }
    if !run.is_empty() {
        out.push(run);
    }
    out
}

/// Append one segment with the given curve
fn push_curve(path: &mut Path, points: &[Coord], curve: Curve, continue_path: bool) {
    let Some(&first) = points.first() else {
        return;
    };
    if continue_path {
        path.line_to(first);
    } else {
        path.move_to(first);
    }

    match curve {
        Curve::Linear => {
            for p in &points[1..] {
                path.line_to(*p);
            }
        }
        Curve::Basis => push_basis(path, points),
    }
}

/// Uniform B-spline: starts and ends on the segment's end points
fn push_basis(path: &mut Path, points: &[Coord]) {
    match points.len() {
        0 | 1 => {}
        2 => path.line_to(points[1]),
        _ => {
            let (p0, p1) = (points[0], points[1]);
            path.line_to([(5.0 * p0[0] + p1[0]) / 6.0, (5.0 * p0[1] + p1[1]) / 6.0]);
            for window in points.windows(3) {
                basis_segment(path, window[0], window[1], window[2]);
            }
            let n = points.len();
            let (a, b) = (points[n - 2], points[n - 1]);
            basis_segment(path, a, b, b);
            path.line_to(b);
        }
    }
}

fn basis_segment(path: &mut Path, p0: Coord, p1: Coord, p: Coord) {
    path.cubic_to(
        [(2.0 * p0[0] + p1[0]) / 3.0, (2.0 * p0[1] + p1[1]) / 3.0],
        [(p0[0] + 2.0 * p1[0]) / 3.0, (p0[1] + 2.0 * p1[1]) / 3.0],
        [(p0[0] + 4.0 * p1[0] + p[0]) / 6.0, (p0[1] + 4.0 * p1[1] + p[1]) / 6.0],
    );
}

/// Line through the defined points, broken at gaps
pub fn line_path(points: &[Option<Coord>], curve: Curve) -> Path {
    let mut path = Path::new();
    for segment in segments(points) {
        push_curve(&mut path, &segment, curve, false);
    }
    path
}

/// Area between the line and a horizontal baseline, one closed subpath per segment
pub fn area_path(points: &[Option<Coord>], baseline: f64, curve: Curve) -> Path {
    let mut path = Path::new();
    for segment in segments(points) {
        let (Some(first), Some(last)) = (segment.first(), segment.last()) else {
            continue;
        };
        let (first_x, last_x) = (first[0], last[0]);
        push_curve(&mut path, &segment, curve, false);
        path.line_to([last_x, baseline]);
        path.line_to([first_x, baseline]);
        path.close();
    }
    path
}
