//! egui rendering of timeline charts
//!
//! [`TimelineView`] owns a [`TimelineChart`], feeds it egui pointer and
//! scroll input every frame and paints the resulting [`Scene`] with the
//! egui painter.
//!
//! # Main Types
//!
//! - [`TimelineView`] - interactive chart widget
//! - [`EguiTextMeasure`] - text widths from the egui font atlas

use crate::chart::TimelineChart;
use crate::interaction::WheelDeltaMode;
use crate::render::{Anchor, Coord, Rgba, Role, Scene, Shape, TextMeasure, Theme};
use egui::emath::Rot2;
use egui::epaint::TextShape;
use egui::{Color32, FontId, Painter, Pos2, Rect, Response, Sense, Stroke, Ui, Vec2};
use std::time::Instant;

/// Samples per cubic segment when flattening curves
const CURVE_STEPS: usize = 12;

/// Share of the text height above the baseline
const BASELINE_RATIO: f32 = 0.8;

/// Measures text with the fonts of a painter
pub struct EguiTextMeasure<'a> {
    pub painter: &'a Painter,
}

impl TextMeasure for EguiTextMeasure<'_> {
    fn text_width(&self, text: &str, font_size: f32) -> f64 {
        let galley = self
            .painter
            .layout_no_wrap(text.to_string(), FontId::proportional(font_size), Color32::WHITE);
        galley.size().x as f64
    }
}

fn color(c: Rgba) -> Color32 {
    Color32::from_rgba_unmultiplied(c[0], c[1], c[2], c[3])
}

/// Interactive timeline widget
#[derive(Debug)]
pub struct TimelineView {
    chart: TimelineChart,
    pub theme: Theme,
    /// Resize the chart to the available space instead of its configured size
    pub fill_available: bool,
    pointer_inside: bool,
    /// Plot-relative x last forwarded to the chart
    last_pointer_x: Option<f64>,
}

impl TimelineView {
    pub fn new(chart: TimelineChart) -> Self {
        Self {
            chart,
            theme: Theme::default(),
            fill_available: true,
            pointer_inside: false,
            last_pointer_x: None,
        }
    }

    pub fn chart(&self) -> &TimelineChart {
        &self.chart
    }

    pub fn chart_mut(&mut self) -> &mut TimelineChart {
        &mut self.chart
    }

    /// Lay out, handle input and paint the chart
    pub fn show(&mut self, ui: &mut Ui) -> Response {
        if self.fill_available {
            let available = ui.available_size();
            self.chart.resize(available.x as f64, available.y as f64);
        }
        let config = self.chart.config();
        let size = Vec2::new(config.width.max(0.0) as f32, config.height.max(0.0) as f32);
        let (response, painter) = ui.allocate_painter(size, Sense::click());

        let now = Instant::now();
        let scene = self.chart.scene(&EguiTextMeasure { painter: &painter });
        let origin = response.rect.min + Vec2::new(scene.translate[0] as f32, scene.translate[1] as f32);
        self.handle_input(ui, &response, origin, &scene, now);

        // Input may have changed the selection, so render again
        let scene = self.chart.scene(&EguiTextMeasure { painter: &painter });
        paint_scene(&painter, origin, &scene, &self.theme);

        if let Some(deadline) = self.chart.next_deadline() {
            ui.ctx()
                .request_repaint_after(deadline.saturating_duration_since(now));
        }
        response
    }

    fn handle_input(&mut self, ui: &Ui, response: &Response, origin: Pos2, scene: &Scene, now: Instant) {
        let overlay = Rect::from_min_size(
            origin,
            Vec2::new(scene.overlay.width as f32, scene.overlay.height as f32),
        );
        let pointer = response.hover_pos().filter(|p| overlay.contains(*p));

        match (pointer, self.pointer_inside) {
            (Some(pos), inside) => {
                if !inside {
                    self.chart.pointer_enter();
                    self.pointer_inside = true;
                }
                let x = (pos.x - origin.x) as f64;
                if pointer_moved(self.last_pointer_x, x) {
                    self.last_pointer_x = Some(x);
                    self.chart.pointer_move(x, now);
                }

                if response.clicked() {
                    self.chart.click();
                }

                let scroll = ui.input(|i| i.raw_scroll_delta);
                if scroll.y != 0.0 {
                    // egui reports scrolling up as positive
                    self.chart
                        .wheel(x, -scroll.y as f64, WheelDeltaMode::Pixel, now);
                }
            }
            (None, true) => {
                self.chart.pointer_leave();
                self.pointer_inside = false;
                self.last_pointer_x = None;
            }
            (None, false) => {}
        }
        self.chart.poll(now);
    }
}

/// Whether `x` differs from the position last forwarded to the chart
fn pointer_moved(last_x: Option<f64>, x: f64) -> bool {
    last_x != Some(x)
}

fn to_pos(origin: Pos2, p: Coord) -> Pos2 {
    origin + Vec2::new(p[0] as f32, p[1] as f32)
}

/// Paint a scene with its plot origin at `origin`
pub fn paint_scene(painter: &Painter, origin: Pos2, scene: &Scene, theme: &Theme) {
    let clipped = scene.clip.map(|clip| {
        let min = to_pos(origin, [clip.x, clip.y]);
        painter.with_clip_rect(
            Rect::from_min_size(min, Vec2::new(clip.width as f32, clip.height as f32))
                .intersect(painter.clip_rect()),
        )
    });

    for element in &scene.elements {
        let target = match &clipped {
            Some(p) if element.role.is_series() => p,
            _ => painter,
        };
        paint_element(target, origin, &element.role, &element.shape, theme);
    }
}

fn paint_element(painter: &Painter, origin: Pos2, role: &Role, shape: &Shape, theme: &Theme) {
    let fill = theme.fill(role).map(color);
    let stroke = theme
        .stroke(role)
        .map(|(c, width)| Stroke::new(width, color(c)));

    match shape {
        Shape::Line { from, to } => {
            if let Some(stroke) = stroke {
                painter.line_segment([to_pos(origin, *from), to_pos(origin, *to)], stroke);
            }
        }
        Shape::Rect(rect) => {
            if let Some(fill) = fill {
                let min = to_pos(origin, [rect.x, rect.y]);
                painter.rect_filled(
                    Rect::from_min_size(min, Vec2::new(rect.width as f32, rect.height as f32)),
                    0.0,
                    fill,
                );
            }
        }
        Shape::Text {
            pos,
            text,
            anchor,
            rotate,
            offset_em,
        } => {
            let text_color = fill.unwrap_or(Color32::GRAY);
            let galley = painter.layout_no_wrap(
                text.clone(),
                FontId::proportional(theme.font_size),
                text_color,
            );
            let size = galley.size();
            let shift = match anchor {
                Anchor::Start => 0.0,
                Anchor::Middle => size.x / 2.0,
                Anchor::End => size.x,
            };
            let em = theme.font_size;
            // Offset from the baseline anchor to the galley's top-left corner
            let local = Vec2::new(
                offset_em[0] as f32 * em - shift,
                offset_em[1] as f32 * em - size.y * BASELINE_RATIO,
            );
            let angle = rotate.map_or(0.0, |deg| (deg as f32).to_radians());
            let top_left = to_pos(origin, *pos) + Rot2::from_angle(angle) * local;
            painter.add(TextShape::new(top_left, galley, text_color).with_angle(angle));
        }
        Shape::Path(path) => {
            if let Some(stroke) = stroke {
                for polyline in path.flatten(CURVE_STEPS) {
                    let points: Vec<Pos2> = polyline.iter().map(|p| to_pos(origin, *p)).collect();
                    painter.add(egui::Shape::line(points, stroke));
                }
            }
        }
        Shape::Area(path) => {
            if let Some(fill) = fill {
                paint_area(painter, origin, path, fill);
            }
        }
        Shape::Circle { center, radius } => {
            if let Some(fill) = fill {
                painter.circle_filled(to_pos(origin, *center), *radius as f32, fill);
            }
        }
    }
}

/// Fill an area path as a strip of trapezoids down to its baseline
///
/// egui only fills convex polygons, so each top edge segment is filled on
/// its own.
fn paint_area(painter: &Painter, origin: Pos2, path: &crate::render::Path, fill: Color32) {
    for polyline in path.flatten(CURVE_STEPS) {
        // Trailing points: two baseline corners and the closing point
        if polyline.len() < 5 {
            continue;
        }
        let baseline = polyline[polyline.len() - 2][1];
        let top = &polyline[..polyline.len() - 3];
        for pair in top.windows(2) {
            let (a, b) = (pair[0], pair[1]);
            let quad = vec![
                to_pos(origin, a),
                to_pos(origin, b),
                to_pos(origin, [b[0], baseline]),
                to_pos(origin, [a[0], baseline]),
            ];
            painter.add(egui::Shape::convex_polygon(quad, fill, Stroke::NONE));
        }
    }
}
