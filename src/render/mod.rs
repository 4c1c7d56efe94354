//! Scene rendering
//!
//! [`render_scene`] is a pure function from scales, series and interaction
//! state to a [`Scene`]. It performs no I/O and keeps no state, so every
//! frame (or every SVG export) simply renders again.
//!
//! # Main Types
//!
//! - [`Scene`] / [`Element`] / [`Shape`] - the produced drawing
//! - [`RenderContext`] - everything a render needs
//! - [`TextMeasure`] - text width seam used to place the "new code" legend
//! - [`Theme`] - colors shared by all backends

pub mod path;
pub mod scene;
pub mod style;
pub mod svg;

pub use path::{area_path, line_path, Coord, Curve, Path, PathCommand};
pub use scene::{Anchor, Element, Rect, Role, Scene, Shape};
pub use style::{Rgba, Theme};
pub use svg::{write_svg, SvgOptions};

use crate::config::{ChartConfig, TickFormatter};
use crate::interaction::SelectedPoint;
use crate::scale::Scales;
use crate::types::{Series, Value};
use std::collections::HashSet;

/// Ticks requested from the time scale
pub const X_TICK_COUNT: usize = 7;
/// Horizontal shift of x tick labels
pub const X_LABEL_OFFSET: f64 = 15.0;
/// Vertical shift of the x axis below the plot
pub const X_AXIS_OFFSET: f64 = 20.0;
/// Rotation of x tick labels in degrees
pub const X_LABEL_ANGLE: f64 = -35.0;
/// Height of the "new code" legend swatch
pub const LEGEND_LINE_HEIGHT: f64 = 16.0;
/// Base spacing unit
pub const GRID_SIZE: f64 = 8.0;
pub const DOT_RADIUS: f64 = 2.0;
pub const SELECTED_DOT_RADIUS: f64 = 4.0;
/// Vertical slack of the series clip rectangle on each side
pub const CLIP_MARGIN: f64 = 5.0;
pub const NEW_CODE_LABEL: &str = "new code";

/// Measures rendered text width in pixels
#[cfg_attr(test, mockall::automock)]
pub trait TextMeasure {
    fn text_width(&self, text: &str, font_size: f32) -> f64;
}

/// Width estimate from the character count, used when no font is at hand
#[derive(Debug, Clone, Copy, Default)]
pub struct ApproxTextMeasure;

impl TextMeasure for ApproxTextMeasure {
    fn text_width(&self, text: &str, font_size: f32) -> f64 {
        text.chars().count() as f64 * font_size as f64 * 0.6
    }
}

/// Inputs of a single render
#[derive(Clone, Copy)]
pub struct RenderContext<'a> {
    pub config: &'a ChartConfig,
    pub scales: &'a Scales,
    pub series: &'a [Series],
    pub selected: Option<SelectedPoint>,
    pub y_tick_formatter: Option<&'a TickFormatter>,
    pub zoom_enabled: bool,
    pub font_size: f32,
}

/// Render the chart into a scene
pub fn render_scene(ctx: &RenderContext<'_>, measure: &dyn TextMeasure) -> Scene {
    let config = ctx.config;
    let [_, x_right] = ctx.scales.x.range();
    let [y_bottom, _] = ctx.scales.y.range();

    let mut elements = Vec::new();
    if let Some(leak) = config.leak_period_date {
        render_leak(ctx, &leak, measure, &mut elements);
    }
    if !config.hide_grid {
        render_grid(ctx, &mut elements);
    }
    if !config.hide_x_axis {
        render_x_ticks(ctx, &mut elements);
    }

    let coords: Vec<Vec<Option<Coord>>> = ctx.series.iter().map(|s| series_coords(ctx.scales, s)).collect();
    let curve = if config.basis_curve { Curve::Basis } else { Curve::Linear };
    if config.show_areas {
        let baseline = ctx.scales.y.baseline();
        for (i, points) in coords.iter().enumerate() {
            let path = area_path(points, baseline, curve);
            if !path.is_empty() {
                elements.push(Element::new(Role::Area(i), Shape::Area(path)));
            }
        }
    }
    for (i, points) in coords.iter().enumerate() {
        let path = line_path(points, curve);
        if !path.is_empty() {
            elements.push(Element::new(Role::Line(i), Shape::Path(path)));
        }
    }
    for (i, points) in coords.iter().enumerate() {
        for center in isolated_points(points) {
            elements.push(Element::new(Role::Dot(i), Shape::Circle { center, radius: DOT_RADIUS }));
        }
    }
    render_selection(ctx, &mut elements);

    Scene {
        width: config.width,
        height: config.height,
        description: config.graph_description.clone(),
        zoomed: config.is_zoomed(),
        translate: [config.padding.left, config.padding.top],
        clip: ctx
            .zoom_enabled
            .then(|| Rect::new(0.0, -CLIP_MARGIN, x_right, y_bottom + 2.0 * CLIP_MARGIN)),
        overlay: Rect::new(0.0, 0.0, x_right, y_bottom),
        elements,
    }
}

/// Plot coordinates of each point, `None` where the value cannot be drawn
fn series_coords(scales: &Scales, series: &Series) -> Vec<Option<Coord>> {
    series
        .points
        .iter()
        .map(|p| {
            p.defined_value()
                .and_then(|v| scales.y.map(v))
                .map(|y| [scales.x.map(&p.x), y])
        })
        .collect()
}

/// Points with no drawable neighbour on either side
fn isolated_points(points: &[Option<Coord>]) -> Vec<Coord> {
    points
        .iter()
        .enumerate()
        .filter_map(|(i, p)| {
            let before = i.checked_sub(1).and_then(|j| points[j]).is_some();
            let after = points.get(i + 1).copied().flatten().is_some();
            p.filter(|_| !before && !after)
        })
        .collect()
}

/// Y ticks after empty-fallback and label de-duplication
pub fn grid_ticks(ctx: &RenderContext<'_>) -> Vec<Value> {
    let y = &ctx.scales.y;
    let mut ticks = y.ticks(ctx.config.max_y_ticks_count);
    if ticks.is_empty() {
        ticks.extend(y.domain_values().into_iter().nth(1));
    }

    // Duplicate labels mean the requested ticks are too dense for the data
    if let Some(format) = ctx.y_tick_formatter {
        let labels: HashSet<String> = ticks.iter().map(|t| format(t)).collect();
        if ticks.len() > labels.len() {
            tracing::trace!("Duplicate y tick labels, falling back to domain");
            ticks = y.domain_values();
        }
    }
    ticks
}

fn render_grid(ctx: &RenderContext<'_>, elements: &mut Vec<Element>) {
    let [x_left, x_right] = ctx.scales.x.range();
    for tick in grid_ticks(ctx) {
        let Some(y) = ctx.scales.y.map(&tick) else {
            continue;
        };
        if let Some(format) = ctx.y_tick_formatter {
            elements.push(Element::new(
                Role::GridLabel,
                Shape::Text {
                    pos: [x_left, y],
                    text: format(&tick),
                    anchor: Anchor::End,
                    rotate: None,
                    offset_em: [-1.0, 0.3],
                },
            ));
        }
        elements.push(Element::new(
            Role::Grid,
            Shape::Line {
                from: [x_left, y],
                to: [x_right, y],
            },
        ));
    }
}

fn render_x_ticks(ctx: &RenderContext<'_>, elements: &mut Vec<Element>) {
    let x = &ctx.scales.x;
    let y = ctx.scales.y.range()[0] + X_AXIS_OFFSET;
    let ticks = x.ticks(X_TICK_COUNT);
    // The last tick would overflow the right edge
    let shown = ticks.len().saturating_sub(1);
    for tick in &ticks[..shown] {
        elements.push(Element::new(
            Role::XTick,
            Shape::Text {
                pos: [x.map(tick) + X_LABEL_OFFSET, y],
                text: x.tick_format(tick),
                anchor: Anchor::End,
                rotate: Some(X_LABEL_ANGLE),
                offset_em: [0.0, 0.0],
            },
        ));
    }
}

fn render_leak(
    ctx: &RenderContext<'_>,
    leak: &chrono::DateTime<chrono::Utc>,
    measure: &dyn TextMeasure,
    elements: &mut Vec<Element>,
) {
    let [x_left, x_right] = ctx.scales.x.range();
    let [y_bottom, y_top] = ctx.scales.y.range();

    // Clamp to the plot so far-left leak dates don't stretch the band
    let leak_start = ctx.scales.x.map(leak).max(x_left);
    let leak_width = x_right - leak_start;
    if leak_width < 1.0 {
        return;
    }

    if ctx.config.display_new_code_legend {
        let text_width = measure.text_width(NEW_CODE_LABEL, ctx.font_size);
        let min_width = text_width + GRID_SIZE;
        let padding = GRID_SIZE / 2.0;

        let (bg_x, bg_width, margin, text_x, anchor) = if leak_width >= min_width {
            (leak_start, leak_width, 0.0, leak_start + padding, Anchor::Start)
        } else {
            (x_right - min_width, min_width, padding, x_right - padding, Anchor::End)
        };

        elements.push(Element::new(
            Role::LegendBackground,
            Shape::Rect(Rect::new(
                bg_x,
                y_top - LEGEND_LINE_HEIGHT - margin,
                bg_width,
                LEGEND_LINE_HEIGHT,
            )),
        ));
        elements.push(Element::new(
            Role::LegendText,
            Shape::Text {
                pos: [text_x, y_top - padding - margin],
                text: NEW_CODE_LABEL.to_string(),
                anchor,
                rotate: None,
                offset_em: [0.0, 0.0],
            },
        ));
    }

    elements.push(Element::new(
        Role::Leak,
        Shape::Rect(Rect::new(leak_start, y_top, leak_width, y_bottom - y_top)),
    ));
}

fn render_selection(ctx: &RenderContext<'_>, elements: &mut Vec<Element>) {
    let Some(selected) = ctx.selected else {
        return;
    };
    if ctx.series.is_empty() {
        return;
    }
    let [y_bottom, y_top] = ctx.scales.y.range();
    elements.push(Element::new(
        Role::Crosshair,
        Shape::Line {
            from: [selected.x, y_bottom],
            to: [selected.x, y_top],
        },
    ));
    for (i, series) in ctx.series.iter().enumerate() {
        let Some(y) = series.value_at(selected.index).and_then(|v| ctx.scales.y.map(v)) else {
            continue;
        };
        elements.push(Element::new(
            Role::SelectedDot(i),
            Shape::Circle {
                center: [selected.x, y],
                radius: SELECTED_DOT_RADIUS,
            },
        ));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Padding, YTickFormat};
    use crate::scale::compute_scales;
    use crate::types::{MetricType, Point};
    use chrono::{DateTime, TimeZone, Utc};
    use mockall::predicate::eq;

    fn day(d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, d, 0, 0, 0).unwrap()
    }

    /// 100 x 100 plot, days 1..=11
    fn config() -> ChartConfig {
        ChartConfig {
            padding: Padding::uniform(10.0),
            ..ChartConfig::default()
        }
        .with_size(120.0, 120.0)
    }

    fn series() -> Vec<Series> {
        vec![Series::new(
            "coverage",
            vec![
                Point::new(day(1), 2.0),
                Point::new(day(3), 4.0),
                Point::gap(day(5)),
                Point::new(day(7), 6.0),
                Point::gap(day(9)),
                Point::new(day(11), 8.0),
            ],
        )]
    }

    fn render(config: &ChartConfig, series: &[Series], formatter: Option<&TickFormatter>) -> Scene {
        let scales = compute_scales(config, series).unwrap();
        let ctx = RenderContext {
            config,
            scales: &scales,
            series,
            selected: None,
            y_tick_formatter: formatter,
            zoom_enabled: false,
            font_size: 12.0,
        };
        render_scene(&ctx, &ApproxTextMeasure)
    }

    #[test]
    fn test_gap_breaks_line_and_isolated_dots() {
        let scene = render(&config(), &series(), None);
        let line = scene.with_role(Role::Line(0)).next().unwrap();
        let Shape::Path(path) = &line.shape else {
            panic!("line is not a path");
        };
        assert_eq!(path.subpath_count(), 3);

        // Days 7 and 11 are isolated; day 1 and 3 form a segment
        let dots: Vec<Coord> = scene
            .with_role(Role::Dot(0))
            .filter_map(|e| match e.shape {
                Shape::Circle { center, .. } => Some(center),
                _ => None,
            })
            .collect();
        assert_eq!(dots.len(), 2);
        assert_eq!(dots[0][0], 60.0);
        assert_eq!(dots[1][0], 100.0);
    }

    #[test]
    fn test_grid_without_formatter_has_no_labels() {
        let scene = render(&config(), &series(), None);
        assert!(scene.count(|r| *r == Role::Grid) > 0);
        assert_eq!(scene.count(|r| *r == Role::GridLabel), 0);
    }

    #[test]
    fn test_duplicate_labels_fall_back_to_domain() {
        let formatter = YTickFormat::Integer.formatter();
        let series = vec![Series::new("s", vec![Point::new(day(1), 0.3), Point::new(day(2), 0.6)])];
        let scene = render(&config(), &series, Some(&formatter));
        assert_eq!(scene.texts(Role::GridLabel), vec!["0", "1"]);
    }

    #[test]
    fn test_hide_flags() {
        let mut config = config();
        config.hide_grid = true;
        config.hide_x_axis = true;
        let scene = render(&config, &series(), None);
        assert_eq!(scene.count(|r| matches!(r, Role::Grid | Role::XTick)), 0);
    }

    #[test]
    fn test_x_ticks_drop_last() {
        let scales = compute_scales(&config(), &series()).unwrap();
        let all = scales.x.ticks(X_TICK_COUNT);
        let scene = render(&config(), &series(), None);
        assert_eq!(scene.count(|r| *r == Role::XTick), all.len() - 1);
        let first = scene.with_role(Role::XTick).next().unwrap();
        let Shape::Text { pos, rotate, anchor, .. } = &first.shape else {
            panic!("tick is not text");
        };
        assert_eq!(*pos, [scales.x.map(&all[0]) + X_LABEL_OFFSET, 120.0]);
        assert_eq!(*rotate, Some(X_LABEL_ANGLE));
        assert_eq!(*anchor, Anchor::End);
    }

    #[test]
    fn test_areas_use_zero_baseline() {
        let mut config = config();
        config.show_areas = true;
        let scene = render(&config, &series(), None);
        let area = scene.with_role(Role::Area(0)).next().unwrap();
        let Shape::Area(path) = &area.shape else {
            panic!("area is not filled");
        };
        assert!(path.commands().contains(&PathCommand::LineTo([20.0, 100.0])));
    }

    #[test]
    fn test_leak_band_clamped_and_omitted() {
        let mut config = config();
        config.leak_period_date = Some(day(1) - chrono::Duration::days(30));
        let scene = render(&config, &series(), None);
        let band = scene.with_role(Role::Leak).next().unwrap();
        assert_eq!(band.shape, Shape::Rect(Rect::new(0.0, 0.0, 100.0, 100.0)));

        config.leak_period_date = Some(day(11));
        let scene = render(&config, &series(), None);
        assert_eq!(scene.count(|r| *r == Role::Leak), 0);
    }

    #[test]
    fn test_legend_inside_wide_band() {
        let mut config = config();
        config.leak_period_date = Some(day(6));
        config.display_new_code_legend = true;
        let scales = compute_scales(&config, &series()).unwrap();
        let series = series();
        let ctx = RenderContext {
            config: &config,
            scales: &scales,
            series: &series,
            selected: None,
            y_tick_formatter: None,
            zoom_enabled: false,
            font_size: 12.0,
        };
        let mut measure = MockTextMeasure::new();
        measure
            .expect_text_width()
            .with(eq(NEW_CODE_LABEL), eq(12.0))
            .times(1)
            .return_const(30.0);

        let scene = render_scene(&ctx, &measure);
        let bg = scene.with_role(Role::LegendBackground).next().unwrap();
        assert_eq!(bg.shape, Shape::Rect(Rect::new(50.0, -16.0, 50.0, 16.0)));
        let text = scene.with_role(Role::LegendText).next().unwrap();
        let Shape::Text { pos, anchor, .. } = &text.shape else {
            panic!("legend is not text");
        };
        assert_eq!(*pos, [54.0, -4.0]);
        assert_eq!(*anchor, Anchor::Start);
    }

    #[test]
    fn test_legend_pinned_right_for_narrow_band() {
        let mut config = config();
        config.leak_period_date = Some(day(10));
        config.display_new_code_legend = true;
        let scales = compute_scales(&config, &series()).unwrap();
        let series = series();
        let ctx = RenderContext {
            config: &config,
            scales: &scales,
            series: &series,
            selected: None,
            y_tick_formatter: None,
            zoom_enabled: false,
            font_size: 12.0,
        };
        let mut measure = MockTextMeasure::new();
        measure.expect_text_width().return_const(40.0);

        let scene = render_scene(&ctx, &measure);
        let bg = scene.with_role(Role::LegendBackground).next().unwrap();
        assert_eq!(bg.shape, Shape::Rect(Rect::new(52.0, -20.0, 48.0, 16.0)));
        let text = scene.with_role(Role::LegendText).next().unwrap();
        let Shape::Text { pos, anchor, .. } = &text.shape else {
            panic!("legend is not text");
        };
        assert_eq!(*pos, [96.0, -8.0]);
        assert_eq!(*anchor, Anchor::End);
    }

    #[test]
    fn test_selection_crosshair_skips_undefined() {
        let config = config();
        let mut series = series();
        series.push(Series::new("other", vec![Point::gap(day(1)), Point::new(day(3), 1.0)]));
        let scales = compute_scales(&config, &series).unwrap();
        let ctx = RenderContext {
            config: &config,
            scales: &scales,
            series: &series,
            selected: Some(SelectedPoint {
                date: day(1),
                x: 0.0,
                index: 0,
            }),
            y_tick_formatter: None,
            zoom_enabled: true,
            font_size: 12.0,
        };
        let scene = render_scene(&ctx, &ApproxTextMeasure);
        assert_eq!(scene.count(|r| *r == Role::Crosshair), 1);
        assert_eq!(scene.count(|r| matches!(r, Role::SelectedDot(_))), 1);
        assert_eq!(scene.clip, Some(Rect::new(0.0, -5.0, 100.0, 110.0)));
    }

    #[test]
    fn test_level_chart_places_labels() {
        let mut config = config();
        config.metric_type = MetricType::Level;
        let series = vec![Series::new(
            "gate",
            vec![Point::new(day(1), "OK"), Point::new(day(2), "ERROR"), Point::new(day(3), "BOGUS")],
        )];
        let formatter = YTickFormat::Level.formatter();
        let scene = render(&config, &series, Some(&formatter));
        assert_eq!(scene.texts(Role::GridLabel), vec!["ERROR", "WARN", "OK"]);
        // Unknown level breaks the line after two points
        let line = scene.with_role(Role::Line(0)).next().unwrap();
        let Shape::Path(path) = &line.shape else {
            panic!("line is not a path");
        };
        assert_eq!(path.to_svg_data(), "M0,0L50,100");
    }
}
