//! Standalone SVG output for a [`Scene`]

use super::path::fmt_num;
use super::scene::{Element, Role, Scene, Shape};
use super::style::{opacity, to_hex, Rgba, Theme};
use std::fmt::Write as _;

const CLIP_ID: &str = "chart-clip";

/// Options of the SVG writer
#[derive(Debug, Clone, PartialEq)]
pub struct SvgOptions {
    pub theme: Theme,
    /// Emit inline presentation attributes in addition to class names
    pub inline_style: bool,
}

impl Default for SvgOptions {
    fn default() -> Self {
        Self {
            theme: Theme::default(),
            inline_style: true,
        }
    }
}

/// Escape text for use in XML content and attribute values
pub fn escape_xml(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            c => out.push(c),
        }
    }
    out
}

/// Render a scene as an SVG document
///
/// An empty scene still yields a valid, empty `<svg>` element of the
/// requested size.
pub fn write_svg(scene: &Scene, options: &SvgOptions) -> String {
    let mut out = String::new();
    let mut classes = String::from("line-chart");
    if scene.zoomed {
        classes.push_str(" chart-zoomed");
    }

    let _ = write!(
        out,
        r#"<svg xmlns="http://www.w3.org/2000/svg" class="{}" width="{}" height="{}""#,
        classes,
        fmt_num(scene.width),
        fmt_num(scene.height)
    );
    if let Some(description) = &scene.description {
        let _ = write!(out, r#" aria-label="{}""#, escape_xml(description));
    }
    out.push_str(">\n");

    if scene.is_empty() {
        out.push_str("</svg>\n");
        return out;
    }

    if let Some(clip) = &scene.clip {
        let _ = writeln!(
            out,
            r#"  <defs><clipPath id="{}"><rect x="{}" y="{}" width="{}" height="{}"/></clipPath></defs>"#,
            CLIP_ID,
            fmt_num(clip.x),
            fmt_num(clip.y),
            fmt_num(clip.width),
            fmt_num(clip.height)
        );
    }

    let _ = writeln!(
        out,
        r#"  <g transform="translate({}, {})">"#,
        fmt_num(scene.translate[0]),
        fmt_num(scene.translate[1])
    );
    for element in &scene.elements {
        out.push_str("    ");
        write_element(&mut out, element, scene.clip.is_some(), options);
        out.push('\n');
    }
    let overlay = &scene.overlay;
    let _ = writeln!(
        out,
        r#"    <rect class="{}" width="{}" height="{}" fill="none" pointer-events="all"/>"#,
        Role::Overlay.class_name(),
        fmt_num(overlay.width),
        fmt_num(overlay.height)
    );
    out.push_str("  </g>\n</svg>\n");
    out
}

fn paint_attrs(role: &Role, options: &SvgOptions, filled_shape: bool) -> String {
    if !options.inline_style {
        return String::new();
    }
    let theme = &options.theme;
    let mut attrs = String::new();
    match theme.fill(role).filter(|_| filled_shape) {
        Some(color) => push_color(&mut attrs, "fill", color),
        None => attrs.push_str(r#" fill="none""#),
    }
    if let Some((color, width)) = theme.stroke(role) {
        push_color(&mut attrs, "stroke", color);
        let _ = write!(attrs, r#" stroke-width="{}""#, width);
    }
    attrs
}

fn push_color(attrs: &mut String, name: &str, color: Rgba) {
    let _ = write!(attrs, r#" {}="{}""#, name, to_hex(color));
    if color[3] < 255 {
        let _ = write!(attrs, r#" {}-opacity="{:.3}""#, name, opacity(color));
    }
}

fn write_element(out: &mut String, element: &Element, clipped: bool, options: &SvgOptions) {
    let role = &element.role;
    let class = role.class_name();
    let clip = if clipped && role.is_series() {
        format!(r#" clip-path="url(#{})""#, CLIP_ID)
    } else {
        String::new()
    };

    match &element.shape {
        Shape::Line { from, to } => {
            let _ = write!(
                out,
                r#"<line class="{}" x1="{}" y1="{}" x2="{}" y2="{}"{}/>"#,
                class,
                fmt_num(from[0]),
                fmt_num(from[1]),
                fmt_num(to[0]),
                fmt_num(to[1]),
                paint_attrs(role, options, false)
            );
        }
        Shape::Rect(rect) => {
            let _ = write!(
                out,
                r#"<rect class="{}" x="{}" y="{}" width="{}" height="{}"{}/>"#,
                class,
                fmt_num(rect.x),
                fmt_num(rect.y),
                fmt_num(rect.width),
                fmt_num(rect.height),
                paint_attrs(role, options, true)
            );
        }
        Shape::Text {
            pos,
            text,
            anchor,
            rotate,
            offset_em,
        } => {
            let _ = write!(
                out,
                r#"<text class="{}" x="{}" y="{}" text-anchor="{}""#,
                class,
                fmt_num(pos[0]),
                fmt_num(pos[1]),
                anchor.as_svg()
            );
            if offset_em[0] != 0.0 {
                let _ = write!(out, r#" dx="{}em""#, fmt_num(offset_em[0]));
            }
            if offset_em[1] != 0.0 {
                let _ = write!(out, r#" dy="{}em""#, fmt_num(offset_em[1]));
            }
            if let Some(angle) = rotate {
                let _ = write!(
                    out,
                    r#" transform="rotate({}, {}, {})""#,
                    fmt_num(*angle),
                    fmt_num(pos[0]),
                    fmt_num(pos[1])
                );
            }
            if options.inline_style {
                let _ = write!(out, r#" font-size="{}""#, options.theme.font_size);
            }
            let _ = write!(
                out,
                "{}>{}</text>",
                paint_attrs(role, options, true),
                escape_xml(text)
            );
        }
        Shape::Path(path) => {
            let _ = write!(
                out,
                r#"<path class="{}" d="{}"{}{}/>"#,
                class,
                path.to_svg_data(),
                paint_attrs(role, options, false),
                clip
            );
        }
        Shape::Area(path) => {
            let _ = write!(
                out,
                r#"<path class="{}" d="{}"{}{}/>"#,
                class,
                path.to_svg_data(),
                paint_attrs(role, options, true),
                clip
            );
        }
        Shape::Circle { center, radius } => {
            let _ = write!(
                out,
                r#"<circle class="{}" cx="{}" cy="{}" r="{}"{}{}/>"#,
                class,
                fmt_num(center[0]),
                fmt_num(center[1]),
                fmt_num(*radius),
                paint_attrs(role, options, true),
                clip
            );
        }
    }
}
