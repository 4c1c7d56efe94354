//! Colors and stroke widths shared by the SVG writer and the egui painter

use super::scene::Role;
use serde::{Deserialize, Serialize};

/// RGBA color, unmultiplied
pub type Rgba = [u8; 4];

/// Visual styling of a rendered scene
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Theme {
    /// Line/area/dot colors, cycled by series index
    pub series: Vec<Rgba>,
    pub grid: Rgba,
    pub tick_text: Rgba,
    pub leak: Rgba,
    pub legend_text: Rgba,
    pub crosshair: Rgba,
    /// Alpha applied to series colors for area fills
    pub area_alpha: u8,
    pub line_width: f32,
    pub font_size: f32,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            series: vec![
                [35, 106, 200, 255],
                [36, 163, 168, 255],
                [160, 79, 192, 255],
                [237, 125, 32, 255],
                [212, 51, 63, 255],
            ],
            grid: [225, 230, 240, 255],
            tick_text: [106, 117, 144, 255],
            leak: [236, 245, 252, 255],
            legend_text: [42, 47, 64, 255],
            crosshair: [182, 189, 204, 255],
            area_alpha: 40,
            line_width: 2.0,
            font_size: 12.0,
        }
    }
}

impl Theme {
    /// Series color for an index, wrapping around the palette
    pub fn series_color(&self, index: usize) -> Rgba {
        if self.series.is_empty() {
            return self.tick_text;
        }
        self.series[index % self.series.len()]
    }

    /// Fill color of an element, if it is filled
    pub fn fill(&self, role: &Role) -> Option<Rgba> {
        match role {
            Role::Leak | Role::LegendBackground => Some(self.leak),
            Role::Area(i) => {
                let [r, g, b, _] = self.series_color(*i);
                Some([r, g, b, self.area_alpha])
            }
            Role::Dot(i) | Role::SelectedDot(i) => Some(self.series_color(*i)),
            Role::GridLabel | Role::XTick => Some(self.tick_text),
            Role::LegendText => Some(self.legend_text),
            Role::Grid | Role::Line(_) | Role::Crosshair | Role::Overlay => None,
        }
    }

    /// Stroke color and width of an element, if it is stroked
    pub fn stroke(&self, role: &Role) -> Option<(Rgba, f32)> {
        match role {
            Role::Grid => Some((self.grid, 1.0)),
            Role::Line(i) => Some((self.series_color(*i), self.line_width)),
            Role::Crosshair => Some((self.crosshair, 1.0)),
            _ => None,
        }
    }
}

/// `#rrggbb` form of a color, ignoring alpha
pub fn to_hex(color: Rgba) -> String {
    format!("#{:02x}{:02x}{:02x}", color[0], color[1], color[2])
}

/// Alpha as an opacity in `[0, 1]`
pub fn opacity(color: Rgba) -> f64 {
    color[3] as f64 / 255.0
}
