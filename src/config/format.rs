//! Y-axis tick label formatters
//!
//! The renderer accepts any [`TickFormatter`] closure; [`YTickFormat`] is the
//! serializable subset that chart documents can select by name.

use crate::types::Value;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Formats a y tick value into a label
pub type TickFormatter = Arc<dyn Fn(&Value) -> String + Send + Sync>;

/// Built-in y tick formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum YTickFormat {
    /// Ratings 1–5 as letters A–E
    Rating,
    /// Level labels as-is
    Level,
    /// Rounded to a whole number
    Integer,
    /// One decimal with a percent sign
    Percent,
    /// Compact form with k/M suffixes
    Short,
    /// Fixed number of decimals
    Decimal(u8),
}

impl YTickFormat {
    /// Format a single tick value
    pub fn format(&self, value: &Value) -> String {
        let Some(n) = value.as_number() else {
            return value.to_string();
        };
        match self {
            YTickFormat::Rating => rating_letter(n).unwrap_or_else(|| value.to_string()),
            YTickFormat::Level => value.to_string(),
            YTickFormat::Integer => format!("{:.0}", n),
            YTickFormat::Percent => format!("{:.1}%", n),
            YTickFormat::Short => format_short(n),
            YTickFormat::Decimal(precision) => format!("{:.*}", *precision as usize, n),
        }
    }

    /// Shareable closure form of this format
    pub fn formatter(self) -> TickFormatter {
        Arc::new(move |value: &Value| self.format(value))
    }
}

fn rating_letter(n: f64) -> Option<String> {
    if n.fract() != 0.0 || !(1.0..=5.0).contains(&n) {
        return None;
    }
    let letter = (b'A' + (n as u8 - 1)) as char;
    Some(letter.to_string())
}

fn format_short(n: f64) -> String {
    let abs = n.abs();
    let (scaled, suffix) = if abs >= 1_000_000.0 {
        (n / 1_000_000.0, "M")
    } else if abs >= 1_000.0 {
        (n / 1_000.0, "k")
    } else {
        (n, "")
    };
    let text = format!("{:.1}", scaled);
    let text = text.strip_suffix(".0").unwrap_or(&text);
    format!("{}{}", text, suffix)
}
