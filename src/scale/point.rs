//! Ordinal point scale
//!
//! Places each domain value on an evenly spaced position across the range,
//! with the first value at the range start and the last at the range end.

use crate::types::Value;

/// Discrete mapping from domain values to evenly spaced pixel positions
#[derive(Debug, Clone, PartialEq)]
pub struct PointScale {
    domain: Vec<Value>,
    range: [f64; 2],
}

impl PointScale {
    /// Create a point scale over the given domain
    pub fn new(domain: Vec<Value>, range: [f64; 2]) -> Self {
        Self { domain, range }
    }

    pub fn domain(&self) -> &[Value] {
        &self.domain
    }

    pub fn range(&self) -> [f64; 2] {
        self.range
    }

    /// Distance between two adjacent domain positions
    pub fn step(&self) -> f64 {
        let [r0, r1] = self.range;
        (r1 - r0).abs() / (self.domain.len().saturating_sub(1)).max(1) as f64
    }

    /// Pixel position of a domain value; `None` if the value is not in the domain
    pub fn map(&self, value: &Value) -> Option<f64> {
        let idx = self.domain.iter().position(|d| same_value(d, value))?;
        Some(self.position(idx))
    }

    fn position(&self, idx: usize) -> f64 {
        let [r0, r1] = self.range;
        let n = self.domain.len();
        let step = self.step();
        // A single value sits in the middle of the range
        let start = r0.min(r1) + ((r1 - r0).abs() - step * (n.saturating_sub(1)) as f64) * 0.5;
        let offset = start + step * idx as f64;
        if r1 < r0 {
            // Descending range: mirror so the first value lands on r0
            r0 + r1 - offset
        } else {
            offset
        }
    }
}

/// Numeric values match numerically (`4` and `"4"`), labels match by text
fn same_value(a: &Value, b: &Value) -> bool {
    match (a.as_number(), b.as_number()) {
        (Some(x), Some(y)) => x == y,
        _ => a.to_string() == b.to_string(),
    }
}
