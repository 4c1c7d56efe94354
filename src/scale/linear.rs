//! Continuous linear scale with "nice" tick generation
//!
//! Tick steps are always 1, 2 or 5 times a power of ten, chosen so that
//! roughly `count` ticks cover the domain.

use serde::{Deserialize, Serialize};

const E10: f64 = 7.0710678118654755; // sqrt(50)
const E5: f64 = 3.1622776601683795; // sqrt(10)
const E2: f64 = std::f64::consts::SQRT_2;

/// Upper bound on the tick count honoured by [`ticks`]
pub const MAX_TICKS: usize = 10_000;

/// Rounds half-way cases towards positive infinity
fn round_half_up(x: f64) -> f64 {
    (x + 0.5).floor()
}

/// Linear mapping between a numeric domain and a pixel range
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LinearScale {
    domain: [f64; 2],
    range: [f64; 2],
}

impl LinearScale {
    /// Create a new linear scale
    pub fn new(domain: [f64; 2], range: [f64; 2]) -> Self {
        Self { domain, range }
    }

    pub fn domain(&self) -> [f64; 2] {
        self.domain
    }

    pub fn range(&self) -> [f64; 2] {
        self.range
    }

    /// Map a domain value to a pixel position
    ///
    /// A degenerate domain maps everything to the middle of the range.
    pub fn map(&self, value: f64) -> f64 {
        let [d0, d1] = self.domain;
        let span = d1 - d0;
        let t = if span != 0.0 { (value - d0) / span } else { 0.5 };
        self.range[0] + t * (self.range[1] - self.range[0])
    }

    /// Map a pixel position back into the domain
    pub fn invert(&self, px: f64) -> f64 {
        let [r0, r1] = self.range;
        let span = r1 - r0;
        let t = if span != 0.0 { (px - r0) / span } else { 0.5 };
        self.domain[0] + t * (self.domain[1] - self.domain[0])
    }

    /// Extend the domain outward to round tick boundaries
    pub fn nice(self, count: usize) -> Self {
        let [mut start, mut stop] = self.domain;
        let reversed = stop < start;
        if reversed {
            std::mem::swap(&mut start, &mut stop);
        }

        let mut prestep: Option<f64> = None;
        for _ in 0..10 {
            let step = tick_increment(start, stop, count as f64);
            if prestep == Some(step) {
                break;
            } else if step > 0.0 {
                start = (start / step).floor() * step;
                stop = (stop / step).ceil() * step;
            } else if step < 0.0 {
                start = (start * step).ceil() / step;
                stop = (stop * step).floor() / step;
            } else {
                break;
            }
            prestep = Some(step);
        }

        let domain = if reversed { [stop, start] } else { [start, stop] };
        Self { domain, ..self }
    }

    /// Generate roughly `count` evenly spaced round ticks within the domain
    pub fn ticks(&self, count: usize) -> Vec<f64> {
        ticks(self.domain[0], self.domain[1], count as f64)
    }
}

/// Step and integer bounds `(i1, i2, inc)` of the tick sequence.
/// A negative `inc` means the step is `1 / -inc`.
fn tick_spec(start: f64, stop: f64, count: f64) -> (f64, f64, f64) {
    let step = (stop - start) / count.max(0.0);
    let power = step.log10().floor();
    let error = step / 10f64.powf(power);
    let factor = if error >= E10 {
        10.0
    } else if error >= E5 {
        5.0
    } else if error >= E2 {
        2.0
    } else {
        1.0
    };

    let (i1, i2, inc) = if power < 0.0 {
        let base = 10f64.powf(-power) / factor;
        let mut i1 = round_half_up(start * base);
        let mut i2 = round_half_up(stop * base);
        if i1 / base < start {
            i1 += 1.0;
        }
        if i2 / base > stop {
            i2 -= 1.0;
        }
        (i1, i2, -base)
    } else {
        let base = 10f64.powf(power) * factor;
        let mut i1 = round_half_up(start / base);
        let mut i2 = round_half_up(stop / base);
        if i1 * base < start {
            i1 += 1.0;
        }
        if i2 * base > stop {
            i2 -= 1.0;
        }
        (i1, i2, base)
    };

    if i2 < i1 && (0.5..2.0).contains(&count) {
        return tick_spec(start, stop, count * 2.0);
    }
    (i1, i2, inc)
}

/// Signed tick increment for the interval; see [`tick_spec`]
pub fn tick_increment(start: f64, stop: f64, count: f64) -> f64 {
    tick_spec(start, stop, count).2
}

/// Absolute tick step for the interval
pub fn tick_step(start: f64, stop: f64, count: f64) -> f64 {
    let reversed = stop < start;
    let inc = if reversed {
        tick_increment(stop, start, count)
    } else {
        tick_increment(start, stop, count)
    };
    let step = if inc < 0.0 { 1.0 / -inc } else { inc };
    if reversed {
        -step
    } else {
        step
    }
}

/// Round ticks between `start` and `stop`, in the same direction
///
/// Requests above [`MAX_TICKS`] are treated as [`MAX_TICKS`].
pub fn ticks(start: f64, stop: f64, count: f64) -> Vec<f64> {
    if !(count > 0.0) || !start.is_finite() || !stop.is_finite() {
        return Vec::new();
    }
    if start == stop {
        return vec![start];
    }
    let count = count.min(MAX_TICKS as f64);

    let reversed = stop < start;
    let (i1, i2, inc) = if reversed {
        tick_spec(stop, start, count)
    } else {
        tick_spec(start, stop, count)
    };
    if !(i2 >= i1) {
        return Vec::new();
    }

    let n = (i2 - i1) as usize + 1;
    (0..n)
        .map(|i| {
            let k = if reversed { i2 - i as f64 } else { i1 + i as f64 };
            if inc < 0.0 {
                k / -inc
            } else {
                k * inc
            }
        })
        .collect()
}
