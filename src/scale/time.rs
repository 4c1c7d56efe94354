//! Temporal scale
//!
//! Maps UTC timestamps onto a pixel range with millisecond precision and
//! generates calendar-aligned ticks (1s, 5s, ... 3 months, years) together
//! with a multi-resolution label formatter.

use super::linear::tick_step;
use chrono::{DateTime, Datelike, Duration, Months, TimeZone, Timelike, Utc};

const DURATION_SECOND: f64 = 1_000.0;
const DURATION_MINUTE: f64 = DURATION_SECOND * 60.0;
const DURATION_HOUR: f64 = DURATION_MINUTE * 60.0;
const DURATION_DAY: f64 = DURATION_HOUR * 24.0;
const DURATION_WEEK: f64 = DURATION_DAY * 7.0;
const DURATION_MONTH: f64 = DURATION_DAY * 30.0;
const DURATION_YEAR: f64 = DURATION_DAY * 365.0;

/// Upper bound on generated ticks, guards against absurd spans
const MAX_TICKS: usize = 10_000;

/// Milliseconds since the Unix epoch
pub fn to_millis(date: &DateTime<Utc>) -> f64 {
    date.timestamp_millis() as f64
}

/// Timestamp from fractional epoch milliseconds (truncated to whole ms)
pub fn from_millis(ms: f64) -> DateTime<Utc> {
    let ms = if ms.is_finite() { ms.trunc() } else { 0.0 };
    DateTime::from_timestamp_millis(ms as i64).unwrap_or(DateTime::<Utc>::UNIX_EPOCH)
}

/// Linear mapping from timestamps to pixels, invertible
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimeScale {
    domain: [DateTime<Utc>; 2],
    range: [f64; 2],
}

impl TimeScale {
    /// Create a new time scale
    pub fn new(domain: [DateTime<Utc>; 2], range: [f64; 2]) -> Self {
        Self { domain, range }
    }

    pub fn domain(&self) -> [DateTime<Utc>; 2] {
        self.domain
    }

    pub fn range(&self) -> [f64; 2] {
        self.range
    }

    /// Map a timestamp to a pixel position (not clamped to the range)
    pub fn map(&self, date: &DateTime<Utc>) -> f64 {
        self.map_millis(to_millis(date))
    }

    fn map_millis(&self, ms: f64) -> f64 {
        let d0 = to_millis(&self.domain[0]);
        let span = to_millis(&self.domain[1]) - d0;
        let t = if span != 0.0 { (ms - d0) / span } else { 0.5 };
        self.range[0] + t * (self.range[1] - self.range[0])
    }

    /// Map a pixel position back to a timestamp
    pub fn invert(&self, px: f64) -> DateTime<Utc> {
        let [r0, r1] = self.range;
        let span = r1 - r0;
        let t = if span != 0.0 { (px - r0) / span } else { 0.5 };
        let d0 = to_millis(&self.domain[0]);
        let d1 = to_millis(&self.domain[1]);
        from_millis(d0 + t * (d1 - d0))
    }

    /// Calendar-aligned ticks covering the domain, roughly `count` of them
    pub fn ticks(&self, count: usize) -> Vec<DateTime<Utc>> {
        let (mut start, mut stop) = (self.domain[0], self.domain[1]);
        let reversed = stop < start;
        if reversed {
            std::mem::swap(&mut start, &mut stop);
        }

        let mut ticks = match TickInterval::choose(&start, &stop, count as f64) {
            Some(interval) => interval.range(start, stop + Duration::milliseconds(1)),
            None => Vec::new(),
        };
        if reversed {
            ticks.reverse();
        }
        ticks
    }

    /// Format a tick label at the coarsest resolution that still identifies it
    pub fn tick_format(&self, date: &DateTime<Utc>) -> String {
        format_multi(date)
    }
}

/// Calendar unit used to align ticks
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeUnit {
    Millisecond,
    Second,
    Minute,
    Hour,
    Day,
    /// Weeks start on Sunday
    Week,
    Month,
    Year,
}

impl TimeUnit {
    /// Start of the unit containing `date`
    pub fn floor(&self, date: DateTime<Utc>) -> DateTime<Utc> {
        let ms = date.timestamp_millis();
        match self {
            TimeUnit::Millisecond => from_millis(ms as f64),
            TimeUnit::Second => from_millis((ms.div_euclid(1000) * 1000) as f64),
            TimeUnit::Minute => from_millis((ms.div_euclid(60_000) * 60_000) as f64),
            TimeUnit::Hour => from_millis((ms.div_euclid(3_600_000) * 3_600_000) as f64),
            TimeUnit::Day => start_of_day(date),
            TimeUnit::Week => {
                let day = start_of_day(date);
                day - Duration::days(day.weekday().num_days_from_sunday() as i64)
            }
            TimeUnit::Month => Utc
                .with_ymd_and_hms(date.year(), date.month(), 1, 0, 0, 0)
                .single()
                .unwrap_or(date),
            TimeUnit::Year => Utc
                .with_ymd_and_hms(date.year(), 1, 1, 0, 0, 0)
                .single()
                .unwrap_or(date),
        }
    }

    /// Move `date` forward by `n` units
    pub fn offset(&self, date: DateTime<Utc>, n: u32) -> DateTime<Utc> {
        let n64 = n as i64;
        let next = match self {
            TimeUnit::Millisecond => Some(date + Duration::milliseconds(n64)),
            TimeUnit::Second => Some(date + Duration::seconds(n64)),
            TimeUnit::Minute => Some(date + Duration::minutes(n64)),
            TimeUnit::Hour => Some(date + Duration::hours(n64)),
            TimeUnit::Day => Some(date + Duration::days(n64)),
            TimeUnit::Week => Some(date + Duration::weeks(n64)),
            TimeUnit::Month => date.checked_add_months(Months::new(n)),
            TimeUnit::Year => date.checked_add_months(Months::new(n.saturating_mul(12))),
        };
        next.unwrap_or(DateTime::<Utc>::MAX_UTC)
    }

    /// Calendar field used to thin ticks to every n-th unit
    fn field(&self, date: &DateTime<Utc>) -> i64 {
        match self {
            TimeUnit::Millisecond => date.timestamp_millis(),
            TimeUnit::Second => date.second() as i64,
            TimeUnit::Minute => date.minute() as i64,
            TimeUnit::Hour => date.hour() as i64,
            TimeUnit::Day => date.day0() as i64,
            TimeUnit::Week => date.timestamp_millis().div_euclid(DURATION_WEEK as i64),
            TimeUnit::Month => date.month0() as i64,
            TimeUnit::Year => date.year() as i64,
        }
    }
}

fn start_of_day(date: DateTime<Utc>) -> DateTime<Utc> {
    let ms = date.timestamp_millis();
    let day = DURATION_DAY as i64;
    from_millis((ms.div_euclid(day) * day) as f64)
}

/// A unit thinned to every `step`-th occurrence
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TickInterval {
    pub unit: TimeUnit,
    pub step: u32,
}

/// Candidate intervals with their approximate durations, ascending
const TICK_INTERVALS: [(TimeUnit, u32, f64); 18] = [
    (TimeUnit::Second, 1, DURATION_SECOND),
    (TimeUnit::Second, 5, 5.0 * DURATION_SECOND),
    (TimeUnit::Second, 15, 15.0 * DURATION_SECOND),
    (TimeUnit::Second, 30, 30.0 * DURATION_SECOND),
    (TimeUnit::Minute, 1, DURATION_MINUTE),
    (TimeUnit::Minute, 5, 5.0 * DURATION_MINUTE),
    (TimeUnit::Minute, 15, 15.0 * DURATION_MINUTE),
    (TimeUnit::Minute, 30, 30.0 * DURATION_MINUTE),
    (TimeUnit::Hour, 1, DURATION_HOUR),
    (TimeUnit::Hour, 3, 3.0 * DURATION_HOUR),
    (TimeUnit::Hour, 6, 6.0 * DURATION_HOUR),
    (TimeUnit::Hour, 12, 12.0 * DURATION_HOUR),
    (TimeUnit::Day, 1, DURATION_DAY),
    (TimeUnit::Day, 2, 2.0 * DURATION_DAY),
    (TimeUnit::Week, 1, DURATION_WEEK),
    (TimeUnit::Month, 1, DURATION_MONTH),
    (TimeUnit::Month, 3, 3.0 * DURATION_MONTH),
    (TimeUnit::Year, 1, DURATION_YEAR),
];

impl TickInterval {
    /// Pick the interval whose duration is closest (in ratio) to span / count
    pub fn choose(start: &DateTime<Utc>, stop: &DateTime<Utc>, count: f64) -> Option<Self> {
        if !(count > 0.0) {
            return None;
        }
        let (start_ms, stop_ms) = (to_millis(start), to_millis(stop));
        let target = (stop_ms - start_ms).abs() / count;
        let i = TICK_INTERVALS.partition_point(|(_, _, duration)| *duration <= target);

        if i == TICK_INTERVALS.len() {
            let step = tick_step(start_ms / DURATION_YEAR, stop_ms / DURATION_YEAR, count);
            return Self::every(TimeUnit::Year, step);
        }
        if i == 0 {
            let step = tick_step(start_ms, stop_ms, count).max(1.0);
            return Self::every(TimeUnit::Millisecond, step);
        }

        let (_, _, lower) = TICK_INTERVALS[i - 1];
        let (_, _, upper) = TICK_INTERVALS[i];
        let (unit, step, _) = if target / lower < upper / target {
            TICK_INTERVALS[i - 1]
        } else {
            TICK_INTERVALS[i]
        };
        Some(Self { unit, step })
    }

    fn every(unit: TimeUnit, step: f64) -> Option<Self> {
        let step = step.floor();
        if !step.is_finite() || step < 1.0 || step > u32::MAX as f64 {
            return None;
        }
        Some(Self {
            unit,
            step: step as u32,
        })
    }

    fn accepts(&self, date: &DateTime<Utc>) -> bool {
        self.step <= 1 || self.unit.field(date).rem_euclid(self.step as i64) == 0
    }

    /// Latest accepted boundary at or before `date`
    pub fn floor(&self, date: DateTime<Utc>) -> DateTime<Utc> {
        let mut current = self.unit.floor(date);
        let mut guard = 0;
        while !self.accepts(&current) && guard < MAX_TICKS {
            current = self.unit.floor(current - Duration::milliseconds(1));
            guard += 1;
        }
        current
    }

    /// Next accepted boundary after `date`
    fn next(&self, date: DateTime<Utc>) -> DateTime<Utc> {
        let mut current = self.unit.offset(date, 1);
        let mut guard = 0;
        while !self.accepts(&current) && guard < MAX_TICKS {
            current = self.unit.offset(current, 1);
            guard += 1;
        }
        current
    }

    /// Earliest accepted boundary at or after `date`
    pub fn ceil(&self, date: DateTime<Utc>) -> DateTime<Utc> {
        let floored = self.floor(date - Duration::milliseconds(1));
        self.floor(self.next(floored))
    }

    /// Accepted boundaries in `[start, stop)`
    pub fn range(&self, start: DateTime<Utc>, stop: DateTime<Utc>) -> Vec<DateTime<Utc>> {
        let mut ticks = Vec::new();
        let mut current = self.ceil(start);
        while current < stop && ticks.len() < MAX_TICKS {
            ticks.push(current);
            let next = self.floor(self.next(current));
            if next <= current {
                break;
            }
            current = next;
        }
        ticks
    }
}

/// Label with the coarsest resolution that still distinguishes `date`
pub fn format_multi(date: &DateTime<Utc>) -> String {
    let fmt = if TimeUnit::Second.floor(*date) < *date {
        ".%3f"
    } else if TimeUnit::Minute.floor(*date) < *date {
        ":%S"
    } else if TimeUnit::Hour.floor(*date) < *date {
        "%I:%M"
    } else if TimeUnit::Day.floor(*date) < *date {
        "%I %p"
    } else if TimeUnit::Month.floor(*date) < *date {
        if TimeUnit::Week.floor(*date) < *date {
            "%a %d"
        } else {
            "%b %d"
        }
    } else if TimeUnit::Year.floor(*date) < *date {
        "%B"
    } else {
        "%Y"
    };
    date.format(fmt).to_string()
}
