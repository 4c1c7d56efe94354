//! Common test utilities and helpers

#![allow(dead_code)] // Test utilities may not all be used in every test file

pub mod builders;

use chrono::{DateTime, Duration, TimeZone, Utc};
use timeline_chart::config::{ChartConfig, Padding};

/// Midnight UTC of a day in January 2024
pub fn day(d: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, d, 0, 0, 0).unwrap()
}

/// `hours` after midnight of a January 2024 day
pub fn day_hours(d: u32, hours: i64) -> DateTime<Utc> {
    day(d) + Duration::hours(hours)
}

/// Config with a `width` x `height` plot area and no padding
pub fn plot_config(width: f64, height: f64) -> ChartConfig {
    ChartConfig {
        padding: Padding::uniform(0.0),
        ..ChartConfig::default()
    }
    .with_size(width, height)
}

/// Assert two floats are approximately equal
pub fn assert_float_eq(a: f64, b: f64, epsilon: f64) {
    assert!(
        (a - b).abs() < epsilon,
        "Expected {} to be approximately equal to {} (epsilon: {})",
        a,
        b,
        epsilon
    );
}
