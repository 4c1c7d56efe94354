//! Interaction tracking
//!
//! Converts raw pointer and wheel input into throttled selection, tooltip and
//! zoom notifications.
//!
//! # Main Types
//!
//! - [`InteractionTracker`] - per-chart hover/selection state machine
//! - [`ChartCallbacks`] - optional caller hooks
//! - [`Throttle`] - at most one update per [`THROTTLE_INTERVAL`]

pub mod throttle;
pub mod tracker;

pub use throttle::Throttle;
pub use tracker::{
    nearest_point_index, selected_point_for_date, zoom_window, ChartCallbacks, InteractionState,
    InteractionTracker, SelectedPoint, SelectionCallback, TooltipCallback, WheelDeltaMode,
    WheelEvent, ZoomCallback, ZoomWindow, THROTTLE_INTERVAL,
};
