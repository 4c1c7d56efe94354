//! Event and action types for the viewer
//!
//! Chart callbacks run inside the widget's input handling, so they only push
//! a [`ChartEvent`] onto a channel. The app drains the channel once per frame
//! and turns events into [`AppAction`]s.

use crate::interaction::{ChartCallbacks, SelectedPoint, ZoomWindow};
use chrono::{DateTime, Utc};
use crossbeam_channel::{Receiver, Sender};
use std::path::PathBuf;

/// Notification emitted by a chart callback
#[derive(Debug, Clone, PartialEq)]
pub enum ChartEvent {
    Selection(Option<DateTime<Utc>>),
    Tooltip(Option<SelectedPoint>),
    Zoom(ZoomWindow),
}

/// Actions the viewer UI can request
#[derive(Debug, Clone, PartialEq)]
pub enum AppAction {
    OpenDocument(PathBuf),
    SaveDocument(PathBuf),
    ExportSvg(PathBuf),
    ResetZoom,
    ClearSelection,
}

/// Callbacks that forward every notification into `sender`
pub fn channel_callbacks(sender: &Sender<ChartEvent>) -> ChartCallbacks {
    let selection = sender.clone();
    let tooltip = sender.clone();
    let zoom = sender.clone();
    ChartCallbacks::new()
        .with_selection(move |date| {
            let _ = selection.send(ChartEvent::Selection(date));
        })
        .with_tooltip(move |point| {
            let _ = tooltip.send(ChartEvent::Tooltip(point));
        })
        .with_zoom(move |window| {
            let _ = zoom.send(ChartEvent::Zoom(window));
        })
}

/// Unbounded event channel plus matching callbacks
pub fn event_channel() -> (ChartCallbacks, Sender<ChartEvent>, Receiver<ChartEvent>) {
    let (sender, receiver) = crossbeam_channel::unbounded();
    (channel_callbacks(&sender), sender, receiver)
}
