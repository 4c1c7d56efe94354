//! Application module
//!
//! Re-exports the viewer application and its widget from the frontend module.

pub use crate::frontend::TimelineViewerApp;

pub use crate::frontend::TimelineView;
