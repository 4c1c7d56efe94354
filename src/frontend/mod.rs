//! Frontend module for the egui chart viewer
//!
//! The viewer shows one chart document in an eframe window. Chart callbacks
//! are delivered through a crossbeam channel and applied once per frame,
//! which is where zoom requests turn into new start/end props and committed
//! selections into a new `selected_date`.
//!
//! # Main Types
//!
//! - [`TimelineViewerApp`] - application state implementing [`eframe::App`]
//! - [`TimelineView`] - the interactive chart widget
//! - [`ChartEvent`] / [`AppAction`] - callback notifications and UI actions

mod plot;
pub mod state;

pub use plot::{paint_scene, EguiTextMeasure, TimelineView};
pub use state::{channel_callbacks, event_channel, AppAction, ChartEvent};

use crate::chart::{ChartProps, TimelineChart};
use crate::config::{ChartConfig, ChartDocument};
use crate::interaction::SelectedPoint;
use crate::render::{ApproxTextMeasure, SvgOptions};
use chrono::{DateTime, Utc};
use crossbeam_channel::Receiver;
use std::path::PathBuf;

/// Viewer application for a single chart document
pub struct TimelineViewerApp {
    document: ChartDocument,
    document_path: Option<PathBuf>,
    view: TimelineView,
    events: Receiver<ChartEvent>,

    /// Point under the pointer, as last reported by the chart
    tooltip: Option<SelectedPoint>,
    /// Last committed selection
    committed: Option<DateTime<Utc>>,
    last_error: Option<String>,
}

impl TimelineViewerApp {
    pub fn new(
        _cc: &eframe::CreationContext<'_>,
        document: ChartDocument,
        document_path: Option<PathBuf>,
    ) -> Self {
        let (view, events) = build_view(&document);
        Self {
            document,
            document_path,
            view,
            events,
            tooltip: None,
            committed: None,
            last_error: None,
        }
    }

    /// Apply callback notifications; returns whether anything arrived
    fn process_chart_events(&mut self) -> bool {
        let events: Vec<ChartEvent> = self.events.try_iter().collect();
        if events.is_empty() {
            return false;
        }

        let mut props = self.view.chart().props().clone();
        for event in events {
            match event {
                ChartEvent::Tooltip(point) => self.tooltip = point,
                ChartEvent::Selection(date) => {
                    tracing::debug!("Selection committed: {:?}", date);
                    self.committed = date;
                    props.config.selected_date = date;
                }
                ChartEvent::Zoom(window) => {
                    props.config.start_date = window.start;
                    props.config.end_date = window.end;
                }
            }
        }
        self.document.chart.selected_date = props.config.selected_date;
        self.document.chart.start_date = props.config.start_date;
        self.document.chart.end_date = props.config.end_date;
        self.view.chart_mut().set_props(props);
        true
    }

    fn handle_action(&mut self, action: AppAction) {
        let result = match action {
            AppAction::OpenDocument(path) => self.open_document(path),
            AppAction::SaveDocument(path) => self.document.save(&path),
            AppAction::ExportSvg(path) => {
                let svg = self
                    .view
                    .chart()
                    .to_svg(&ApproxTextMeasure, &SvgOptions::default());
                std::fs::write(&path, svg).map_err(Into::into)
            }
            AppAction::ResetZoom => {
                self.update_config(|config| {
                    config.start_date = None;
                    config.end_date = None;
                });
                Ok(())
            }
            AppAction::ClearSelection => {
                self.committed = None;
                self.update_config(|config| config.selected_date = None);
                Ok(())
            }
        };
        if let Err(e) = result {
            tracing::warn!("Viewer action failed: {}", e);
            self.last_error = Some(e.to_string());
        }
    }

    fn open_document(&mut self, path: PathBuf) -> crate::Result<()> {
        let document = ChartDocument::load(&path)?;
        tracing::info!("Opened chart document {:?}", path);
        let (view, events) = build_view(&document);
        self.view = view;
        self.events = events;
        self.document = document;
        self.document_path = Some(path);
        self.tooltip = None;
        self.committed = None;
        self.last_error = None;
        Ok(())
    }

    /// Edit the chart config, keeping the document in sync
    fn update_config(&mut self, edit: impl FnOnce(&mut ChartConfig)) {
        let mut props = self.view.chart().props().clone();
        edit(&mut props.config);
        let (width, height) = (self.document.chart.width, self.document.chart.height);
        self.document.chart = props.config.clone();
        self.document.chart.width = width;
        self.document.chart.height = height;
        self.view.chart_mut().set_props(props);
    }

    fn render_toolbar(&mut self, ui: &mut egui::Ui, actions: &mut Vec<AppAction>) {
        ui.horizontal(|ui| {
            if ui.button("Open…").clicked() {
                if let Some(path) = rfd::FileDialog::new()
                    .set_title("Open Chart Document")
                    .add_filter("Chart documents", &["json", "toml"])
                    .pick_file()
                {
                    actions.push(AppAction::OpenDocument(path));
                }
            }
            if ui.button("Save As…").clicked() {
                if let Some(path) = rfd::FileDialog::new()
                    .add_filter("Chart documents", &["json", "toml"])
                    .save_file()
                {
                    actions.push(AppAction::SaveDocument(path));
                }
            }
            if ui.button("Export SVG…").clicked() {
                if let Some(path) = rfd::FileDialog::new()
                    .add_filter("SVG image", &["svg"])
                    .save_file()
                {
                    actions.push(AppAction::ExportSvg(path));
                }
            }

            ui.separator();

            let zoomed = self.view.chart().config().is_zoomed();
            if ui
                .add_enabled(zoomed, egui::Button::new("Reset zoom"))
                .clicked()
            {
                actions.push(AppAction::ResetZoom);
            }
            if ui
                .add_enabled(self.committed.is_some(), egui::Button::new("Clear selection"))
                .clicked()
            {
                actions.push(AppAction::ClearSelection);
            }

            ui.separator();

            let mut config = self.view.chart().config().clone();
            let mut changed = false;
            changed |= ui.checkbox(&mut config.show_areas, "Areas").changed();
            changed |= ui.checkbox(&mut config.basis_curve, "Smooth").changed();
            changed |= ui.checkbox(&mut config.hide_grid, "Hide grid").changed();
            changed |= ui
                .checkbox(&mut config.display_new_code_legend, "New code legend")
                .changed();
            if changed {
                self.update_config(|c| {
                    c.show_areas = config.show_areas;
                    c.basis_curve = config.basis_curve;
                    c.hide_grid = config.hide_grid;
                    c.display_new_code_legend = config.display_new_code_legend;
                });
            }
        });
    }

    fn render_details(&self, ui: &mut egui::Ui) {
        ui.heading(&self.document.name);
        ui.label(format!("Metric: {}", self.document.chart.metric_type));
        if let Some(path) = &self.document_path {
            ui.label(path.display().to_string());
        }
        ui.separator();

        match self.tooltip {
            Some(point) => {
                ui.strong(point.date.format("%Y-%m-%d %H:%M").to_string());
                for series in self.view.chart().series() {
                    let value = series
                        .value_at(point.index)
                        .map_or_else(|| "-".to_string(), |v| v.to_string());
                    ui.label(format!("{}: {}", series.name, value));
                }
            }
            None => {
                ui.weak("Hover the chart to inspect values");
            }
        }

        if let Some(date) = self.committed {
            ui.separator();
            ui.label(format!("Selected: {}", date.format("%Y-%m-%d %H:%M")));
        }
        if let Some(error) = &self.last_error {
            ui.separator();
            ui.colored_label(egui::Color32::from_rgb(200, 60, 60), error);
        }
    }
}

fn build_view(document: &ChartDocument) -> (TimelineView, Receiver<ChartEvent>) {
    let (callbacks, _sender, receiver) = event_channel();
    let chart = TimelineChart::new(ChartProps::from_document(document.clone()), callbacks);
    (TimelineView::new(chart), receiver)
}

impl eframe::App for TimelineViewerApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        if self.process_chart_events() {
            ctx.request_repaint();
        }

        let mut actions = Vec::new();
        egui::TopBottomPanel::top("toolbar").show(ctx, |ui| {
            self.render_toolbar(ui, &mut actions);
        });

        egui::SidePanel::right("details")
            .default_width(220.0)
            .show(ctx, |ui| {
                self.render_details(ui);
            });

        egui::CentralPanel::default().show(ctx, |ui| {
            self.view.show(ui);
        });

        for action in actions {
            self.handle_action(action);
        }
    }
}

